mod helpers;

mod auth;
mod capability;
mod dispatcher;
mod export;
mod resolver;
mod resources;
mod solution_packs;
