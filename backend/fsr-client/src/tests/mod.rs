mod auth;
mod cache;
mod config;
mod endpoint;
mod error;
mod logger;
mod poller;
mod response;
