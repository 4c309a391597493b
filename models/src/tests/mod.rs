mod export;
mod hydra;
mod query;
mod solution_pack;
