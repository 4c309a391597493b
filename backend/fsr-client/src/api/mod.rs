//! Resource and workflow surfaces borrowed from a [`crate::FortiSoar`].

pub mod alerts;
pub mod export_config;
pub mod files;
pub mod resolver;
pub mod solution_packs;

pub use alerts::AlertsApi;
pub use export_config::ExportConfigApi;
pub use files::FilesApi;
pub use resolver::NameResolver;
pub use solution_packs::{DEFAULT_SEARCH_LIMIT, SolutionPacksApi};
