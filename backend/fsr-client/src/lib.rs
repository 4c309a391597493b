//! Async client for the FortiSOAR REST API.
//!
//! [`FortiSoar`] authenticates once at construction, then dispatches requests
//! with the session headers, translating platform rejections into
//! [`FsrError`]. Resource and workflow surfaces hang off the client:
//!
//! - [`FortiSoar::alerts`] / [`FortiSoar::files`]: thin CRUD
//! - [`FortiSoar::export_config`]: export templates and the polling export workflow
//! - [`FortiSoar::solution_packs`]: pack search and pack export

pub mod api;
pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod logger;

#[cfg(test)]
mod tests;

pub use api::DEFAULT_SEARCH_LIMIT;
pub use auth::{ApiKeyAuth, AuthStrategy, Credentials, Operation, UserPasswordAuth};
pub use client::{ApiRequest, ApiResponse, ClientOptions, FilePart, FortiSoar, ResponseBody};
pub use config::ClientConfig;
pub use error::{FsrError, LookupEntity};
pub use export::{ExportOutcome, PollOptions};

pub const DEFAULT_API_PREFIX: &str = "/api/3";
pub const AUTHENTICATE_ENDPOINT: &str = "/auth/authenticate";
pub const API_KEY_VALIDATION_ENDPOINT: &str =
    const_format::concatcp!(DEFAULT_API_PREFIX, "/people");
