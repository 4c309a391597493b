//! Shared building blocks for the FortiSOAR client workspace.
//!
//! Kept dependency-light so both the wire models and the HTTP client can use
//! the same error location tracking, status code helpers and secret wrapper.

pub mod error;
pub mod http_status;
pub mod redacted_secret;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;
