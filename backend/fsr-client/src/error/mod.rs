pub mod api;
pub mod config;
pub mod logger;

pub use config::ConfigError;
pub use logger::LoggerError;

use crate::auth::Operation;

use common::{ErrorLocation, HttpStatusCode};
use models::ModelError;

use std::fmt;
use std::panic::Location;
use std::path::PathBuf;

use thiserror::Error as ThisError;

/// Entities the client resolves by name before an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupEntity {
    Picklist,
    Connector,
    PlaybookCollection,
    ExportTemplate,
    SolutionPack,
}

impl fmt::Display for LookupEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Picklist => "Picklist",
            Self::Connector => "Connector",
            Self::PlaybookCollection => "Playbook collection",
            Self::ExportTemplate => "Export template",
            Self::SolutionPack => "Solution pack",
        };
        f.write_str(name)
    }
}

/// Every failure the client can report.
///
/// Platform rejections (`Validation` through `Api`) keep the status, the
/// platform message, the raw body and the failing request. `Transport` is the
/// untouched reqwest error for calls that never got a response, so callers
/// can tell "rejected" apart from "unreachable".
#[derive(Debug, ThisError)]
pub enum FsrError {
    #[error("Validation Error: {message} ({request}) {location}")]
    Validation {
        message: String,
        body: String,
        request: String,
        location: ErrorLocation,
    },

    #[error("Authentication Error: {message} ({request}) {location}")]
    Authentication {
        message: String,
        body: String,
        request: String,
        location: ErrorLocation,
    },

    #[error("Permission Error: {message} ({request}) {location}")]
    Permission {
        message: String,
        body: String,
        request: String,
        location: ErrorLocation,
    },

    #[error("Resource Not Found Error: {message} ({request}) {location}")]
    ResourceNotFound {
        message: String,
        body: String,
        request: String,
        location: ErrorLocation,
    },

    #[error("API Error: HTTP {status} - {message} ({request}) {location}")]
    Api {
        status: HttpStatusCode,
        message: String,
        body: String,
        request: String,
        location: ErrorLocation,
    },

    #[error(
        "Unsupported Operation Error: Operation '{operation}' is not supported with {auth_type} authentication {location}"
    )]
    UnsupportedOperation {
        operation: Operation,
        auth_type: &'static str,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Transport(reqwest::Error),

    #[error("Decode Error: {message} {location}")]
    Decode {
        message: String,
        location: ErrorLocation,
    },

    #[error("Auth Error: {message} {location}")]
    AuthInit {
        message: String,
        location: ErrorLocation,
    },

    #[error("Lookup Error: {entity} not found: {name} {location}")]
    LookupNotFound {
        entity: LookupEntity,
        name: String,
        location: ErrorLocation,
    },

    #[error("Invalid Input Error: {message} {location}")]
    InvalidInput {
        message: String,
        location: ErrorLocation,
    },

    #[error("IO Error: {path}: {source} {location}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Poll Timeout Error: export job {job_uuid} not complete after {polls} polls ({elapsed_secs}s) {location}")]
    PollTimeout {
        job_uuid: String,
        polls: u32,
        elapsed_secs: u64,
        location: ErrorLocation,
    },

    #[error("Cancelled Error: polling of export job {job_uuid} was cancelled {location}")]
    Cancelled {
        job_uuid: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl FsrError {
    #[track_caller]
    pub fn unsupported(operation: Operation, auth_type: &'static str) -> Self {
        FsrError::UnsupportedOperation {
            operation,
            auth_type,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn auth_init(message: impl Into<String>) -> Self {
        FsrError::AuthInit {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_found(entity: LookupEntity, name: impl Into<String>) -> Self {
        FsrError::LookupNotFound {
            entity,
            name: name.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        FsrError::InvalidInput {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn decode(message: impl Into<String>) -> Self {
        FsrError::Decode {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FsrError::Io {
            path: path.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// HTTP status of a platform rejection.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FsrError::Validation { .. } => Some(HttpStatusCode::BAD_REQUEST.0),
            FsrError::Authentication { .. } => Some(HttpStatusCode::UNAUTHORIZED.0),
            FsrError::Permission { .. } => Some(HttpStatusCode::FORBIDDEN.0),
            FsrError::ResourceNotFound { .. } => Some(HttpStatusCode::NOT_FOUND.0),
            FsrError::Api { status, .. } => Some(status.0),
            FsrError::Transport(error) => error.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Platform message of a rejection, if this error is one.
    pub fn platform_message(&self) -> Option<&str> {
        match self {
            FsrError::Validation { message, .. }
            | FsrError::Authentication { message, .. }
            | FsrError::Permission { message, .. }
            | FsrError::ResourceNotFound { message, .. }
            | FsrError::Api { message, .. } => Some(message),
            _ => None,
        }
    }

    /// True when the platform was never reached.
    pub fn is_transport(&self) -> bool {
        matches!(self, FsrError::Transport(_))
    }

    /// Short category name for logs.
    pub fn error_category(&self) -> &'static str {
        match self {
            FsrError::Validation { .. } => "validation",
            FsrError::Authentication { .. } => "authentication",
            FsrError::Permission { .. } => "permission",
            FsrError::ResourceNotFound { .. } => "not_found",
            FsrError::Api { status, .. } if status.is_server_error() => "server_error",
            FsrError::Api { status, .. } if status.is_client_error() => "client_error",
            FsrError::Api { .. } => "api",
            FsrError::UnsupportedOperation { .. } => "unsupported_operation",
            FsrError::Transport(error) if error.is_timeout() => "timeout",
            FsrError::Transport(error) if error.is_connect() => "connection",
            FsrError::Transport(_) => "transport",
            FsrError::Decode { .. } => "decode",
            FsrError::AuthInit { .. } => "auth",
            FsrError::LookupNotFound { .. } => "lookup",
            FsrError::InvalidInput { .. } => "invalid_input",
            FsrError::Io { .. } => "io",
            FsrError::PollTimeout { .. } => "poll_timeout",
            FsrError::Cancelled { .. } => "cancelled",
            FsrError::UrlParse { .. } => "url_parse",
            FsrError::Config(_) => "config",
        }
    }
}

impl From<reqwest::Error> for FsrError {
    fn from(error: reqwest::Error) -> Self {
        FsrError::Transport(error)
    }
}

impl From<url::ParseError> for FsrError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        FsrError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for FsrError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        FsrError::Decode {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ModelError> for FsrError {
    #[track_caller]
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::InvalidTemplate {
                template,
                message,
                location,
            } => FsrError::InvalidInput {
                message: format!("Export template '{template}': {message}"),
                location,
            },
        }
    }
}
