//! Credential strategies and the capability model.
//!
//! A strategy produces the session headers and declares which operations it
//! cannot perform. The dispatcher and workflows call
//! [`AuthStrategy::check_operation_supported`] before any network I/O.

pub mod api_key;
pub mod user_pass;

pub use api_key::ApiKeyAuth;
pub use user_pass::UserPasswordAuth;

use crate::error::FsrError;

use common::RedactedSecret;

use std::fmt;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

/// Capabilities a strategy may refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Calls to `/auth/` endpoints.
    Auth,
    ConfigExport,
    ConfigImport,
    Playbook,
    SolutionPack,
}

impl Operation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::Auth => "auth",
            Operation::ConfigExport => "config_export",
            Operation::ConfigImport => "config_import",
            Operation::Playbook => "playbook",
            Operation::SolutionPack => "solution_pack",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait AuthStrategy: Send + Sync + fmt::Debug {
    /// Name used in error messages, e.g. `ApiKeyAuth`.
    fn auth_type(&self) -> &'static str;

    /// Headers attached to every request of the session.
    fn auth_headers(&self) -> HeaderMap;

    fn unsupported_operations(&self) -> &[Operation];

    /// # Errors
    /// [`FsrError::UnsupportedOperation`] when `operation` is refused.
    fn check_operation_supported(&self, operation: Operation) -> Result<(), FsrError> {
        if self.unsupported_operations().contains(&operation) {
            return Err(FsrError::unsupported(operation, self.auth_type()));
        }
        Ok(())
    }
}

/// What the caller hands to [`crate::FortiSoar::new`].
#[derive(Debug, Clone)]
pub enum Credentials {
    ApiKey(RedactedSecret),
    UserPassword {
        username: String,
        password: RedactedSecret,
    },
}

impl Credentials {
    pub fn api_key(key: impl Into<String>) -> Self {
        Credentials::ApiKey(RedactedSecret::new(key))
    }

    pub fn user_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::UserPassword {
            username: username.into(),
            password: RedactedSecret::new(password),
        }
    }

    /// Build the matching strategy. Both variants talk to the platform here.
    pub(crate) async fn into_strategy(
        self,
        http: &Client,
        base_url: &str,
    ) -> Result<Box<dyn AuthStrategy>, FsrError> {
        match self {
            Credentials::ApiKey(key) => {
                let auth = ApiKeyAuth::new(http.clone(), base_url, key).await?;
                Ok(Box::new(auth))
            }
            Credentials::UserPassword { username, password } => {
                let auth = UserPasswordAuth::new(http, base_url, username, &password).await?;
                Ok(Box::new(auth))
            }
        }
    }
}

/// `Authorization` (marked sensitive) plus JSON content type.
#[track_caller]
fn session_headers(authorization: &str) -> Result<HeaderMap, FsrError> {
    let mut value = HeaderValue::from_str(authorization).map_err(|_| {
        FsrError::auth_init("Credential contains characters not allowed in a header")
    })?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}
