use super::{AuthStrategy, Operation, session_headers};
use crate::API_KEY_VALIDATION_ENDPOINT;
use crate::error::FsrError;

use common::RedactedSecret;

use log::{debug, warn};
use reqwest::Client;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

const API_KEY_UNSUPPORTED: &[Operation] = &[Operation::Auth, Operation::ConfigExport];

/// API key authentication.
///
/// API keys cannot call `/auth` endpoints and cannot export configuration.
/// The key is checked against the platform when the strategy is built.
#[derive(Debug)]
pub struct ApiKeyAuth {
    api_key: RedactedSecret,
    base_url: String,
    http: Client,
    headers: HeaderMap,
}

impl ApiKeyAuth {
    /// Build and validate.
    ///
    /// # Errors
    /// [`FsrError::AuthInit`] when the key is empty, rejected (401), the
    /// validation call returns anything but 200, or the platform is unreachable.
    pub async fn new(
        http: Client,
        base_url: &str,
        api_key: RedactedSecret,
    ) -> Result<Self, FsrError> {
        if api_key.is_empty() {
            return Err(FsrError::auth_init("API key is empty"));
        }

        let headers = session_headers(&format!("API-KEY {}", api_key.expose()))?;
        let auth = Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            headers,
        };

        auth.validate().await?;
        debug!("API key validated ({} chars)", auth.api_key.len());
        Ok(auth)
    }

    /// Re-run the validation request.
    ///
    /// # Errors
    /// See [`ApiKeyAuth::new`].
    pub async fn validate(&self) -> Result<(), FsrError> {
        let url = format!("{}{API_KEY_VALIDATION_ENDPOINT}", self.base_url);

        let response = self
            .http
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| FsrError::auth_init(format!("API key validation request failed: {e}")))?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::UNAUTHORIZED => {
                warn!("API key rejected by {}", self.base_url);
                Err(FsrError::auth_init("Invalid API key - authentication failed"))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(FsrError::auth_init(format!(
                    "API key validation failed with status {}: {body}",
                    status.as_u16()
                )))
            }
        }
    }

    /// Whether the key currently passes validation.
    pub async fn is_valid(&self) -> bool {
        self.validate().await.is_ok()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl AuthStrategy for ApiKeyAuth {
    fn auth_type(&self) -> &'static str {
        "ApiKeyAuth"
    }

    fn auth_headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    fn unsupported_operations(&self) -> &[Operation] {
        API_KEY_UNSUPPORTED
    }
}
