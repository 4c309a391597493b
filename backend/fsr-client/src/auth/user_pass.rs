use super::{AuthStrategy, Operation, session_headers};
use crate::AUTHENTICATE_ENDPOINT;
use crate::error::FsrError;
use crate::error::api::extract_message;

use common::{HttpStatusCode, RedactedSecret};

use log::{debug, warn};
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

/// Username/password authentication, exchanged once for a bearer token.
///
/// The token is never refreshed; once it expires requests fail with
/// [`FsrError::Authentication`].
#[derive(Debug)]
pub struct UserPasswordAuth {
    username: String,
    token: RedactedSecret,
    headers: HeaderMap,
}

impl UserPasswordAuth {
    /// # Errors
    /// [`FsrError::AuthInit`] when the authenticate call fails, returns a
    /// non-2xx status or yields no token.
    pub async fn new(
        http: &Client,
        base_url: &str,
        username: impl Into<String>,
        password: &RedactedSecret,
    ) -> Result<Self, FsrError> {
        let username = username.into();
        let url = format!("{}{AUTHENTICATE_ENDPOINT}", base_url.trim_end_matches('/'));
        let payload = json!({
            "credentials": {
                "loginid": username,
                "password": password.expose(),
            }
        });

        let response = http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| FsrError::auth_init(format!("Authentication request failed: {e}")))?;

        let status = HttpStatusCode::from(response.status().as_u16());
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Authentication for '{username}' rejected with HTTP {status}");
            return Err(FsrError::auth_init(format!(
                "Authentication failed with status {status}: {}",
                extract_message(status, &body)
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| FsrError::auth_init(format!("Authentication response unreadable: {e}")))?;
        let token = body
            .token
            .filter(|token| !token.is_empty())
            .map(RedactedSecret::new)
            .ok_or_else(|| FsrError::auth_init("Authentication response did not contain a token"))?;

        let headers = session_headers(&format!("Bearer {}", token.expose()))?;
        debug!("Authenticated as '{username}'");

        Ok(Self {
            username,
            token,
            headers,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &RedactedSecret {
        &self.token
    }
}

impl AuthStrategy for UserPasswordAuth {
    fn auth_type(&self) -> &'static str {
        "UserPasswordAuth"
    }

    fn auth_headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    fn unsupported_operations(&self) -> &[Operation] {
        &[]
    }
}
