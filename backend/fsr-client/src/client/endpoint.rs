//! Base URL and endpoint path normalization.

use crate::DEFAULT_API_PREFIX;
use crate::error::FsrError;

use url::Url;

/// Paths that already carry an API prefix and are sent as given.
const RECOGNIZED_PREFIXES: [&str; 4] = ["/api/3/", "/auth/", "/api/public/", "/api/"];

/// Paths that need [`crate::Operation::Auth`].
const AUTH_PREFIXES: [&str; 2] = ["/auth/", "/api/auth/"];

/// `https://` is assumed when no scheme is given; trailing slashes are dropped.
///
/// # Errors
/// [`FsrError::InvalidInput`] for an empty value, [`FsrError::UrlParse`] when
/// the result is not a valid URL.
pub fn normalize_base_url(raw: &str) -> Result<String, FsrError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FsrError::invalid_input("Base URL is empty"));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let normalized = with_scheme.trim_end_matches('/').to_string();

    Url::parse(&normalized)?;
    Ok(normalized)
}

pub fn ensure_leading_slash(endpoint: &str) -> String {
    if endpoint.starts_with('/') {
        endpoint.to_string()
    } else {
        format!("/{endpoint}")
    }
}

pub fn is_auth_endpoint(path: &str) -> bool {
    AUTH_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Leading slash plus the default `/api/3` prefix for bare resource paths.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let path = ensure_leading_slash(endpoint);
    if RECOGNIZED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        path
    } else {
        format!("{DEFAULT_API_PREFIX}{path}")
    }
}
