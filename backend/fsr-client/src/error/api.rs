//! Translation of platform rejections into [`FsrError`].
//!
//! 400 → `Validation`, 401 → `Authentication`, 403 → `Permission`,
//! 404 → `ResourceNotFound`, anything else ≥ 400 → `Api`.

use super::FsrError;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use serde_json::Value;

/// Largest body kept verbatim as an error message.
const MAX_MESSAGE_CHARS: usize = 1000;

impl FsrError {
    /// Translate a failed response.
    ///
    /// `request` is the failing call ("METHOD url") kept for logs.
    #[track_caller]
    pub fn from_http_response(status: u16, body: &str, request: impl Into<String>) -> Self {
        let status = HttpStatusCode(status);
        let message = extract_message(status, body);
        let body = body.to_string();
        let request = request.into();
        let location = ErrorLocation::from(Location::caller());

        match status.0 {
            400 => FsrError::Validation {
                message,
                body,
                request,
                location,
            },
            401 => FsrError::Authentication {
                message,
                body,
                request,
                location,
            },
            403 => FsrError::Permission {
                message,
                body,
                request,
                location,
            },
            404 => FsrError::ResourceNotFound {
                message,
                body,
                request,
                location,
            },
            _ => FsrError::Api {
                status,
                message,
                body,
                request,
                location,
            },
        }
    }
}

/// Platform message for a failed response.
///
/// Prefers the JSON `message` field, then `hydra:description`, then the raw
/// body, and falls back to the status reason for empty bodies.
pub fn extract_message(status: HttpStatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "hydra:description", "error"] {
            if let Some(Value::String(message)) = map.get(key) {
                if !message.is_empty() {
                    return message.clone();
                }
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("HTTP {} {}", status, status.reason());
    }

    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        let truncated: String = trimmed.chars().take(MAX_MESSAGE_CHARS).collect();
        return format!("{truncated}...");
    }

    trimmed.to_string()
}
