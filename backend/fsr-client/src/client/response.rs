use crate::error::FsrError;

use std::time::Duration;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

const JSON_CONTENT_TYPE: &str = "application/json";
const BINARY_CONTENT_TYPES: [&str; 2] = ["application/zip", "application/octet-stream"];

/// A successful response, body fully read.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Bytes,
    pub elapsed: Duration,
}

/// Decoded body: parsed JSON or raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Bytes(Bytes),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Bytes(_) => None,
        }
    }

    /// # Errors
    /// [`FsrError::Decode`] when the body is binary.
    #[track_caller]
    pub fn into_json(self) -> Result<Value, FsrError> {
        match self {
            ResponseBody::Json(value) => Ok(value),
            ResponseBody::Bytes(bytes) => Err(FsrError::decode(format!(
                "Expected a JSON response, got {} bytes of binary content",
                bytes.len()
            ))),
        }
    }
}

impl ApiResponse {
    pub fn is_json(&self) -> bool {
        self.content_type.contains(JSON_CONTENT_TYPE)
    }

    pub fn is_binary(&self) -> bool {
        BINARY_CONTENT_TYPES
            .iter()
            .any(|binary| self.content_type.contains(binary))
    }

    /// JSON for `application/json`, bytes for zip/octet-stream, and a JSON
    /// parse attempt for anything else.
    ///
    /// # Errors
    /// [`FsrError::Decode`] when a non-binary body is not valid JSON.
    pub fn decode(self) -> Result<ResponseBody, FsrError> {
        if !self.is_json() && self.is_binary() {
            return Ok(ResponseBody::Bytes(self.body));
        }
        self.json().map(ResponseBody::Json)
    }

    /// Parse the body as JSON. An empty body reads as `null`.
    ///
    /// # Errors
    /// [`FsrError::Decode`] when the body is not valid JSON.
    pub fn json(&self) -> Result<Value, FsrError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// # Errors
    /// [`FsrError::Decode`] when the body does not deserialize into `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T, FsrError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
