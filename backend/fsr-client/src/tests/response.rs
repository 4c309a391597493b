use crate::client::{ApiResponse, ResponseBody};
use crate::error::FsrError;

use std::time::Duration;

use bytes::Bytes;
use serde_json::json;

fn response(content_type: &str, body: &'static [u8]) -> ApiResponse {
    ApiResponse {
        status: 200,
        content_type: content_type.to_string(),
        body: Bytes::from_static(body),
        elapsed: Duration::from_millis(5),
    }
}

#[test]
fn given_json_content_type_when_decoded_then_json() {
    let decoded = response("application/json; charset=utf-8", br#"{"id":1}"#)
        .decode()
        .unwrap();

    assert_eq!(decoded, ResponseBody::Json(json!({"id": 1})));
}

/// **VALUE**: Export artifacts come back byte-for-byte.
///
/// **BUG THIS CATCHES**: Attempting a JSON parse on zip payloads would fail every
/// binary download with a decode error.
#[test]
fn given_binary_content_types_when_decoded_then_raw_bytes() {
    for content_type in ["application/zip", "application/octet-stream"] {
        let decoded = response(content_type, b"PK\x03\x04").decode().unwrap();

        assert_eq!(decoded, ResponseBody::Bytes(Bytes::from_static(b"PK\x03\x04")));
    }
}

#[test]
fn given_unlabelled_json_when_decoded_then_json_is_attempted() {
    let decoded = response("text/plain", b"[1,2]").decode().unwrap();

    assert_eq!(decoded.as_json(), Some(&json!([1, 2])));
}

#[test]
fn given_unlabelled_non_json_when_decoded_then_decode_error() {
    let result = response("text/html", b"<html>login</html>").decode();

    assert!(matches!(result, Err(FsrError::Decode { .. })));
}

#[test]
fn given_empty_body_when_read_as_json_then_null() {
    let empty = ApiResponse {
        status: 204,
        ..response("", b"")
    };

    assert_eq!(empty.json().unwrap(), serde_json::Value::Null);
}

#[test]
fn given_bytes_body_when_converted_to_json_then_decode_error() {
    let result = ResponseBody::Bytes(Bytes::from_static(b"\x00")).into_json();

    assert!(matches!(result, Err(FsrError::Decode { .. })));
}
