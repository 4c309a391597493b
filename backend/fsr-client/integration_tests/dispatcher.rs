use crate::helpers::{CapturedLog, StaticTokenAuth, api_key_client, hydra, unused_local_url};

use fsr_client::{ApiRequest, ClientOptions, FortiSoar, FsrError, ResponseBody};

use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

// ----------------------------------------------------------------------------
// Error translation
// ----------------------------------------------------------------------------

/// **VALUE**: Every rejection status becomes its own error kind carrying the
/// platform's message.
///
/// **WHY THIS MATTERS**: Callers decide what to do from the kind and show the
/// platform's text to users; a generic "request failed" is useless to them.
#[tokio::test]
async fn given_rejection_statuses_when_requested_then_typed_errors_keep_platform_message() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;

    for status in [400u16, 401, 403, 404, 500] {
        let message = format!("platform says {status}");
        Mock::given(method("GET"))
            .and(path(format!("/api/3/status_{status}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({"message": message})))
            .mount(&server)
            .await;

        let error = client
            .get(&format!("status_{status}"), &[])
            .await
            .unwrap_err();

        let kind_matches = match status {
            400 => matches!(error, FsrError::Validation { .. }),
            401 => matches!(error, FsrError::Authentication { .. }),
            403 => matches!(error, FsrError::Permission { .. }),
            404 => matches!(error, FsrError::ResourceNotFound { .. }),
            _ => matches!(error, FsrError::Api { .. }),
        };
        assert!(kind_matches, "HTTP {status} mapped to {error:?}");
        assert_eq!(error.status_code(), Some(status));
        assert!(error.to_string().contains(&message), "{error}");
    }
}

#[tokio::test]
async fn given_failed_request_when_translated_then_request_context_is_kept() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/3/alerts/42"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such alert"))
        .mount(&server)
        .await;

    let error = client.delete("alerts/42", &[]).await.unwrap_err();

    match error {
        FsrError::ResourceNotFound {
            message,
            body,
            request,
            ..
        } => {
            assert_eq!(message, "no such alert");
            assert_eq!(body, "no such alert");
            assert!(request.starts_with("DELETE "), "{request}");
            assert!(request.ends_with("/api/3/alerts/42"), "{request}");
        }
        other => panic!("expected ResourceNotFound, got {other:?}"),
    }
}

/// **VALUE**: An unreachable platform surfaces as the untouched transport error.
///
/// **BUG THIS CATCHES**: Wrapping connection failures as `Api` errors would make
/// "platform down" indistinguishable from "platform rejected the call".
#[tokio::test]
async fn given_unreachable_platform_when_requested_then_transport_error_is_not_wrapped() {
    let client = FortiSoar::with_auth(
        &unused_local_url(),
        StaticTokenAuth::boxed(),
        ClientOptions::default(),
    )
    .unwrap();

    let error = client.get("alerts", &[]).await.unwrap_err();

    assert!(error.is_transport(), "{error:?}");
    assert!(matches!(error, FsrError::Transport(ref e) if e.is_connect()));
    assert_eq!(error.status_code(), None);
}

// ----------------------------------------------------------------------------
// Content negotiation
// ----------------------------------------------------------------------------

#[tokio::test]
async fn given_json_response_when_get_then_parsed_body_equals_payload() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    let payload = hydra(json!([{"@id": "/api/3/alerts/1", "name": "Phishing"}]));
    Mock::given(method("GET"))
        .and(path("/api/3/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .mount(&server)
        .await;

    let body = client.get("/api/3/alerts", &[]).await.unwrap();

    assert_eq!(body, ResponseBody::Json(payload));
}

#[tokio::test]
async fn given_binary_responses_when_get_then_bytes_are_unchanged() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    let payload: &[u8] = b"PK\x03\x04\x00\xffbinary";

    for (file, mime) in [("a.zip", "application/zip"), ("a.bin", "application/octet-stream")] {
        Mock::given(method("GET"))
            .and(path(format!("/api/3/files/{file}")))
            .respond_with(ResponseTemplate::new(200).set_body_raw(payload, mime))
            .mount(&server)
            .await;

        let body = client.get(&format!("/api/3/files/{file}"), &[]).await.unwrap();

        assert_eq!(body, ResponseBody::Bytes(Bytes::from_static(payload)));
    }
}

#[tokio::test]
async fn given_html_response_when_get_then_decode_error() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/3/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let result = client.get("dashboard", &[]).await;

    assert!(matches!(result, Err(FsrError::Decode { .. })));
}

// ----------------------------------------------------------------------------
// Request construction
// ----------------------------------------------------------------------------

#[tokio::test]
async fn given_params_and_body_when_put_then_both_reach_the_platform() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/3/alerts/7"))
        .and(query_param("$relationships", "true"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"severity": "High"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"@id": "/api/3/alerts/7"})))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client
        .put(
            "alerts/7",
            Some(json!({"severity": "High"})),
            &[("$relationships", "true")],
        )
        .await
        .unwrap();

    assert_eq!(updated["@id"], "/api/3/alerts/7");
}

/// **VALUE**: Per-call headers override the session's headers.
#[tokio::test]
async fn given_per_call_authorization_when_requested_then_it_replaces_session_header() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/3/alerts"))
        .and(header("authorization", "Bearer delegated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .request(
            ApiRequest::get("alerts")
                .with_header(AUTHORIZATION, HeaderValue::from_static("Bearer delegated")),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn given_session_when_requested_then_api_key_header_is_sent() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/query/alerts"))
        .and(header(
            "authorization",
            format!("API-KEY {}", crate::helpers::TEST_API_KEY).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .query("alerts", json!({"logic": "AND", "filters": []}))
        .await
        .unwrap();

    assert_eq!(result["hydra:totalItems"], 0);
}

/// **VALUE**: File uploads go out as multipart, with scalar body fields as text parts.
///
/// **BUG THIS CATCHES**: Keeping the session's `application/json` content type would
/// strip the multipart boundary and the platform would reject the upload.
#[tokio::test]
async fn given_file_and_body_when_requested_then_multipart_form_is_sent() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/3/files"))
        .and(|request: &Request| {
            let content_type = request
                .headers
                .get("content-type")
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            let body = String::from_utf8_lossy(&request.body);
            content_type.starts_with("multipart/form-data; boundary=")
                && body.contains("filename=\"notes.txt\"")
                && body.contains("hello platform")
                && body.contains("name=\"isPrivate\"")
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"@id": "/api/3/files/1"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .request(
            ApiRequest::post("files")
                .with_file(fsr_client::FilePart::new("notes.txt", "hello platform"))
                .with_body(json!({"isPrivate": false, "nested": {"ignored": true}})),
        )
        .await
        .unwrap();

    assert_eq!(response.json().unwrap()["@id"], "/api/3/files/1");
}

// ----------------------------------------------------------------------------
// Verbose tracing
// ----------------------------------------------------------------------------

#[tokio::test]
async fn given_verbose_client_when_requested_then_trace_goes_to_its_own_sink() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([]))))
        .mount(&server)
        .await;
    let sink = Arc::new(CapturedLog::default());
    let client = FortiSoar::with_auth(
        &server.uri(),
        StaticTokenAuth::boxed(),
        ClientOptions::default()
            .with_verbose(true)
            .with_log_sink(sink.clone()),
    )
    .unwrap();

    client.get("alerts", &[("$limit", "5")]).await.unwrap();

    let lines = sink.lines();
    assert!(lines.iter().any(|line| line.starts_with("Request: GET ")), "{lines:?}");
    assert!(lines.iter().any(|line| line.contains("param $limit: 5")), "{lines:?}");
    assert!(lines.iter().any(|line| line.starts_with("Response: HTTP 200")), "{lines:?}");
    assert!(lines.iter().any(|line| line.contains("hydra:totalItems")), "{lines:?}");
}

#[tokio::test]
async fn given_quiet_client_when_requested_then_sink_receives_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([]))))
        .mount(&server)
        .await;
    let sink = Arc::new(CapturedLog::default());
    let client = FortiSoar::with_auth(
        &server.uri(),
        StaticTokenAuth::boxed(),
        ClientOptions::default().with_log_sink(sink.clone()),
    )
    .unwrap();

    client.get("alerts", &[]).await.unwrap();

    assert!(sink.lines().is_empty());
}
