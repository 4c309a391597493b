use crate::helpers::{
    TEST_API_KEY, TEST_PASSWORD, TEST_TOKEN, TEST_USERNAME, hydra, unused_local_url, user_client,
};

use fsr_client::{ApiKeyAuth, AuthStrategy, ClientOptions, Credentials, FortiSoar, FsrError};

use common::RedactedSecret;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn auth_init_message(error: &FsrError) -> &str {
    match error {
        FsrError::AuthInit { message, .. } => message,
        other => panic!("expected AuthInit, got {other:?}"),
    }
}

// ----------------------------------------------------------------------------
// API key
// ----------------------------------------------------------------------------

/// **VALUE**: A valid key builds a strategy that stays valid on re-check.
#[tokio::test]
async fn given_accepted_api_key_when_constructed_then_valid_now_and_later() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/people"))
        .and(header("authorization", format!("API-KEY {TEST_API_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([]))))
        .expect(2)
        .mount(&server)
        .await;

    let auth = ApiKeyAuth::new(Client::new(), &server.uri(), RedactedSecret::new(TEST_API_KEY))
        .await
        .unwrap();

    assert!(auth.is_valid().await);
    assert_eq!(auth.auth_type(), "ApiKeyAuth");
    assert_eq!(
        auth.auth_headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok()),
        Some("application/json")
    );
}

/// **VALUE**: A rejected key never yields a strategy or a client.
///
/// **BUG THIS CATCHES**: Deferring validation would hand callers a client that fails
/// every request with a confusing 401 later on.
#[tokio::test]
async fn given_rejected_api_key_when_client_created_then_auth_init_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/people"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let error = FortiSoar::new(
        &server.uri(),
        Credentials::api_key("revoked"),
        ClientOptions::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(
        auth_init_message(&error),
        "Invalid API key - authentication failed"
    );
}

#[tokio::test]
async fn given_validation_server_error_when_constructed_then_message_has_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/people"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance window"))
        .mount(&server)
        .await;

    let error = ApiKeyAuth::new(Client::new(), &server.uri(), RedactedSecret::new("k"))
        .await
        .unwrap_err();

    assert_eq!(
        auth_init_message(&error),
        "API key validation failed with status 503: maintenance window"
    );
}

#[tokio::test]
async fn given_unreachable_platform_when_api_key_validated_then_request_failed_message() {
    let error = ApiKeyAuth::new(Client::new(), &unused_local_url(), RedactedSecret::new("k"))
        .await
        .unwrap_err();

    assert!(
        auth_init_message(&error).starts_with("API key validation request failed: "),
        "{error}"
    );
}

#[tokio::test]
async fn given_empty_api_key_when_constructed_then_rejected_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/3/people"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = ApiKeyAuth::new(Client::new(), &server.uri(), RedactedSecret::new("  ")).await;

    assert!(matches!(result, Err(FsrError::AuthInit { .. })));
}

#[tokio::test]
async fn given_key_revoked_after_construction_when_rechecked_then_invalid() {
    let server = MockServer::start().await;
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();
    Mock::given(method("GET"))
        .and(path("/api/3/people"))
        .respond_with(move |_request: &Request| {
            if calls_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(200).set_body_json(hydra(json!([])))
            } else {
                ResponseTemplate::new(401)
            }
        })
        .mount(&server)
        .await;

    let auth = ApiKeyAuth::new(Client::new(), &server.uri(), RedactedSecret::new("k"))
        .await
        .unwrap();

    assert!(!auth.is_valid().await);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ----------------------------------------------------------------------------
// Username / password
// ----------------------------------------------------------------------------

#[tokio::test]
async fn given_credentials_when_authenticated_then_bearer_token_is_used_afterwards() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/authenticate"))
        .and(body_json(json!({
            "credentials": {"loginid": TEST_USERNAME, "password": TEST_PASSWORD}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": TEST_TOKEN})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3/alerts"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = FortiSoar::new(
        &server.uri(),
        Credentials::user_password(TEST_USERNAME, TEST_PASSWORD),
        ClientOptions::default(),
    )
    .await
    .unwrap();
    client.alerts().list(&[]).await.unwrap();

    assert_eq!(client.auth().auth_type(), "UserPasswordAuth");
    assert!(client.auth().unsupported_operations().is_empty());
}

#[tokio::test]
async fn given_wrong_password_when_authenticated_then_auth_init_with_platform_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/authenticate"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let error = FortiSoar::new(
        &server.uri(),
        Credentials::user_password(TEST_USERNAME, "wrong"),
        ClientOptions::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(
        auth_init_message(&error),
        "Authentication failed with status 401: Invalid credentials"
    );
}

#[tokio::test]
async fn given_response_without_token_when_authenticated_then_auth_init_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": "csadmin"})))
        .mount(&server)
        .await;

    let result = FortiSoar::new(
        &server.uri(),
        Credentials::user_password(TEST_USERNAME, TEST_PASSWORD),
        ClientOptions::default(),
    )
    .await;

    assert!(matches!(result, Err(FsrError::AuthInit { .. })));
}

#[tokio::test]
async fn given_user_client_when_debug_formatted_then_token_is_hidden() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;

    let text = format!("{client:?} {:?}", client.auth());

    assert!(!text.contains(TEST_TOKEN), "{text}");
    assert!(!text.contains(TEST_PASSWORD), "{text}");
}
