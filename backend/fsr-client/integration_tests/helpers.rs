//! Shared setup for the HTTP integration tests.
//!
//! - authenticated clients against a `wiremock` server
//! - a custom auth strategy for tests that must not authenticate
//! - a capturing log sink for verbose tracing

use fsr_client::{AuthStrategy, ClientOptions, Credentials, FortiSoar, Operation, PollOptions};

use std::sync::Mutex;
use std::time::Duration;

use log::{Log, Metadata, Record};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key-0001";
pub const TEST_USERNAME: &str = "csadmin";
pub const TEST_PASSWORD: &str = "changeme";
pub const TEST_TOKEN: &str = "test-bearer-token";

/// Client authenticated with an API key; mounts the validation endpoint.
pub async fn api_key_client(server: &MockServer) -> FortiSoar {
    Mock::given(method("GET"))
        .and(path("/api/3/people"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hydra(json!([]))))
        .named("api key validation")
        .mount(server)
        .await;

    FortiSoar::new(
        &server.uri(),
        Credentials::api_key(TEST_API_KEY),
        ClientOptions::default(),
    )
    .await
    .expect("api key client")
}

/// Client authenticated with username/password; mounts the authenticate endpoint.
pub async fn user_client(server: &MockServer) -> FortiSoar {
    Mock::given(method("POST"))
        .and(path("/auth/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": TEST_TOKEN})))
        .named("authenticate")
        .mount(server)
        .await;

    FortiSoar::new(
        &server.uri(),
        Credentials::user_password(TEST_USERNAME, TEST_PASSWORD),
        ClientOptions::default(),
    )
    .await
    .expect("user/password client")
}

/// Hydra collection envelope around `members`.
pub fn hydra(members: Value) -> Value {
    let total = members.as_array().map_or(0, Vec::len);
    json!({
        "@type": "hydra:Collection",
        "hydra:member": members,
        "hydra:totalItems": total,
    })
}

pub fn fast_poll() -> PollOptions {
    PollOptions::new(Duration::from_millis(10))
}

/// A URL nothing listens on.
pub fn unused_local_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Fixed-header strategy that performs no I/O of its own.
#[derive(Debug)]
pub struct StaticTokenAuth {
    pub forbidden: Vec<Operation>,
}

impl StaticTokenAuth {
    pub fn boxed() -> Box<dyn AuthStrategy> {
        Box::new(Self {
            forbidden: Vec::new(),
        })
    }
}

impl AuthStrategy for StaticTokenAuth {
    fn auth_type(&self) -> &'static str {
        "StaticTokenAuth"
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer static"));
        headers
    }

    fn unsupported_operations(&self) -> &[Operation] {
        &self.forbidden
    }
}

/// Log sink that keeps every message.
#[derive(Default)]
pub struct CapturedLog {
    lines: Mutex<Vec<String>>,
}

impl CapturedLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("log lines").clone()
    }
}

impl Log for CapturedLog {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.lines
            .lock()
            .expect("log lines")
            .push(record.args().to_string());
    }

    fn flush(&self) {}
}
