use crate::helpers::{StaticTokenAuth, api_key_client, fast_poll, user_client};

use fsr_client::{ClientOptions, FortiSoar, FsrError, Operation};

use models::{ExportOptions, ExportTemplateSpec};

use std::path::Path;

use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn assert_unsupported(error: FsrError, expected: Operation) {
    match error {
        FsrError::UnsupportedOperation {
            operation,
            auth_type,
            ..
        } => {
            assert_eq!(operation, expected);
            assert_eq!(auth_type, "ApiKeyAuth");
        }
        other => panic!("expected UnsupportedOperation, got {other:?}"),
    }
}

/// Any request other than the API key validation is a failure.
async fn forbid_everything_else(server: &MockServer) {
    Mock::given(path_regex("^/(auth|api/(auth|export|3/export_templates|3/picklist_names|query))"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .named("gated endpoints")
        .mount(server)
        .await;
}

/// **VALUE**: API keys cannot reach `/auth/` endpoints, and the check happens
/// before any network call.
///
/// **BUG THIS CATCHES**: Checking after normalization (or not at all) would send
/// API-key traffic to endpoints the platform only accepts with a session token.
#[tokio::test]
async fn given_api_key_client_when_calling_auth_endpoints_then_rejected_without_io() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    forbid_everything_else(&server).await;

    for endpoint in ["/auth/authenticate", "auth/token", "/api/auth/license"] {
        let error = client.post(endpoint, json!({})).await.unwrap_err();
        assert_unsupported(error, Operation::Auth);
    }
}

#[tokio::test]
async fn given_api_key_client_when_exporting_then_every_entry_point_rejects_without_io() {
    let server = MockServer::start().await;
    let client = api_key_client(&server).await;
    forbid_everything_else(&server).await;
    let exports = client.export_config();
    let poll = fast_poll();
    let spec = ExportTemplateSpec::new("Alert Export").with_picklist("AlertStatus");

    assert_unsupported(
        exports.trigger_export("tpl-1", "alerts.json").await.unwrap_err(),
        Operation::ConfigExport,
    );
    assert_unsupported(
        exports
            .create_export_template("Alert Export", ExportOptions::default(), None)
            .await
            .unwrap_err(),
        Operation::ConfigExport,
    );
    assert_unsupported(
        exports.create_simplified_template(&spec).await.unwrap_err(),
        Operation::ConfigExport,
    );
    assert_unsupported(
        exports.export_config(&spec, None, &poll).await.unwrap_err(),
        Operation::ConfigExport,
    );
    assert_unsupported(
        exports
            .export_by_template_name("Nightly", None, &poll)
            .await
            .unwrap_err(),
        Operation::ConfigExport,
    );
    assert_unsupported(
        exports
            .export_by_template_uuid("tpl-1", Some(Path::new("out.json")), &poll)
            .await
            .unwrap_err(),
        Operation::ConfigExport,
    );
    assert_unsupported(
        client
            .solution_packs()
            .export_pack("SOAR Framework", None, &poll)
            .await
            .unwrap_err(),
        Operation::ConfigExport,
    );
}

#[tokio::test]
async fn given_user_client_when_calling_auth_endpoint_then_request_is_sent() {
    let server = MockServer::start().await;
    let client = user_client(&server).await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.post("/auth/logout", json!({})).await.unwrap();

    assert_eq!(result["ok"], true);
}

#[tokio::test]
async fn given_custom_strategy_forbidding_packs_when_exporting_pack_then_rejected() {
    let server = MockServer::start().await;
    Mock::given(path_regex("^/api/query/solutionpacks"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let client = FortiSoar::with_auth(
        &server.uri(),
        Box::new(StaticTokenAuth {
            forbidden: vec![Operation::SolutionPack],
        }),
        ClientOptions::default(),
    )
    .unwrap();

    let error = client
        .solution_packs()
        .export_pack("SOAR Framework", None, &fast_poll())
        .await
        .unwrap_err();

    assert!(
        matches!(
            error,
            FsrError::UnsupportedOperation {
                operation: Operation::SolutionPack,
                auth_type: "StaticTokenAuth",
                ..
            }
        ),
        "{error:?}"
    );
}
