use crate::auth::Operation;
use crate::error::FsrError;
use crate::error::api::extract_message;

use common::HttpStatusCode;

const REQUEST: &str = "GET https://soar.example.com/api/3/alerts";

/// **VALUE**: Each platform status maps to its own error kind.
///
/// **WHY THIS MATTERS**: Callers branch on the kind (re-authenticate on 401, report
/// missing records on 404); a collapsed mapping would hide those cases.
#[test]
fn given_client_error_statuses_when_translated_then_kind_matches_status() {
    let cases: [(u16, fn(&FsrError) -> bool); 4] = [
        (400, |e| matches!(e, FsrError::Validation { .. })),
        (401, |e| matches!(e, FsrError::Authentication { .. })),
        (403, |e| matches!(e, FsrError::Permission { .. })),
        (404, |e| matches!(e, FsrError::ResourceNotFound { .. })),
    ];

    for (status, is_expected) in cases {
        let error = FsrError::from_http_response(status, "", REQUEST);
        assert!(is_expected(&error), "HTTP {status} mapped to {error:?}");
        assert_eq!(error.status_code(), Some(status));
    }
}

#[test]
fn given_server_error_when_translated_then_generic_api_error_keeps_status() {
    let error = FsrError::from_http_response(503, "maintenance", REQUEST);

    match &error {
        FsrError::Api {
            status,
            message,
            body,
            request,
            ..
        } => {
            assert_eq!(*status, HttpStatusCode(503));
            assert_eq!(message, "maintenance");
            assert_eq!(body, "maintenance");
            assert_eq!(request, REQUEST);
        }
        other => panic!("expected Api, got {other:?}"),
    }
    assert_eq!(error.error_category(), "server_error");
}

#[test]
fn given_json_body_with_message_when_translated_then_platform_message_is_used() {
    let body = r#"{"message":"Invalid field 'severity'","type":"ValidationException"}"#;

    let error = FsrError::from_http_response(400, body, REQUEST);

    assert_eq!(error.platform_message(), Some("Invalid field 'severity'"));
    assert!(error.to_string().contains("Invalid field 'severity'"));
}

#[test]
fn given_hydra_error_body_when_extracted_then_description_is_used() {
    let body = r#"{"@type":"hydra:Error","hydra:description":"Record not found"}"#;

    assert_eq!(extract_message(HttpStatusCode(404), body), "Record not found");
}

#[test]
fn given_empty_body_when_extracted_then_status_reason_is_used() {
    let message = extract_message(HttpStatusCode::FORBIDDEN, "");

    assert!(message.contains("403"), "{message}");
}

#[test]
fn given_plain_text_body_when_extracted_then_text_is_used() {
    assert_eq!(
        extract_message(HttpStatusCode(500), "  upstream exploded \n"),
        "upstream exploded"
    );
}

#[test]
fn given_unsupported_operation_when_displayed_then_names_operation_and_auth_type() {
    let error = FsrError::unsupported(Operation::ConfigExport, "ApiKeyAuth");

    let text = error.to_string();

    assert!(
        text.contains("Operation 'config_export' is not supported with ApiKeyAuth authentication")
    );
    assert_eq!(error.status_code(), None);
    assert!(!error.is_transport());
}

#[test]
fn given_unmapped_client_status_when_translated_then_categorized_as_client_error() {
    let error = FsrError::from_http_response(409, r#"{"message":"Duplicate record"}"#, REQUEST);

    assert!(matches!(error, FsrError::Api { .. }), "{error:?}");
    assert_eq!(error.status_code(), Some(409));
    assert_eq!(error.error_category(), "client_error");
}
