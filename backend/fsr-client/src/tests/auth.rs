use crate::auth::{AuthStrategy, Credentials, Operation};
use crate::error::FsrError;

use reqwest::header::HeaderMap;

#[derive(Debug)]
struct ReadOnlyAuth;

impl AuthStrategy for ReadOnlyAuth {
    fn auth_type(&self) -> &'static str {
        "ReadOnlyAuth"
    }

    fn auth_headers(&self) -> HeaderMap {
        HeaderMap::new()
    }

    fn unsupported_operations(&self) -> &[Operation] {
        &[Operation::ConfigImport, Operation::Playbook]
    }
}

#[test]
fn given_operation_tags_when_displayed_then_snake_case_names() {
    assert_eq!(Operation::Auth.to_string(), "auth");
    assert_eq!(Operation::ConfigExport.to_string(), "config_export");
    assert_eq!(Operation::ConfigImport.to_string(), "config_import");
    assert_eq!(Operation::Playbook.to_string(), "playbook");
    assert_eq!(Operation::SolutionPack.to_string(), "solution_pack");
}

/// **VALUE**: Custom strategies get capability gating from the default method.
///
/// **BUG THIS CATCHES**: A default `check_operation_supported` that ignored
/// `unsupported_operations()` would let restricted strategies reach the network.
#[test]
fn given_custom_strategy_when_checking_operations_then_only_listed_ones_fail() {
    let auth = ReadOnlyAuth;

    assert!(auth.check_operation_supported(Operation::ConfigExport).is_ok());

    let error = auth
        .check_operation_supported(Operation::Playbook)
        .unwrap_err();
    match error {
        FsrError::UnsupportedOperation {
            operation,
            auth_type,
            ..
        } => {
            assert_eq!(operation, Operation::Playbook);
            assert_eq!(auth_type, "ReadOnlyAuth");
        }
        other => panic!("expected UnsupportedOperation, got {other:?}"),
    }
}

#[test]
fn given_credentials_when_debug_formatted_then_secrets_are_hidden() {
    let api_key = Credentials::api_key("k-123456");
    let user = Credentials::user_password("csadmin", "hunter2");

    let text = format!("{api_key:?} {user:?}");

    assert!(!text.contains("k-123456"));
    assert!(!text.contains("hunter2"));
    assert!(text.contains("csadmin"));
}
