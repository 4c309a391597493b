use crate::client::endpoint::{
    ensure_leading_slash, is_auth_endpoint, normalize_base_url, normalize_endpoint,
};
use crate::error::FsrError;

#[test]
fn given_bare_host_when_normalized_then_https_is_prefixed() {
    let base = normalize_base_url("soar.example.com/").unwrap();

    assert_eq!(base, "https://soar.example.com");
}

/// **VALUE**: An explicit scheme is kept as given.
///
/// **BUG THIS CATCHES**: Forcing `https://` onto every URL would make plain-HTTP lab
/// instances (and local mock servers) unreachable.
#[test]
fn given_explicit_http_scheme_when_normalized_then_scheme_is_kept() {
    let base = normalize_base_url("http://127.0.0.1:8080///").unwrap();

    assert_eq!(base, "http://127.0.0.1:8080");
}

#[test]
fn given_empty_base_url_when_normalized_then_invalid_input() {
    let result = normalize_base_url("   ");

    assert!(matches!(result, Err(FsrError::InvalidInput { .. })));
}

#[test]
fn given_bare_resource_path_when_normalized_then_default_prefix_is_added() {
    assert_eq!(normalize_endpoint("alerts"), "/api/3/alerts");
    assert_eq!(normalize_endpoint("/alerts/42"), "/api/3/alerts/42");
}

#[test]
fn given_prefixed_paths_when_normalized_then_unchanged() {
    for path in [
        "/api/3/alerts",
        "/auth/authenticate",
        "/api/public/health",
        "/api/query/alerts",
        "/api/export",
    ] {
        assert_eq!(normalize_endpoint(path), path);
    }
}

#[test]
fn given_auth_paths_when_classified_then_detected() {
    assert!(is_auth_endpoint("/auth/authenticate"));
    assert!(is_auth_endpoint("/api/auth/token"));
    assert!(!is_auth_endpoint("/api/3/authors"));
    assert!(!is_auth_endpoint("/api/3/alerts"));
}

#[test]
fn given_path_without_slash_when_ensured_then_slash_added() {
    assert_eq!(ensure_leading_slash("api/3/alerts"), "/api/3/alerts");
    assert_eq!(ensure_leading_slash("/api/3/alerts"), "/api/3/alerts");
}
