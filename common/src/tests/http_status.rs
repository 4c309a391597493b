use crate::HttpStatusCode;

#[test]
fn given_status_codes_when_classified_then_ranges_are_respected() {
    assert!(HttpStatusCode(404).is_client_error());
    assert!(HttpStatusCode(404).is_error());
    assert!(!HttpStatusCode(404).is_server_error());
    assert!(HttpStatusCode(503).is_server_error());
    assert!(HttpStatusCode(204).is_success());
    assert!(!HttpStatusCode(302).is_error());
}

#[test]
fn given_known_and_unknown_codes_when_reason_requested_then_maps_or_falls_back() {
    assert_eq!(HttpStatusCode::FORBIDDEN.reason(), "Forbidden");
    assert_eq!(HttpStatusCode(418).reason(), "Unknown Status");
}
