use crate::RedactedSecret;

/// **VALUE**: Debug and Display output never contain the secret.
///
/// **BUG THIS CATCHES**: A derived Debug on the auth strategies would otherwise leak API keys
/// and passwords into verbose request logs.
#[test]
fn given_secret_when_formatted_then_value_is_redacted() {
    let secret = RedactedSecret::new("super-secret-api-key");

    let debug = format!("{secret:?}");
    let display = format!("{secret}");

    assert!(!debug.contains("super-secret-api-key"));
    assert!(!display.contains("super-secret-api-key"));
    assert_eq!(secret.expose(), "super-secret-api-key");
    assert_eq!(secret.len(), 20);
}

#[test]
fn given_secret_when_serialized_then_serialization_is_refused() {
    let secret = RedactedSecret::from("token");

    let error = serde_json::to_string(&secret).unwrap_err();

    assert!(error.to_string().contains("call expose()"), "{error}");
    assert!(!error.to_string().contains("token"));
}

#[test]
fn given_whitespace_secret_when_checked_then_is_empty() {
    assert!(RedactedSecret::new("   ").is_empty());
    assert!(!RedactedSecret::new("k").is_empty());
}

#[test]
fn given_json_string_when_deserialized_then_secret_holds_value() {
    let secret: RedactedSecret = serde_json::from_str("\"from-config\"").unwrap();

    assert_eq!(secret.expose(), "from-config");
}
