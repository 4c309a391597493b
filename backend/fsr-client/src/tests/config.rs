use crate::auth::Credentials;
use crate::client::FortiSoar;
use crate::config::ClientConfig;
use crate::error::{ConfigError, FsrError};

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

const API_KEY_CONFIG: &str = r#"
[fortisoar]
base_url = "soar.example.com"
verify_ssl = false
poll_interval_secs = 2

[fortisoar.auth]
api_key = "key-from-file"
"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn parse(contents: &str) -> ClientConfig {
    toml::from_str(contents).unwrap()
}

#[test]
fn given_api_key_file_when_loaded_then_sections_and_defaults_apply() {
    let file = write_config(API_KEY_CONFIG);

    let config = ClientConfig::load(file.path()).unwrap();

    assert_eq!(config.fortisoar.base_url, "soar.example.com");
    assert!(!config.fortisoar.verify_ssl);
    assert!(!config.fortisoar.verbose);
    assert_eq!(config.fortisoar.timeout_secs, 30);

    let options = config.client_options();
    assert_eq!(options.poll_interval, Duration::from_secs(2));
    assert!(!options.verify_ssl);
    assert_eq!(config.poll_options().interval, Duration::from_secs(2));
    assert!(matches!(config.credentials().unwrap(), Credentials::ApiKey(_)));
}

#[test]
fn given_missing_file_when_loaded_then_read_error() {
    let result = ClientConfig::load(std::path::Path::new("/nonexistent/fsr-client.toml"));

    assert!(matches!(result, Err(ConfigError::ReadError { .. })));
}

#[test]
fn given_malformed_toml_when_loaded_then_parse_error() {
    let file = write_config("[fortisoar\nbase_url = ");

    let result = ClientConfig::load(file.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **VALUE**: Ambiguous credentials are rejected instead of silently picking one.
///
/// **BUG THIS CATCHES**: A config carrying both an API key and a password would
/// otherwise authenticate with whichever variant happened to be checked first.
#[test]
fn given_both_credential_kinds_when_validated_then_validation_error() {
    let config = parse(
        r#"
[fortisoar]
base_url = "https://soar.example.com"

[fortisoar.auth]
api_key = "k"
username = "csadmin"
password = "p"
"#,
    );

    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn given_username_without_password_when_validated_then_validation_error() {
    let config = parse(
        r#"
[fortisoar]
base_url = "https://soar.example.com"

[fortisoar.auth]
username = "csadmin"
"#,
    );

    let error = config.validate().unwrap_err();

    assert!(error.to_string().contains("password"), "{error}");
}

#[test]
fn given_zero_poll_interval_when_validated_then_validation_error() {
    let mut config = parse(API_KEY_CONFIG);
    config.fortisoar.poll_interval_secs = 0;

    assert!(config.validate().is_err());
}

/// **BUG THIS CATCHES**: An invalid configuration must be rejected before the
/// client tries to authenticate against the configured host.
#[tokio::test]
async fn given_invalid_config_when_client_built_then_config_error_without_connecting() {
    let mut config = parse(API_KEY_CONFIG);
    config.fortisoar.base_url = String::from("http://127.0.0.1:9");
    config.fortisoar.poll_interval_secs = 0;

    let error = FortiSoar::from_config(&config).await.unwrap_err();

    assert!(
        matches!(error, FsrError::Config(ConfigError::ValidationError { .. })),
        "{error:?}"
    );
}

#[test]
fn given_env_overrides_when_applied_then_user_password_replaces_api_key() {
    let mut config = parse(API_KEY_CONFIG);
    let env = HashMap::from([
        ("FSR_BASE_URL", "https://override.example.com"),
        ("FSR_USERNAME", "csadmin"),
        ("FSR_PASSWORD", "changeme"),
        ("FSR_VERIFY_SSL", "true"),
    ]);

    config
        .apply_overrides_from(|key| env.get(key).map(|value| value.to_string()))
        .unwrap();

    assert_eq!(config.fortisoar.base_url, "https://override.example.com");
    assert!(config.fortisoar.verify_ssl);
    match config.credentials().unwrap() {
        Credentials::UserPassword { username, password } => {
            assert_eq!(username, "csadmin");
            assert_eq!(password.expose(), "changeme");
        }
        other => panic!("expected UserPassword, got {other:?}"),
    }
}

#[test]
fn given_invalid_verify_ssl_override_when_applied_then_validation_error() {
    let mut config = parse(API_KEY_CONFIG);

    let result = config.apply_overrides_from(|key| {
        (key == "FSR_VERIFY_SSL").then(|| String::from("maybe"))
    });

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

#[test]
fn given_config_when_debug_formatted_then_secrets_are_redacted() {
    let config = parse(API_KEY_CONFIG);

    let text = format!("{config:?}");

    assert!(!text.contains("key-from-file"));
}
