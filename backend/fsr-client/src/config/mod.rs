//! Client configuration from TOML, `.env` and `FSR_*` environment variables.
//!
//! ```toml
//! [fortisoar]
//! base_url = "https://soar.example.com"
//! verify_ssl = true
//! verbose = false
//! timeout_secs = 30
//! poll_interval_secs = 5
//!
//! [fortisoar.auth]
//! api_key = "..."
//! ```

use crate::auth::Credentials;
use crate::client::ClientOptions;
use crate::error::ConfigError;
use crate::export::PollOptions;

use common::{ErrorLocation, RedactedSecret};

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "config.toml";
const LOCAL_CONFIG_FILE_NAME: &str = "fsr-client.toml";
const CONFIG_DIR_NAME: &str = "fsr-client";

const ENV_BASE_URL: &str = "FSR_BASE_URL";
const ENV_API_KEY: &str = "FSR_API_KEY";
const ENV_USERNAME: &str = "FSR_USERNAME";
const ENV_PASSWORD: &str = "FSR_PASSWORD";
const ENV_VERIFY_SSL: &str = "FSR_VERIFY_SSL";

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub fortisoar: FortiSoarSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FortiSoarSection {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub auth: AuthSection,
}

impl Default for FortiSoarSection {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            verify_ssl: default_verify_ssl(),
            verbose: false,
            timeout_secs: default_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            auth: AuthSection::default(),
        }
    }
}

/// Either `api_key`, or `username` plus `password`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSection {
    #[serde(default)]
    pub api_key: Option<RedactedSecret>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<RedactedSecret>,
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_verify_ssl() -> bool {
    true
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_poll_interval_secs() -> u64 {
    PollOptions::DEFAULT_INTERVAL.as_secs()
}

// ============================================
// IMPLEMENTATION
// ============================================

impl ClientConfig {
    /// Parse and validate a TOML file. Environment variables are not consulted.
    ///
    /// # Errors
    /// [`ConfigError::ReadError`], [`ConfigError::ParseError`] or
    /// [`ConfigError::ValidationError`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;

        info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Locate the configuration the usual way.
    ///
    /// Loads `.env`, reads the first of `./fsr-client.toml` and
    /// `{config_dir}/fsr-client/config.toml` that exists, then applies the
    /// `FSR_*` overrides. Without any file the environment alone must supply
    /// the settings.
    ///
    /// # Errors
    /// [`ConfigError::NotFound`] when neither a file nor `FSR_BASE_URL`
    /// provides a base URL, otherwise as [`ClientConfig::load`].
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        let candidates = default_locations();
        let mut config = match candidates.iter().find(|path| path.is_file()) {
            Some(path) => {
                info!("Config loaded from {}", path.display());
                Self::read(path)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides()?;

        if config.fortisoar.base_url.trim().is_empty() {
            return Err(ConfigError::NotFound {
                location: ErrorLocation::from(Location::caller()),
                searched: candidates
                    .iter()
                    .map(|path| path.display().to_string())
                    .chain(std::iter::once(format!("${ENV_BASE_URL}")))
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply `FSR_*` variables from the process environment.
    ///
    /// # Errors
    /// [`ConfigError::ValidationError`] for an unparseable `FSR_VERIFY_SSL`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup.
    ///
    /// `FSR_API_KEY` replaces username/password and `FSR_USERNAME` or
    /// `FSR_PASSWORD` replace an API key, so one credential kind stays.
    ///
    /// # Errors
    /// [`ConfigError::ValidationError`] for an unparseable `FSR_VERIFY_SSL`.
    pub fn apply_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let section = &mut self.fortisoar;

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            section.base_url = base_url;
        }

        if let Some(api_key) = lookup(ENV_API_KEY) {
            section.auth = AuthSection {
                api_key: Some(RedactedSecret::new(api_key)),
                username: None,
                password: None,
            };
        }

        let username = lookup(ENV_USERNAME);
        let password = lookup(ENV_PASSWORD);
        if username.is_some() || password.is_some() {
            section.auth.api_key = None;
            if let Some(username) = username {
                section.auth.username = Some(username);
            }
            if let Some(password) = password {
                section.auth.password = Some(RedactedSecret::new(password));
            }
        }

        if let Some(raw) = lookup(ENV_VERIFY_SSL) {
            section.verify_ssl = parse_bool(&raw).ok_or_else(|| ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("{ENV_VERIFY_SSL} must be true or false, got '{raw}'"),
            })?;
        }

        Ok(())
    }

    /// # Errors
    /// [`ConfigError::ValidationError`] for an empty base URL, zero intervals,
    /// or anything but exactly one credential kind.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let section = &self.fortisoar;

        if section.base_url.trim().is_empty() {
            return Err(validation_error("base_url cannot be empty"));
        }
        if section.timeout_secs == 0 {
            return Err(validation_error("timeout_secs must be positive"));
        }
        if section.poll_interval_secs == 0 {
            return Err(validation_error("poll_interval_secs must be positive"));
        }

        let auth = &section.auth;
        let has_api_key = auth.api_key.as_ref().is_some_and(|key| !key.is_empty());
        let has_user = auth.username.as_ref().is_some_and(|user| !user.trim().is_empty());
        let has_password = auth.password.as_ref().is_some_and(|pass| !pass.is_empty());

        match (has_api_key, has_user, has_password) {
            (true, false, false) | (false, true, true) => Ok(()),
            (true, _, _) => Err(validation_error(
                "auth must use either api_key or username/password, not both",
            )),
            (false, true, false) => {
                Err(validation_error("auth.password is required with username"))
            }
            (false, false, true) => {
                Err(validation_error("auth.username is required with password"))
            }
            (false, false, false) => Err(validation_error(
                "auth requires api_key or username and password",
            )),
        }
    }

    /// # Errors
    /// As [`ClientConfig::validate`].
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        self.validate()?;
        let auth = &self.fortisoar.auth;

        match (&auth.api_key, &auth.username, &auth.password) {
            (Some(api_key), _, _) => Ok(Credentials::ApiKey(api_key.clone())),
            (None, Some(username), Some(password)) => Ok(Credentials::UserPassword {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => Err(validation_error("auth requires api_key or username and password")),
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        let section = &self.fortisoar;
        ClientOptions::default()
            .with_verify_ssl(section.verify_ssl)
            .with_verbose(section.verbose)
            .with_timeout(Duration::from_secs(section.timeout_secs))
            .with_poll_interval(Duration::from_secs(section.poll_interval_secs))
    }

    pub fn poll_options(&self) -> PollOptions {
        PollOptions::new(Duration::from_secs(self.fortisoar.poll_interval_secs))
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

fn default_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(LOCAL_CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        locations.push(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    locations
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[track_caller]
fn validation_error(reason: &str) -> ConfigError {
    ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason: reason.to_string(),
    }
}
