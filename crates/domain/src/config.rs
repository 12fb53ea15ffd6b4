//! Configuration structures
//!
//! Loaded by `autonomos_infra::config` from the environment or a TOML/JSON
//! file. Only the identity provider settings are required; storage and
//! logging fall back to defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_APP_ORIGIN, DEFAULT_DATA_DIR, DEFAULT_LOG_LEVEL};
use crate::errors::{AutonomosError, Result};

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub auth: AuthSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Check that every required identity provider setting is present.
    ///
    /// # Errors
    /// Returns `AutonomosError::Config` naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("auth.domain", &self.auth.domain),
            ("auth.client_id", &self.auth.client_id),
            ("auth.redirect_uri", &self.auth.redirect_uri),
            ("auth.logout_uri", &self.auth.logout_uri),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AutonomosError::Config(format!("Missing required setting: {name}")));
            }
        }
        if self.storage.origin.trim().is_empty() {
            return Err(AutonomosError::Config("Missing required setting: storage.origin".into()));
        }
        Ok(())
    }
}

/// Identity provider settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    pub domain: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub logout_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_exchange_timeout_secs: Option<u64>,
}

impl AuthSettings {
    #[must_use]
    pub fn token_exchange_timeout(&self) -> Option<Duration> {
        self.token_exchange_timeout_secs.map(Duration::from_secs)
    }
}

/// Where durable state lives and which origin it is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_origin")]
    pub origin: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), origin: default_origin() }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_origin() -> String {
    DEFAULT_APP_ORIGIN.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
