//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `AUTONOMOS_AUTH_DOMAIN`: Identity provider domain (required)
//! - `AUTONOMOS_AUTH_CLIENT_ID`: OAuth client id (required)
//! - `AUTONOMOS_AUTH_REDIRECT_URI`: Callback URL registered with the provider
//!   (required)
//! - `AUTONOMOS_AUTH_LOGOUT_URI`: Where the provider sends the user after
//!   logout (required)
//! - `AUTONOMOS_AUTH_IDENTITY_PROVIDER`: Federated provider hint
//! - `AUTONOMOS_AUTH_EXCHANGE_TIMEOUT_SECS`: Bound on the token exchange
//! - `AUTONOMOS_DATA_DIR`: Directory for durable storage
//! - `AUTONOMOS_APP_ORIGIN`: Origin the durable storage is scoped to
//! - `AUTONOMOS_LOG_LEVEL`: Default log level when `RUST_LOG` is unset
//! - `AUTONOMOS_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./autonomos.toml` or `./autonomos.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use autonomos_domain::{
    AppConfig, AuthSettings, AutonomosError, LoggingSettings, Result, StorageSettings,
};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["autonomos.toml", "autonomos.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file. The
/// result is validated either way.
///
/// # Errors
/// Returns `AutonomosError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or empty
pub fn load() -> Result<AppConfig> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// All required environment variables must be present. Returns an error
/// if any are missing.
///
/// # Environment Variables
/// See module documentation for the complete list.
///
/// # Errors
/// Returns `AutonomosError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<AppConfig> {
    let domain = env_var("AUTONOMOS_AUTH_DOMAIN")?;
    let client_id = env_var("AUTONOMOS_AUTH_CLIENT_ID")?;
    let redirect_uri = env_var("AUTONOMOS_AUTH_REDIRECT_URI")?;
    let logout_uri = env_var("AUTONOMOS_AUTH_LOGOUT_URI")?;
    let identity_provider = env_opt("AUTONOMOS_AUTH_IDENTITY_PROVIDER");
    let token_exchange_timeout_secs = env_opt("AUTONOMOS_AUTH_EXCHANGE_TIMEOUT_SECS")
        .map(|s| {
            s.parse::<u64>().map_err(|e| {
                AutonomosError::Config(format!("Invalid token exchange timeout: {e}"))
            })
        })
        .transpose()?;

    let defaults = StorageSettings::default();
    let storage = StorageSettings {
        data_dir: env_opt("AUTONOMOS_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
        origin: env_opt("AUTONOMOS_APP_ORIGIN").unwrap_or(defaults.origin),
    };

    let logging = LoggingSettings {
        level: env_opt("AUTONOMOS_LOG_LEVEL").unwrap_or_else(|| LoggingSettings::default().level),
        json: env_bool("AUTONOMOS_LOG_JSON", false),
    };

    Ok(AppConfig {
        auth: AuthSettings {
            domain,
            client_id,
            redirect_uri,
            logout_uri,
            identity_provider,
            token_exchange_timeout_secs,
        },
        storage,
        logging,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `AutonomosError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AutonomosError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AutonomosError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AutonomosError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `AutonomosError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AutonomosError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AutonomosError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(AutonomosError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory first, then the directory of the
/// running executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// Empty values count as missing.
///
/// # Errors
/// Returns `AutonomosError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        AutonomosError::Config(format!("Missing required environment variable: {key}"))
    })
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
///
/// # Returns
/// The parsed boolean value, or `default` if not set.
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
