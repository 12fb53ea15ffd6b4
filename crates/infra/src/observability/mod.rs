//! Observability infrastructure for logging and tracing
//!
//! Library crates only emit `tracing` events. The binary installs one
//! subscriber at startup through [`init_tracing`].
//!
//! ## Filtering
//!
//! `RUST_LOG` wins when set. Otherwise the configured level applies, e.g.
//! `AUTONOMOS_LOG_LEVEL=debug`.
//!
//! ```no_run
//! use autonomos_domain::LoggingSettings;
//! use autonomos_infra::observability::init_tracing;
//!
//! init_tracing(&LoggingSettings::default()).ok();
//! tracing::info!("ready");
//! ```

use autonomos_domain::{AutonomosError, LoggingSettings, Result};
use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber.
///
/// Output goes to stderr so it never mixes with command output. With
/// `settings.json` the events are emitted as JSON lines.
///
/// # Errors
/// Returns `AutonomosError::Config` if the configured level is not a valid
/// filter or a global subscriber is already installed.
pub fn init_tracing(settings: &LoggingSettings) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level).map_err(|e| {
            AutonomosError::Config(format!("Invalid log level '{}': {e}", settings.level))
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = if settings.json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };

    installed.map_err(|e| AutonomosError::Config(format!("Failed to initialize tracing: {e}")))
}

#[cfg(test)]
mod tests {
    //! Unit tests for observability.
    use super::*;

    /// Validates repeated initialisation.
    ///
    /// Assertions:
    /// - Ensures a second call returns a config error instead of panicking.
    #[test]
    fn test_second_init_is_an_error() {
        let settings = LoggingSettings { level: "debug".into(), json: false };
        let _ = init_tracing(&settings);

        assert!(matches!(init_tracing(&settings), Err(AutonomosError::Config(_))));
    }

    /// Validates level parsing.
    ///
    /// Assertions:
    /// - Ensures a malformed level is reported when `RUST_LOG` is unset.
    #[test]
    fn test_invalid_level_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let settings = LoggingSettings { level: "info,autonomos=loud".into(), json: true };
        assert!(matches!(init_tracing(&settings), Err(AutonomosError::Config(_))));
    }
}
