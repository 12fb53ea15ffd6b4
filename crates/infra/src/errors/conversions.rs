//! Conversions from auth, storage and HTTP errors into domain errors.

use autonomos_common::{AuthError, StorageError};
use autonomos_domain::AutonomosError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AutonomosError);

impl From<InfraError> for AutonomosError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AutonomosError> for InfraError {
    fn from(value: AutonomosError) -> Self {
        Self(value)
    }
}

/* -------------------------------------------------------------------------- */
/* AuthError → AutonomosError */
/* -------------------------------------------------------------------------- */

/// Fold an [`AuthError`] into the application error.
///
/// The message keeps the stable error kind as a prefix, e.g.
/// `state_mismatch: callback state does not match ...`.
#[must_use]
pub fn map_auth_error(err: AuthError) -> AutonomosError {
    let message = format!("{}: {err}", err.kind());
    match err {
        AuthError::ConfigurationMissing(_) => AutonomosError::Config(message),
        AuthError::Network(_) | AuthError::TokenExchangeTimedOut(_) => {
            AutonomosError::Network(message)
        }
        AuthError::Storage(inner) => map_storage_error(inner),
        _ => AutonomosError::Auth(message),
    }
}

impl From<AuthError> for InfraError {
    fn from(value: AuthError) -> Self {
        Self(map_auth_error(value))
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → AutonomosError */
/* -------------------------------------------------------------------------- */

#[must_use]
pub fn map_storage_error(err: StorageError) -> AutonomosError {
    match err {
        StorageError::InvalidKey(key) => {
            AutonomosError::InvalidInput(format!("invalid storage key '{key}'"))
        }
        other => AutonomosError::Storage(other.to_string()),
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        Self(map_storage_error(value))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AutonomosError */
/* -------------------------------------------------------------------------- */

#[must_use]
pub fn map_http_error(err: &HttpError) -> AutonomosError {
    if err.is_timeout() {
        return AutonomosError::Network("HTTP request timed out".into());
    }

    if err.is_connect() {
        return AutonomosError::Network("HTTP connection failure".into());
    }

    if let Some(status) = err.status() {
        let code = status.as_u16();
        let message =
            format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

        return match code {
            401 | 403 => AutonomosError::Auth(message),
            400..=499 if code != 429 => AutonomosError::InvalidInput(message),
            _ => AutonomosError::Network(message),
        };
    }

    AutonomosError::Network(err.to_string())
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(map_http_error(&value))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
