//! Error taxonomy for the auth subsystem
//!
//! Every failure of the login flow maps to exactly one [`ErrorKind`]. Callers
//! that only need to branch (the login-callback UI, tests) match on
//! [`AuthError::kind`] instead of the full variant.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::error::{ErrorClassification, ErrorSeverity};
use crate::storage::StorageError;

/// Stable discriminant of an [`AuthError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedToken,
    MissingPkceState,
    StateMismatch,
    TokenExchangeFailed,
    TokenExchangeTimedOut,
    ConfigurationMissing,
    ProviderRejected,
    MissingCallbackParams,
    Network,
    Storage,
}

impl ErrorKind {
    /// Snake-case label for logs and user-facing error codes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedToken => "malformed_token",
            Self::MissingPkceState => "missing_pkce_state",
            Self::StateMismatch => "state_mismatch",
            Self::TokenExchangeFailed => "token_exchange_failed",
            Self::TokenExchangeTimedOut => "token_exchange_timed_out",
            Self::ConfigurationMissing => "configuration_missing",
            Self::ProviderRejected => "provider_rejected",
            Self::MissingCallbackParams => "missing_callback_params",
            Self::Network => "network",
            Self::Storage => "storage",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for auth operations
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token (or token endpoint response) is structurally invalid
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// No pending login attempt: never started, storage cleared, or already
    /// consumed
    #[error("no pending login attempt found; start login again")]
    MissingPkceState,

    /// Callback `state` differs from the pending attempt (CSRF)
    #[error("callback state does not match the pending login attempt")]
    StateMismatch,

    /// Token endpoint answered with a non-2xx status
    #[error("token exchange failed with HTTP {status}: {body}")]
    TokenExchangeFailed { status: u16, body: String },

    /// Token exchange exceeded the configured bound
    #[error("token exchange timed out after {0:?}")]
    TokenExchangeTimedOut(Duration),

    /// Required identity-provider setting absent or empty
    #[error("missing identity provider configuration: {0}")]
    ConfigurationMissing(String),

    /// Identity provider redirected back with `?error=`
    #[error("identity provider rejected the login: {error}{}", description.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
    ProviderRejected { error: String, description: Option<String> },

    /// Callback carried neither `code` + `state` nor `error`
    #[error("missing callback params")]
    MissingCallbackParams,

    /// Transport failure while talking to the identity provider
    #[error("network error: {0}")]
    Network(String),

    /// Backing store failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Stable discriminant for matching and reporting.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedToken(_) => ErrorKind::MalformedToken,
            Self::MissingPkceState => ErrorKind::MissingPkceState,
            Self::StateMismatch => ErrorKind::StateMismatch,
            Self::TokenExchangeFailed { .. } => ErrorKind::TokenExchangeFailed,
            Self::TokenExchangeTimedOut(_) => ErrorKind::TokenExchangeTimedOut,
            Self::ConfigurationMissing(_) => ErrorKind::ConfigurationMissing,
            Self::ProviderRejected { .. } => ErrorKind::ProviderRejected,
            Self::MissingCallbackParams => ErrorKind::MissingCallbackParams,
            Self::Network(_) => ErrorKind::Network,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Whether the user must restart login from the authorize redirect.
    ///
    /// Authorization codes are single-use, so every failure after the
    /// redirect back is terminal for that attempt.
    #[must_use]
    pub const fn requires_new_login(&self) -> bool {
        !matches!(self, Self::ConfigurationMissing(_) | Self::Storage(_))
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl ErrorClassification for AuthError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::TokenExchangeTimedOut(_))
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingPkceState | Self::MissingCallbackParams => ErrorSeverity::Info,
            Self::Network(_) | Self::TokenExchangeTimedOut(_) | Self::ProviderRejected { .. } => {
                ErrorSeverity::Warning
            }
            Self::MalformedToken(_)
            | Self::TokenExchangeFailed { .. }
            | Self::ConfigurationMissing(_) => ErrorSeverity::Error,
            Self::StateMismatch => ErrorSeverity::Critical,
            Self::Storage(e) => e.severity(),
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::StateMismatch)
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}
