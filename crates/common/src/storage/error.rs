//! Storage error types
//!
//! Integrates with the common error system through [`ErrorClassification`].

use std::time::Duration;

use thiserror::Error;

use crate::error::{CommonError, ErrorClassification, ErrorSeverity};

/// Storage error type
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Common(#[from] CommonError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Common(err.into())
    }
}

impl ErrorClassification for StorageError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidKey(_) => false,
            Self::Unavailable(_) | Self::Io(_) => true,
            Self::Common(e) => e.is_retryable(),
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidKey(_) | Self::Io(_) => ErrorSeverity::Error,
            Self::Unavailable(_) => ErrorSeverity::Warning,
            Self::Common(e) => e.severity(),
        }
    }

    fn is_critical(&self) -> bool {
        match self {
            Self::Common(e) => e.is_critical(),
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}
