//! Session-expiry events
//!
//! Transient notifications carried on the session-expiry bus. They are never
//! persisted.

use serde::{Deserialize, Serialize};

use crate::constants::{STATUS_FORBIDDEN, STATUS_UNAUTHORIZED};

/// Why the session is considered expired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum SessionExpiredEvent {
    /// The API rejected a request with 401 or 403
    Http { status: u16, url: String },
    /// The proactive expiry timer fired
    Timer { expires_at_epoch_seconds: i64 },
}

impl SessionExpiredEvent {
    /// Event for an HTTP response, or `None` if the status does not signal an
    /// expired session.
    #[must_use]
    pub fn from_http_status(status: u16, url: impl Into<String>) -> Option<Self> {
        is_session_expiry_status(status).then(|| Self::Http { status, url: url.into() })
    }

    #[must_use]
    pub const fn timer(expires_at_epoch_seconds: i64) -> Self {
        Self::Timer { expires_at_epoch_seconds }
    }

    /// `"http"` or `"timer"`, for log fields.
    #[must_use]
    pub const fn source(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http",
            Self::Timer { .. } => "timer",
        }
    }
}

/// 401 and 403 are the only statuses that mean the session is gone.
#[must_use]
pub const fn is_session_expiry_status(status: u16) -> bool {
    matches!(status, STATUS_UNAUTHORIZED | STATUS_FORBIDDEN)
}

#[cfg(test)]
mod tests {
    //! Unit tests for events.
    use super::*;

    /// Validates the wire shape of both variants.
    ///
    /// Assertions:
    /// - Confirms the `source` tag and camelCase fields.
    #[test]
    fn test_event_json_shape() {
        let http = SessionExpiredEvent::Http { status: 401, url: "/api/invoices".into() };
        assert_eq!(
            serde_json::to_value(&http).unwrap(),
            serde_json::json!({"source": "http", "status": 401, "url": "/api/invoices"})
        );

        let timer = SessionExpiredEvent::timer(1_700_000_000);
        assert_eq!(
            serde_json::to_value(&timer).unwrap(),
            serde_json::json!({"source": "timer", "expiresAtEpochSeconds": 1_700_000_000})
        );
        assert_eq!(timer.source(), "timer");
    }

    /// Validates `from_http_status`.
    ///
    /// Assertions:
    /// - Ensures only 401 and 403 produce events.
    #[test]
    fn test_from_http_status() {
        assert!(SessionExpiredEvent::from_http_status(401, "/a").is_some());
        assert!(SessionExpiredEvent::from_http_status(403, "/a").is_some());
        for status in [200, 204, 400, 404, 500] {
            assert!(SessionExpiredEvent::from_http_status(status, "/a").is_none());
        }
    }
}
