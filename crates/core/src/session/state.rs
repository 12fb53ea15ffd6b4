//! Coordinator states
//!
//! ```text
//!            session_changed(Some)
//!   Idle ─────────────────────────► Armed ──── timer / 401 / 403 ───► Triggered
//!    ▲                                ▲                                  │
//!    │ session_changed(None)          │ session_changed(new token)       │ acknowledge
//!    │                                └──────────────────────────────────┤
//!    └──────────────────────────────── Acknowledged ◄────────────────────┘
//! ```

use autonomos_domain::SessionExpiredEvent;
use serde::{Deserialize, Serialize};

/// What opened the expiry warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum WarningTrigger {
    /// The API rejected a request
    Http { status: u16, url: String },
    /// The proactive expiry timer fired
    Timer { expires_at_epoch_seconds: i64 },
}

impl WarningTrigger {
    /// Message for the confirmation surface.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Http { status, .. } => {
                format!("The server rejected your session (HTTP {status}). Please sign in again.")
            }
            Self::Timer { .. } => {
                "Your session is about to expire. Please sign in again.".to_string()
            }
        }
    }
}

impl From<&SessionExpiredEvent> for WarningTrigger {
    fn from(event: &SessionExpiredEvent) -> Self {
        match event {
            SessionExpiredEvent::Http { status, url } => {
                Self::Http { status: *status, url: url.clone() }
            }
            SessionExpiredEvent::Timer { expires_at_epoch_seconds } => {
                Self::Timer { expires_at_epoch_seconds: *expires_at_epoch_seconds }
            }
        }
    }
}

/// Session timeout coordinator state
///
/// At most one warning is open, and only in `Triggered`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CoordinatorState {
    /// No session, or no timer scheduled
    Idle,
    /// The proactive timer is scheduled for this expiry
    Armed { expires_at_epoch_seconds: i64 },
    /// The warning is open
    Triggered { trigger: WarningTrigger },
    /// The user confirmed the warning and was sent to login
    Acknowledged,
}

impl CoordinatorState {
    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        matches!(self, Self::Triggered { .. })
    }

    /// Short name for log fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Armed { .. } => "armed",
            Self::Triggered { .. } => "triggered",
            Self::Acknowledged => "acknowledged",
        }
    }
}
