//! Terminal commands
//!
//! Each command writes its user-facing output to the writer it is given and
//! logs through `tracing`. Errors are returned with context for `main` to
//! report.

pub mod login;
pub mod session;
pub mod watch;

pub use login::{login, loopback_addr, CallbackInput};
pub use session::{logout, status, StatusReport};
pub use watch::{watch, WatchOptions};

use chrono::{DateTime, Utc};

/// Render an epoch timestamp for people.
pub(crate) fn format_epoch(epoch_seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(epoch_seconds, 0)
        .map_or_else(|| epoch_seconds.to_string(), |t| t.to_rfc3339())
}
