//! Port interfaces for the session UI
//!
//! These traits define the boundaries between the session logic and the
//! surface that renders it (browser shell, terminal, tests).

use super::state::WarningTrigger;

/// Application routing
pub trait Navigator: Send + Sync {
    /// Path of the page the user is on, including any query string
    fn current_route(&self) -> String;

    /// Navigate to `target` (an application path such as `/login?returnTo=...`)
    fn redirect(&self, target: &str);
}

/// The single "your session expired" confirmation surface
pub trait ExpiryPrompt: Send + Sync {
    /// Show the warning for `trigger`
    fn open(&self, trigger: &WarningTrigger);

    /// Hide the warning if it is showing
    fn close(&self);
}
