//! Terminal implementations of the session UI ports
//!
//! The terminal has no router, so [`TerminalNavigator`] only remembers the
//! "page" the user is on. [`TerminalPrompt`] turns the warning into
//! something an async command can wait for.

use autonomos_core::{ExpiryPrompt, Navigator, WarningTrigger};
use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::info;

/// Tracks the current route and records where the last redirect went.
#[derive(Debug)]
pub struct TerminalNavigator {
    route: Mutex<String>,
}

impl TerminalNavigator {
    #[must_use]
    pub fn at(route: impl Into<String>) -> Self {
        Self { route: Mutex::new(route.into()) }
    }
}

impl Navigator for TerminalNavigator {
    fn current_route(&self) -> String {
        self.route.lock().clone()
    }

    fn redirect(&self, target: &str) {
        info!(target, "navigating");
        *self.route.lock() = target.to_string();
    }
}

/// Holds the open warning and wakes whoever waits for it.
#[derive(Debug, Default)]
pub struct TerminalPrompt {
    open: Mutex<Option<WarningTrigger>>,
    notify: Notify,
}

impl TerminalPrompt {
    /// The warning currently showing, if any
    #[must_use]
    pub fn current(&self) -> Option<WarningTrigger> {
        self.open.lock().clone()
    }

    /// Wait until a warning is showing and return what opened it.
    pub async fn wait_open(&self) -> WarningTrigger {
        loop {
            let notified = self.notify.notified();
            if let Some(trigger) = self.current() {
                return trigger;
            }
            notified.await;
        }
    }
}

impl ExpiryPrompt for TerminalPrompt {
    fn open(&self, trigger: &WarningTrigger) {
        info!(trigger = %trigger.describe(), "session expiry warning opened");
        *self.open.lock() = Some(trigger.clone());
        self.notify.notify_waiters();
    }

    fn close(&self) {
        if self.open.lock().take().is_some() {
            info!("session expiry warning closed");
        }
    }
}
