//! In-memory session holder

use autonomos_common::AuthSession;
use parking_lot::RwLock;

/// The session the UI currently holds
///
/// Set after login completion or a successful startup probe, cleared on
/// logout or forced sign-out. Never persisted; the token store is the durable
/// copy.
#[derive(Debug, Default)]
pub struct CurrentSession {
    inner: RwLock<Option<AuthSession>>,
}

impl CurrentSession {
    #[must_use]
    pub fn new(session: Option<AuthSession>) -> Self {
        Self { inner: RwLock::new(session) }
    }

    #[must_use]
    pub fn get(&self) -> Option<AuthSession> {
        self.inner.read().clone()
    }

    /// Replace the held session wholesale.
    pub fn set(&self, session: AuthSession) {
        *self.inner.write() = Some(session);
    }

    pub fn clear(&self) {
        self.inner.write().take();
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.inner.read().is_some()
    }
}
