//! Session-expiry event bus
//!
//! A registry object created once at the application root and handed to
//! whoever needs it. Any caller can announce that the session expired
//! without being wired to the listeners.
//!
//! Dispatch is synchronous and in registration order. Events are
//! fire-and-forget: nothing is queued or replayed, and an event published
//! while nobody listens is dropped.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use autonomos_domain::SessionExpiredEvent;
use parking_lot::Mutex;
use tracing::debug;

type Listener = Arc<dyn Fn(&SessionExpiredEvent) + Send + Sync>;

/// Publish/subscribe channel for session-expiry notifications
#[derive(Default)]
pub struct SessionExpiryBus {
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_id: AtomicU64,
}

impl SessionExpiryBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register `listener` until the returned [`Subscription`] is dropped or
    /// unsubscribed.
    pub fn subscribe<F>(self: &Arc<Self>, listener: F) -> Subscription
    where
        F: Fn(&SessionExpiredEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, Arc::new(listener)));
        Subscription { id, bus: Arc::downgrade(self), active: true }
    }

    /// Deliver `event` to every listener registered right now.
    ///
    /// Listeners that subscribe or unsubscribe while this pass runs do not
    /// change it. Returns how many listeners were invoked.
    pub fn publish(&self, event: &SessionExpiredEvent) -> usize {
        let snapshot: Vec<Listener> =
            self.listeners.lock().iter().map(|(_, listener)| listener.clone()).collect();

        if snapshot.is_empty() {
            debug!(source = event.source(), "session expiry event dropped, no listeners");
            return 0;
        }

        debug!(source = event.source(), listeners = snapshot.len(), "publishing session expiry");
        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    fn remove(&self, id: u64) {
        self.listeners.lock().retain(|(listener_id, _)| *listener_id != id);
    }
}

impl fmt::Debug for SessionExpiryBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionExpiryBus").field("listeners", &self.listener_count()).finish()
    }
}

/// Registration handle returned by [`SessionExpiryBus::subscribe`]
///
/// Dropping it unsubscribes. It does not keep the bus alive.
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    bus: Weak<SessionExpiryBus>,
    active: bool,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    fn release(&mut self) {
        if !std::mem::replace(&mut self.active, false) {
            return;
        }
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
