//! Time mocking utilities
//!
//! [`MockClock`] is a [`Clock`] whose current second only moves when a test
//! moves it.
//!
//! # Examples
//!
//! ```
//! use autonomos_common::testing::MockClock;
//! use autonomos_common::time::Clock;
//!
//! let clock = MockClock::new(1_700_000_000);
//! clock.advance(5);
//! assert_eq!(clock.epoch_seconds(), 1_700_000_005);
//! ```

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

pub use crate::time::{Clock, SystemClock};

/// Mock clock for deterministic testing
///
/// Clones share the same underlying time.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<AtomicI64>,
}

impl MockClock {
    /// Create a clock frozen at `epoch_seconds`.
    #[must_use]
    pub fn new(epoch_seconds: i64) -> Self {
        Self { now: Arc::new(AtomicI64::new(epoch_seconds)) }
    }

    /// Move the clock forward by `seconds`.
    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }

    /// Jump to an absolute time.
    pub fn set(&self, epoch_seconds: i64) {
        self.now.store(epoch_seconds, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn epoch_seconds(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
