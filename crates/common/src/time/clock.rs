//! Wall-clock abstraction
//!
//! Token expiry is expressed as absolute epoch seconds, so the only question
//! code ever asks the clock is "what second is it now".

use chrono::Utc;

/// Trait for time operations to enable testing
pub trait Clock: Send + Sync {
    /// Current wall-clock time as seconds since the UNIX epoch.
    fn epoch_seconds(&self) -> i64;
}

/// Real system clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_seconds(&self) -> i64 {
        Utc::now().timestamp()
    }
}
