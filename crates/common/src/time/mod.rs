//! Time utilities and abstractions
//!
//! - **[`clock`]**: wall-clock abstraction in epoch seconds, so expiry
//!   arithmetic can be driven by a mock in tests
//! - **[`timer`]**: cancellable one-shot timers on the tokio runtime
//!
//! ## Usage
//!
//! ```rust
//! use autonomos_common::time::{Clock, SystemClock};
//!
//! let now = SystemClock.epoch_seconds();
//! assert!(now > 1_600_000_000);
//! ```

pub mod clock;
pub mod timer;

pub use clock::{Clock, SystemClock};
pub use timer::{timeout, TimerHandle};
