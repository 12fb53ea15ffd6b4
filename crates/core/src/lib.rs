//! # Autonomos Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The session-expiry event bus
//! - The in-memory current session holder
//! - Port interfaces (traits) for the UI surfaces the session logic drives
//! - The session timeout coordinator state machine
//!
//! ## Architecture Principles
//! - Only depends on `autonomos-common` and `autonomos-domain`
//! - No file, HTTP, or terminal code
//! - All UI effects via traits
//! - Pure, testable business logic

pub mod session;

pub use session::bus::{SessionExpiryBus, Subscription};
pub use session::coordinator::{CoordinatorDeps, SessionTimeoutCoordinator};
pub use session::current::CurrentSession;
pub use session::ports::{ExpiryPrompt, Navigator};
pub use session::state::{CoordinatorState, WarningTrigger};
