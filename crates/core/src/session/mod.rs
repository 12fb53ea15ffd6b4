//! Session lifecycle
//!
//! Everything the UI shell needs to react to an expiring session, without any
//! I/O of its own:
//!
//! - **[`bus`]**: process-scoped publish/subscribe channel for
//!   [`SessionExpiredEvent`](autonomos_domain::SessionExpiredEvent)s
//! - **[`current`]**: the in-memory session the UI holds
//! - **[`ports`]**: traits for navigation and the confirmation surface
//! - **[`state`]**: coordinator states and warning triggers
//! - **[`coordinator`]**: the session timeout coordinator
//!
//! ## Flow
//!
//! ```text
//!  API 401/403 ──┐
//!                ├──► SessionExpiryBus ──► SessionTimeoutCoordinator ──► ExpiryPrompt::open
//!  expiry timer ─┘                                   │
//!                                        acknowledge │
//!                                                    ▼
//!                           TokenStore::clear + CurrentSession::clear
//!                           Navigator::redirect("/login?returnTo=...")
//! ```

pub mod bus;
pub mod coordinator;
pub mod current;
pub mod ports;
pub mod state;
