//! Testing utilities and helpers
//!
//! - **[`fixtures`]**: unsigned JWT builders
//! - **[`mocks`]**: [`MockStorage`] and [`MockOAuthClient`]
//! - **[`time`]**: [`MockClock`]
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use autonomos_common::auth::{AuthSessionService, TokenStore};
//! use autonomos_common::testing::{MockClock, MockOAuthClient, MockStorage};
//!
//! let service = AuthSessionService::new(
//!     Arc::new(MockOAuthClient::new()),
//!     Arc::new(TokenStore::new(Arc::new(MockStorage::new()))),
//!     Arc::new(MockClock::new(1_700_000_000)),
//! );
//! assert!(service.get_session().is_none());
//! ```

pub mod fixtures;
pub mod mocks;
pub mod time;

pub use fixtures::{test_jwt, test_jwt_with_exp};
pub use mocks::{MockOAuthClient, MockStorage};
pub use time::MockClock;
