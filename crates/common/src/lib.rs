//! Modular common utilities shared across Autonomos crates.
//!
//! # Safety and Quality
//!
//! This crate enforces strict safety and quality standards. Everything that
//! touches credentials (PKCE secrets, identity tokens) lives here so that the
//! rules for handling them are written down once.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: errors, base64url and random/crypto helpers
//! - `runtime`: clock abstraction and cancellable timers (tokio)
//! - `platform`: key-value storage, OAuth 2.0 + PKCE client, token codec,
//!   token store and the auth session service
//! - `observability`: tracing (pulled in by `runtime`)
//! - `test-utils`: mocks, mock clock and JWT fixtures for downstream tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod crypto;
#[cfg(feature = "foundation")]
pub mod error;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod time;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;
#[cfg(feature = "platform")]
pub mod storage;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", all(test, feature = "platform")))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "platform")]
pub use auth::{AuthError, AuthSession, AuthSessionService, AuthTokens, ErrorKind};
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
#[cfg(feature = "platform")]
pub use storage::{KeyValueStore, MemoryStore, StorageError};
#[cfg(feature = "runtime")]
pub use time::{Clock, SystemClock};
