//! # Autonomos Infrastructure
//!
//! Infrastructure implementations of the session subsystem's seams.
//!
//! This crate contains:
//! - Configuration loading (environment, TOML, JSON)
//! - The durable, origin-scoped file store
//! - Tracing subscriber setup
//! - The API collaborator hook and the authorising HTTP client
//! - The loopback OAuth callback server
//! - Error mapping into `AutonomosError`
//!
//! ## Architecture
//! - Implements traits defined in `autonomos-common` and `autonomos-core`
//! - Depends on `autonomos-domain` and `autonomos-core`
//! - Contains all "impure" code (I/O, sockets, global subscriber)

pub mod api;
pub mod callback;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod storage;

// Re-export commonly used items
pub use api::ApiSessionHook;
pub use callback::CallbackServer;
pub use errors::{map_auth_error, map_storage_error, InfraError};
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::init_tracing;
pub use storage::FileStore;
