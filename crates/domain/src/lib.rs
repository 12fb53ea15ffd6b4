//! # Autonomos Domain
//!
//! Domain types shared by every Autonomos crate.
//!
//! This crate contains:
//! - Session-expiry events
//! - Auth route constants and helpers
//! - Configuration structures
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other Autonomos crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod routes;

// Re-export commonly used items
pub use config::{AppConfig, AuthSettings, LoggingSettings, StorageSettings};
pub use errors::{AutonomosError, Result};
pub use events::SessionExpiredEvent;
