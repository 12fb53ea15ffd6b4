//! Error mapping into the application error
//!
//! Adapters surface [`AutonomosError`](autonomos_domain::AutonomosError) to
//! the binary. The conversions live here so the library crates stay unaware
//! of the application-level taxonomy.

pub mod conversions;

pub use conversions::{map_auth_error, map_http_error, map_storage_error, InfraError};
