//! Application constants
//!
//! Centralized location for domain-level constants used throughout the
//! application.

// Configuration defaults
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_DATA_DIR: &str = ".autonomos";
pub const DEFAULT_APP_ORIGIN: &str = "http://127.0.0.1:8765";

// Loopback callback server used by the terminal host
pub const DEFAULT_CALLBACK_PORT: u16 = 8765;

// HTTP statuses that mean the session is no longer accepted by the API
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_FORBIDDEN: u16 = 403;

// Query parameter carrying the path to return to after login
pub const RETURN_TO_PARAM: &str = "returnTo";
