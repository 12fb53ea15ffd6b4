//! Collaborator interface for the REST API client
//!
//! The API client itself is not part of this workspace. What it needs from
//! the session subsystem is small:
//!
//! - the identity token for `Authorization: Bearer`, while a session exists
//! - a way to report 401/403 responses so the session-expiry bus hears them
//!
//! Both live on [`ApiSessionHook`]. [`crate::http::HttpClient`] wires it
//! into every authorised request.

pub mod session_hook;

pub use session_hook::ApiSessionHook;
