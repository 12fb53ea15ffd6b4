//! HTTP transport
//!
//! [`HttpClient`] wraps reqwest with retries on server errors and transient
//! transport failures. Requests sent through
//! [`HttpClient::send_authorized`] carry the session's bearer token and feed
//! 401/403 responses back into the session-expiry bus.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
