//! OAuth redirect target for hosts without a browser document
//!
//! The terminal host points the provider's `redirect_uri` at a loopback
//! address and lets [`CallbackServer`] catch the `?code=&state=` redirect.
//! Parsing follows the same rules as
//! [`parse_callback_query`](autonomos_common::auth::parse_callback_query).

pub mod server;

pub use server::CallbackServer;
