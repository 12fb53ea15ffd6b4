//! Shared cryptographic primitives used by the token codec and the PKCE flow.
//!
//! - [`random`]: CSPRNG-backed random strings (PKCE state and verifier)
//! - [`encoding`]: base64url encode/decode and the S256 code challenge digest

pub mod encoding;
pub mod random;

pub use encoding::{base64url_decode, base64url_encode, pad_base64url, sha256_base64url};
pub use random::random_string;
