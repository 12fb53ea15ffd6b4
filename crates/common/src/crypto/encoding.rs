//! Base64url primitives and the SHA-256 code challenge digest.
//!
//! Encoding never emits padding. Decoding accepts unpadded input by padding
//! it back to a multiple of four, which is how JWT segments arrive.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::{DecodeError, Engine};
use sha2::{Digest, Sha256};

/// Base64url-encode bytes without padding (`+` → `-`, `/` → `_`).
#[must_use]
pub fn base64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Re-pad a base64url string with `=` up to a multiple of four characters.
#[must_use]
pub fn pad_base64url(input: &str) -> String {
    let mut padded = input.to_owned();
    let remainder = padded.len() % 4;
    if remainder != 0 {
        padded.extend(std::iter::repeat('=').take(4 - remainder));
    }
    padded
}

/// Decode a base64url string, padded or not.
///
/// # Errors
/// Returns [`DecodeError`] for characters outside the URL-safe alphabet or
/// for lengths that cannot come from any byte sequence.
pub fn base64url_decode(input: &str) -> Result<Vec<u8>, DecodeError> {
    URL_SAFE.decode(pad_base64url(input))
}

/// SHA-256 of the UTF-8 input, base64url-encoded without padding.
///
/// Per RFC 7636 this is `BASE64URL(SHA256(ASCII(code_verifier)))`, the S256
/// code challenge. Only the verifier is ever hashed with it.
#[must_use]
pub fn sha256_base64url(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    base64url_encode(&hasher.finalize())
}
