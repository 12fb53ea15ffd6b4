//! Identity token claim decoding
//!
//! Claims are read without verifying the signature. There is no key material
//! on the client; the API verifies the signature of every token it receives,
//! and the claims decoded here only drive display and expiry bookkeeping.

use serde_json::Value;

use super::error::AuthError;
use crate::crypto::base64url_decode;

/// Subset of identity-token claims the session layer uses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JwtClaims {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub exp: Option<i64>,
}

/// Decode the payload claims of a compact JWT.
///
/// Claims of an unexpected JSON type are treated as absent. A fractional
/// `exp` is truncated to whole seconds.
///
/// # Errors
/// Returns [`AuthError::MalformedToken`] if the token does not have exactly
/// three dot-separated segments, or its payload is not base64url-encoded
/// JSON object.
pub fn decode_jwt_claims(token: &str) -> Result<JwtClaims, AuthError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(AuthError::MalformedToken(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let payload = base64url_decode(segments[1])
        .map_err(|e| AuthError::MalformedToken(format!("payload is not base64url: {e}")))?;

    let value: Value = serde_json::from_slice(&payload)
        .map_err(|e| AuthError::MalformedToken(format!("payload is not JSON: {e}")))?;

    let Value::Object(claims) = value else {
        return Err(AuthError::MalformedToken("payload is not a JSON object".to_string()));
    };

    let string_claim = |name: &str| claims.get(name).and_then(Value::as_str).map(str::to_owned);

    #[allow(clippy::cast_possible_truncation)]
    let exp = claims.get("exp").and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)));

    Ok(JwtClaims { sub: string_claim("sub"), email: string_claim("email"), exp })
}
