//! Test fixture generators
//!
//! Builds unsigned identity tokens with chosen claims. The signature segment
//! is a constant placeholder; nothing in this workspace verifies it.

use serde_json::{json, Value};

use crate::crypto::base64url_encode;

const HEADER: &str = r#"{"alg":"RS256","typ":"JWT","kid":"test"}"#;

/// Build a compact JWT with `claims` as the payload.
///
/// # Examples
///
/// ```
/// use autonomos_common::auth::decode_jwt_claims;
/// use autonomos_common::testing::fixtures::test_jwt;
///
/// let token = test_jwt(&serde_json::json!({"sub": "user-1"}));
/// assert_eq!(decode_jwt_claims(&token).unwrap().sub.as_deref(), Some("user-1"));
/// ```
#[must_use]
pub fn test_jwt(claims: &Value) -> String {
    format!(
        "{}.{}.{}",
        base64url_encode(HEADER.as_bytes()),
        base64url_encode(claims.to_string().as_bytes()),
        base64url_encode(b"test-signature")
    )
}

/// Build a JWT with `sub`, an email derived from it, and `exp`.
#[must_use]
pub fn test_jwt_with_exp(sub: &str, exp: i64) -> String {
    test_jwt(&json!({
        "sub": sub,
        "email": format!("{sub}@example.com"),
        "exp": exp,
        "iss": "https://idp.example.com",
        "token_use": "id"
    }))
}
