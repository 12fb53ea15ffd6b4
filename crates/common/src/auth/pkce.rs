//! PKCE (Proof Key for Code Exchange) implementation for OAuth 2.0
//!
//! Implements RFC 7636 S256. A fresh state and verifier are generated for
//! every login attempt and never reused.

use super::types::PkceState;
use crate::crypto::{random_string, sha256_base64url};

/// Random bytes behind the anti-CSRF `state` (22 base64url characters).
pub const STATE_BYTES: usize = 16;

/// Random bytes behind the code verifier (43 base64url characters, the
/// RFC 7636 minimum).
pub const VERIFIER_BYTES: usize = 32;

/// The only challenge method this client sends.
pub const CHALLENGE_METHOD: &str = "S256";

/// PKCE challenge pair for one authorization request
#[derive(Clone)]
pub struct PkceChallenge {
    /// Kept secret until the token exchange
    pub code_verifier: String,

    /// `BASE64URL(SHA256(code_verifier))`, sent with the authorize request
    pub code_challenge: String,

    /// Anti-CSRF token round-tripped through the redirect
    pub state: String,
}

impl PkceChallenge {
    /// Generate a new challenge from the CSPRNG.
    ///
    /// # Examples
    /// ```
    /// use autonomos_common::auth::pkce::PkceChallenge;
    ///
    /// let challenge = PkceChallenge::generate();
    /// assert_eq!(challenge.code_verifier.len(), 43);
    /// assert_eq!(challenge.state.len(), 22);
    /// ```
    #[must_use]
    pub fn generate() -> Self {
        let state = random_string(STATE_BYTES);
        let code_verifier = random_string(VERIFIER_BYTES);
        let code_challenge = sha256_base64url(&code_verifier);
        Self { code_verifier, code_challenge, state }
    }

    /// The part of the challenge that must survive the redirect.
    #[must_use]
    pub fn pending_state(&self) -> PkceState {
        PkceState { state: self.state.clone(), code_verifier: self.code_verifier.clone() }
    }
}

impl std::fmt::Debug for PkceChallenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PkceChallenge")
            .field("code_challenge", &self.code_challenge)
            .field("code_verifier", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Compare the callback state with the pending one.
///
/// Both values are public per-attempt nonces, so a plain comparison is
/// enough.
#[must_use]
pub fn states_match(expected: &str, actual: &str) -> bool {
    expected == actual
}
