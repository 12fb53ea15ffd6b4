//! Traits for OAuth operations
//!
//! Abstracts the identity provider so the session service can be tested with
//! [`crate::testing::MockOAuthClient`] instead of a live token endpoint.

use async_trait::async_trait;

use super::error::AuthError;
use super::types::AuthTokens;

/// Trait for the PKCE flow against a hosted identity provider
#[async_trait]
pub trait OAuthClientTrait: Send + Sync {
    /// Start a login attempt and return the authorize URL.
    ///
    /// The pending state is persisted before this returns, so the caller can
    /// navigate away immediately.
    ///
    /// # Errors
    /// Returns [`AuthError::Storage`] if the pending state cannot be written.
    fn build_authorize_url(&self) -> Result<String, AuthError>;

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    /// Returns [`AuthError::MissingPkceState`], [`AuthError::StateMismatch`],
    /// [`AuthError::TokenExchangeFailed`], [`AuthError::TokenExchangeTimedOut`],
    /// [`AuthError::Network`] or [`AuthError::MalformedToken`].
    async fn exchange_code_for_tokens(&self, code: &str, state: &str)
        -> Result<AuthTokens, AuthError>;

    /// Identity provider logout URL. Pure; never touches pending state.
    fn build_logout_url(&self) -> String;

    /// Get the configured redirect URI
    fn redirect_uri(&self) -> &str;
}
