//! Auth session service
//!
//! Composes the OAuth client, token store and clock into the four session
//! operations the UI uses: probe, start login, finish login, logout.
//!
//! Navigation is never performed here. Operations that end the current
//! application turn return a [`Redirect`] the host must follow.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::AuthError;
use super::jwt::decode_jwt_claims;
use super::token_store::TokenStore;
use super::traits::OAuthClientTrait;
use super::types::{AuthSession, AuthTokens, AuthUser, AuthorizationCallback};
use crate::time::Clock;

/// Tokens expiring within this many seconds count as already expired.
pub const EXPIRY_SAFETY_MARGIN_SECS: i64 = 30;

/// A full navigation the caller must perform
///
/// Nothing after the redirect should run in the same logical flow.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "the caller must navigate to the redirect target"]
pub struct Redirect(String);

impl Redirect {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_url(self) -> String {
        self.0
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session lifecycle over the PKCE flow
///
/// Cheap to clone; all state lives behind `Arc`s.
#[derive(Clone)]
pub struct AuthSessionService {
    client: Arc<dyn OAuthClientTrait>,
    token_store: Arc<TokenStore>,
    clock: Arc<dyn Clock>,
}

impl AuthSessionService {
    #[must_use]
    pub fn new(
        client: Arc<dyn OAuthClientTrait>,
        token_store: Arc<TokenStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { client, token_store, clock }
    }

    /// Current session, if the stored tokens still describe one.
    ///
    /// Best-effort probe: missing, expiring (within
    /// [`EXPIRY_SAFETY_MARGIN_SECS`]), undecodable or subject-less tokens all
    /// read as `None`.
    #[must_use]
    pub fn get_session(&self) -> Option<AuthSession> {
        let tokens = self.token_store.read()?;

        let now = self.clock.epoch_seconds();
        if tokens.expires_within(now, EXPIRY_SAFETY_MARGIN_SECS) {
            debug!(expires_at = tokens.expires_at_epoch_seconds, now, "stored tokens expired");
            return None;
        }

        match session_from_tokens(tokens) {
            Ok(session) => Some(session),
            Err(err) => {
                debug!(kind = %err.kind(), "stored tokens do not describe a session");
                None
            }
        }
    }

    /// Begin a login attempt.
    ///
    /// The pending attempt is persisted before the redirect is returned.
    ///
    /// # Errors
    /// Returns [`AuthError::Storage`] if the pending attempt cannot be saved.
    pub fn start_login(&self) -> Result<Redirect, AuthError> {
        let url = self.client.build_authorize_url()?;
        info!("login started; redirecting to identity provider");
        Ok(Redirect(url))
    }

    /// Complete a login attempt from the redirect callback.
    ///
    /// Unlike [`get_session`](Self::get_session), a token that does not
    /// decode to a subject is a hard failure here.
    ///
    /// # Errors
    /// Any [`AuthError`] from the exchange, [`AuthError::MalformedToken`] if
    /// the identity token lacks a subject, or [`AuthError::Storage`] if the
    /// tokens cannot be persisted.
    pub async fn finish_login(
        &self,
        callback: &AuthorizationCallback,
    ) -> Result<AuthSession, AuthError> {
        let tokens = self.client.exchange_code_for_tokens(&callback.code, &callback.state).await?;
        let session = session_from_tokens(tokens)?;
        self.token_store.write(&session.tokens)?;

        info!(
            expires_at = session.tokens.expires_at_epoch_seconds,
            has_email = session.user.email.is_some(),
            "login completed"
        );
        Ok(session)
    }

    /// Sign out locally and return the identity provider logout redirect.
    ///
    /// A store that cannot be cleared is logged; the redirect is still
    /// produced.
    pub fn logout(&self) -> Redirect {
        if let Err(err) = self.token_store.clear() {
            warn!(error = %err, "failed to clear stored tokens during logout");
        }
        info!("logged out");
        Redirect(self.client.build_logout_url())
    }

    /// Identity token for `Authorization: Bearer`, while a session exists.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        self.get_session().map(|session| session.tokens.id_token)
    }

    #[must_use]
    pub const fn token_store(&self) -> &Arc<TokenStore> {
        &self.token_store
    }

    #[must_use]
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }
}

impl fmt::Debug for AuthSessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSessionService").field("token_store", &self.token_store).finish_non_exhaustive()
    }
}

/// Derive a session from tokens, failing on anything unexpected.
///
/// # Errors
/// Returns [`AuthError::MalformedToken`] if the identity token cannot be
/// decoded or has no non-empty `sub`.
pub fn session_from_tokens(tokens: AuthTokens) -> Result<AuthSession, AuthError> {
    let claims = decode_jwt_claims(&tokens.id_token)?;
    let sub = claims
        .sub
        .filter(|sub| !sub.is_empty())
        .ok_or_else(|| AuthError::MalformedToken("identity token has no sub claim".to_string()))?;

    Ok(AuthSession { tokens, user: AuthUser { sub, email: claims.email } })
}
