//! OAuth 2.0 client implementation with PKCE support
//!
//! Handles the hosted-UI authorization code flow:
//! - authorize URL building, persisting the pending attempt first
//! - authorization code exchange with state validation
//! - logout URL building
//!
//! The pending attempt lives in a [`KeyValueStore`] so that it survives the
//! round trip through the identity provider.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::error::AuthError;
use super::jwt::decode_jwt_claims;
use super::pkce::{states_match, PkceChallenge, CHALLENGE_METHOD};
use super::traits::OAuthClientTrait;
use super::types::{AuthTokens, OAuthConfig, PkceState, TokenResponse};
use crate::storage::KeyValueStore;

/// Storage key of the pending login attempt (tab-scoped store).
pub const PKCE_STORAGE_KEY: &str = "autonomos.auth.pkce";

/// Environment switch that bypasses system proxies for provider calls.
pub const DISABLE_PROXY_ENV: &str = "AUTONOMOS_DISABLE_PROXY";

/// OAuth 2.0 client with PKCE support
///
/// Implements RFC 6749 (OAuth 2.0) and RFC 7636 (PKCE) against a hosted-UI
/// identity provider.
#[derive(Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http: Client,
    pending: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient").field("config", &self.config).finish_non_exhaustive()
    }
}

impl OAuthClient {
    /// Create a new OAuth client with the given configuration
    ///
    /// `pending` holds the in-flight login attempt; it should be a store that
    /// does not outlive the current session (see
    /// [`MemoryStore`](crate::storage::MemoryStore)).
    ///
    /// # Errors
    /// Returns [`AuthError::ConfigurationMissing`] if a required setting is
    /// empty, or [`AuthError::Network`] if the HTTP client cannot be built.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use autonomos_common::auth::{OAuthClient, OAuthConfig};
    /// use autonomos_common::storage::MemoryStore;
    ///
    /// let config = OAuthConfig::new(
    ///     "auth.example.com",
    ///     "client_id",
    ///     "http://localhost:3000/auth/callback",
    ///     "http://localhost:3000/",
    /// );
    /// let client = OAuthClient::new(config, Arc::new(MemoryStore::new())).unwrap();
    /// assert_eq!(client.redirect_uri(), "http://localhost:3000/auth/callback");
    /// ```
    pub fn new(config: OAuthConfig, pending: Arc<dyn KeyValueStore>) -> Result<Self, AuthError> {
        let builder = Client::builder();
        let builder = if std::env::var_os(DISABLE_PROXY_ENV).is_some() {
            builder.no_proxy()
        } else {
            builder
        };
        let http = builder.build()?;
        Self::with_http_client(config, pending, http)
    }

    /// Create a client around an existing `reqwest::Client`.
    ///
    /// # Errors
    /// Returns [`AuthError::ConfigurationMissing`] if a required setting is
    /// empty.
    pub fn with_http_client(
        config: OAuthConfig,
        pending: Arc<dyn KeyValueStore>,
        http: Client,
    ) -> Result<Self, AuthError> {
        config.validate()?;
        Ok(Self { config, http, pending })
    }

    /// Build the authorize URL for a fresh login attempt
    ///
    /// Overwrites any previous pending attempt. The write completes before
    /// the URL is returned, so the caller may navigate away at once.
    ///
    /// # Errors
    /// Returns [`AuthError::Storage`] if the pending attempt cannot be
    /// persisted.
    pub fn build_authorize_url(&self) -> Result<String, AuthError> {
        let challenge = PkceChallenge::generate();

        let pending = serde_json::to_string(&challenge.pending_state())
            .map_err(crate::storage::StorageError::from)?;
        self.pending.set(PKCE_STORAGE_KEY, &pending)?;

        let scope = self.config.scope_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("client_id", self.config.client_id.as_str()),
            ("response_type", "code"),
            ("response_mode", "query"),
            ("scope", scope.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("state", challenge.state.as_str()),
            ("code_challenge_method", CHALLENGE_METHOD),
            ("code_challenge", challenge.code_challenge.as_str()),
        ];

        if let Some(provider) = &self.config.identity_provider {
            params.push(("identity_provider", provider.as_str()));
        }

        let url = format!("{}?{}", self.config.authorization_url(), encode_query(&params));
        debug!(
            endpoint = %self.config.authorization_url(),
            has_identity_provider = self.config.identity_provider.is_some(),
            "authorize URL built"
        );
        Ok(url)
    }

    /// Exchange an authorization code for tokens
    ///
    /// The pending attempt is consumed once the callback state matches, before
    /// the token request is sent. A mismatching state leaves it in place.
    ///
    /// # Errors
    /// - [`AuthError::MissingPkceState`] if no attempt is pending
    /// - [`AuthError::StateMismatch`] if `state` differs from the pending one
    /// - [`AuthError::TokenExchangeFailed`] on a non-2xx response
    /// - [`AuthError::TokenExchangeTimedOut`] if the configured bound elapses
    /// - [`AuthError::Network`] on transport failure
    /// - [`AuthError::MalformedToken`] if the identity token is unusable or has
    ///   no `exp`
    pub async fn exchange_code_for_tokens(
        &self,
        code: &str,
        state: &str,
    ) -> Result<AuthTokens, AuthError> {
        let pending = self.take_pending(state)?;

        let exchange = self.request_tokens(code, &pending.code_verifier);
        let result = match self.config.exchange_timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .unwrap_or_else(|_| Err(AuthError::TokenExchangeTimedOut(limit))),
            None => exchange.await,
        };

        match &result {
            Ok(tokens) => {
                info!(expires_at = tokens.expires_at_epoch_seconds, "token exchange succeeded");
            }
            Err(err) => warn!(kind = %err.kind(), "token exchange failed"),
        }
        result
    }

    /// Build the identity provider logout URL
    #[must_use]
    pub fn build_logout_url(&self) -> String {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("logout_uri", self.config.logout_uri.as_str()),
        ];
        format!("{}?{}", self.config.logout_endpoint(), encode_query(&params))
    }

    /// Get the configured redirect URI
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.config.redirect_uri
    }

    /// Get a reference to the OAuth configuration
    #[must_use]
    pub const fn config(&self) -> &OAuthConfig {
        &self.config
    }

    fn take_pending(&self, state: &str) -> Result<PkceState, AuthError> {
        let Some(raw) = self.pending.get(PKCE_STORAGE_KEY)? else {
            return Err(AuthError::MissingPkceState);
        };

        let pending: PkceState = match serde_json::from_str(&raw) {
            Ok(pending) => pending,
            Err(err) => {
                warn!(error = %err, "discarding unreadable pending login attempt");
                self.pending.remove(PKCE_STORAGE_KEY)?;
                return Err(AuthError::MissingPkceState);
            }
        };

        if !states_match(&pending.state, state) {
            warn!("callback state does not match the pending login attempt");
            return Err(AuthError::StateMismatch);
        }

        self.pending.remove(PKCE_STORAGE_KEY)?;
        Ok(pending)
    }

    async fn request_tokens(&self, code: &str, verifier: &str) -> Result<AuthTokens, AuthError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code_verifier", verifier),
        ];

        let response = self.http.post(self.config.token_url()).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "token endpoint rejected the exchange");
            return Err(AuthError::TokenExchangeFailed { status: status.as_u16(), body });
        }

        let body = response.text().await?;
        let token_response: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            AuthError::MalformedToken(format!("token response is not valid JSON: {e}"))
        })?;

        tokens_from_response(token_response)
    }
}

/// Turn a token endpoint response into [`AuthTokens`].
///
/// The expiry comes from the identity token's `exp` claim, not from
/// `expires_in`.
///
/// # Errors
/// Returns [`AuthError::MalformedToken`] if `id_token` is absent, cannot be
/// decoded, or carries no `exp`.
pub fn tokens_from_response(response: TokenResponse) -> Result<AuthTokens, AuthError> {
    let id_token = response
        .id_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::MalformedToken("token response has no id_token".to_string()))?;

    let claims = decode_jwt_claims(&id_token)?;
    let expires_at_epoch_seconds = claims
        .exp
        .ok_or_else(|| AuthError::MalformedToken("identity token has no exp claim".to_string()))?;

    Ok(AuthTokens {
        id_token,
        access_token: response.access_token,
        refresh_token: response.refresh_token,
        expires_at_epoch_seconds,
    })
}

fn encode_query(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[async_trait]
impl OAuthClientTrait for OAuthClient {
    fn build_authorize_url(&self) -> Result<String, AuthError> {
        self.build_authorize_url()
    }

    async fn exchange_code_for_tokens(
        &self,
        code: &str,
        state: &str,
    ) -> Result<AuthTokens, AuthError> {
        self.exchange_code_for_tokens(code, state).await
    }

    fn build_logout_url(&self) -> String {
        self.build_logout_url()
    }

    fn redirect_uri(&self) -> &str {
        self.redirect_uri()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::client.
    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::fixtures::test_jwt_with_exp;

    fn create_test_config() -> OAuthConfig {
        OAuthConfig::new(
            "https://idp.example.com",
            "abc123",
            "https://app.example/callback",
            "https://app.example/",
        )
    }

    fn client_with_store() -> (OAuthClient, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let client = OAuthClient::new(create_test_config(), store.clone()).unwrap();
        (client, store)
    }

    fn query_param(url: &str, name: &str) -> Option<String> {
        let parsed = url::Url::parse(url).unwrap();
        parsed.query_pairs().find(|(k, _)| k == name).map(|(_, v)| v.into_owned())
    }

    /// Validates `OAuthClient::build_authorize_url` query parameters.
    ///
    /// Assertions:
    /// - Confirms endpoint and fixed parameters.
    /// - Confirms the state is at least 16 base64url characters.
    /// - Ensures the pending attempt is stored with the same state.
    #[test]
    fn test_build_authorize_url() {
        let (client, store) = client_with_store();
        let url = client.build_authorize_url().unwrap();

        assert!(url.starts_with("https://idp.example.com/oauth2/authorize?"));
        assert_eq!(query_param(&url, "client_id").as_deref(), Some("abc123"));
        assert_eq!(query_param(&url, "response_type").as_deref(), Some("code"));
        assert_eq!(query_param(&url, "response_mode").as_deref(), Some("query"));
        assert_eq!(query_param(&url, "scope").as_deref(), Some("openid email profile"));
        assert_eq!(
            query_param(&url, "redirect_uri").as_deref(),
            Some("https://app.example/callback")
        );
        assert_eq!(query_param(&url, "code_challenge_method").as_deref(), Some("S256"));
        assert!(query_param(&url, "identity_provider").is_none());

        let state = query_param(&url, "state").unwrap();
        assert!(state.len() >= 16);

        let raw = store.get(PKCE_STORAGE_KEY).unwrap().unwrap();
        let pending: PkceState = serde_json::from_str(&raw).unwrap();
        assert_eq!(pending.state, state);
        assert_eq!(
            query_param(&url, "code_challenge").unwrap(),
            crate::crypto::sha256_base64url(&pending.code_verifier)
        );
    }

    /// Validates the identity provider hint.
    ///
    /// Assertions:
    /// - Confirms `identity_provider` is appended when configured.
    #[test]
    fn test_authorize_url_with_identity_provider() {
        let config = create_test_config().with_identity_provider("Google");
        let client = OAuthClient::new(config, Arc::new(MemoryStore::new())).unwrap();

        let url = client.build_authorize_url().unwrap();
        assert_eq!(query_param(&url, "identity_provider").as_deref(), Some("Google"));
    }

    /// Validates that a new attempt replaces the previous one.
    ///
    /// Assertions:
    /// - Ensures the first attempt's state is rejected after a second build.
    #[tokio::test]
    async fn test_new_attempt_overwrites_pending() {
        let (client, _store) = client_with_store();
        let first = query_param(&client.build_authorize_url().unwrap(), "state").unwrap();
        let _second = client.build_authorize_url().unwrap();

        let err = client.exchange_code_for_tokens("code", &first).await.unwrap_err();
        assert!(matches!(err, AuthError::StateMismatch));
    }

    /// Validates exchange without a pending attempt.
    ///
    /// Assertions:
    /// - Ensures `MissingPkceState` is returned.
    #[tokio::test]
    async fn test_exchange_without_pending_state() {
        let (client, _store) = client_with_store();
        let err = client.exchange_code_for_tokens("code", "state").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingPkceState));
    }

    /// Validates the state check.
    ///
    /// Assertions:
    /// - Ensures a wrong state fails with `StateMismatch`.
    /// - Confirms the pending attempt is left in place.
    #[tokio::test]
    async fn test_state_mismatch_keeps_pending() {
        let (client, store) = client_with_store();
        client.build_authorize_url().unwrap();

        let err = client.exchange_code_for_tokens("code", "wrong_state").await.unwrap_err();
        assert!(matches!(err, AuthError::StateMismatch));
        assert!(store.get(PKCE_STORAGE_KEY).unwrap().is_some());
    }

    /// Validates handling of a corrupt pending attempt.
    ///
    /// Assertions:
    /// - Ensures unreadable JSON is reported as `MissingPkceState`.
    /// - Confirms the corrupt entry is removed.
    #[tokio::test]
    async fn test_corrupt_pending_state() {
        let (client, store) = client_with_store();
        store.set(PKCE_STORAGE_KEY, "{not json").unwrap();

        let err = client.exchange_code_for_tokens("code", "s").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingPkceState));
        assert!(store.get(PKCE_STORAGE_KEY).unwrap().is_none());
    }

    /// Validates `OAuthClient::build_logout_url`.
    ///
    /// Assertions:
    /// - Confirms endpoint and encoded parameters.
    /// - Ensures pending state is untouched.
    #[test]
    fn test_build_logout_url() {
        let (client, store) = client_with_store();
        client.build_authorize_url().unwrap();
        let before = store.get(PKCE_STORAGE_KEY).unwrap();

        let url = client.build_logout_url();
        assert_eq!(
            url,
            "https://idp.example.com/logout?client_id=abc123&logout_uri=https%3A%2F%2Fapp.example%2F"
        );
        assert_eq!(store.get(PKCE_STORAGE_KEY).unwrap(), before);
    }

    /// Validates configuration checks at construction.
    ///
    /// Assertions:
    /// - Ensures an empty client id fails with `ConfigurationMissing`.
    #[test]
    fn test_new_rejects_missing_client_id() {
        let config = OAuthConfig { client_id: String::new(), ..create_test_config() };
        let err = OAuthClient::new(config, Arc::new(MemoryStore::new())).unwrap_err();
        assert!(matches!(err, AuthError::ConfigurationMissing(ref field) if field == "client_id"));
    }

    /// Validates `tokens_from_response`.
    ///
    /// Assertions:
    /// - Confirms the expiry comes from the `exp` claim.
    /// - Ensures a missing id token or `exp` is malformed.
    #[test]
    fn test_tokens_from_response() {
        let response = TokenResponse {
            access_token: "a".into(),
            id_token: Some(test_jwt_with_exp("user-1", 1_700_000_000)),
            refresh_token: Some("r".into()),
            expires_in: Some(3600),
            token_type: Some("Bearer".into()),
        };
        let tokens = tokens_from_response(response.clone()).unwrap();
        assert_eq!(tokens.expires_at_epoch_seconds, 1_700_000_000);
        assert_eq!(tokens.refresh_token.as_deref(), Some("r"));

        let no_id = TokenResponse { id_token: None, ..response.clone() };
        assert!(matches!(tokens_from_response(no_id), Err(AuthError::MalformedToken(_))));

        let no_exp = TokenResponse {
            id_token: Some(crate::testing::fixtures::test_jwt(&serde_json::json!({"sub": "u"}))),
            ..response
        };
        assert!(matches!(tokens_from_response(no_exp), Err(AuthError::MalformedToken(_))));
    }
}
