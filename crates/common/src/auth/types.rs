//! OAuth 2.0 types and structures
//!
//! Token, session and configuration types of the auth subsystem. The
//! persisted shapes ([`AuthTokens`], [`PkceState`]) serialize as camelCase
//! JSON so the stored blobs stay readable by other hosts of the same
//! application.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::AuthError;

/// Default scopes requested from the identity provider.
pub const DEFAULT_SCOPES: [&str; 3] = ["openid", "email", "profile"];

/// Token set returned by a successful code exchange
///
/// Immutable once created. A later exchange replaces the whole value; it is
/// never patched in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    /// Identity token (JWT) carrying `sub`, `email` and `exp`
    pub id_token: String,

    /// Access token for API authorization
    pub access_token: String,

    /// Refresh token, stored but never used for silent renewal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Identity token `exp` claim (seconds since the Unix epoch)
    pub expires_at_epoch_seconds: i64,
}

impl AuthTokens {
    /// Whether the tokens expire within `margin_seconds` of `now`.
    #[must_use]
    pub const fn expires_within(&self, now: i64, margin_seconds: i64) -> bool {
        self.expires_at_epoch_seconds <= now + margin_seconds
    }
}

// Bearer credentials stay out of debug output and logs.
impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("id_token", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at_epoch_seconds", &self.expires_at_epoch_seconds)
            .finish()
    }
}

/// User identity derived from identity-token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Authenticated session consumed by the rest of the application
///
/// Exists only while its tokens decode to a non-empty subject and have not
/// expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub tokens: AuthTokens,
    pub user: AuthUser,
}

/// Pending login attempt
///
/// At most one is tracked at a time. Starting a new attempt overwrites the
/// previous one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PkceState {
    pub state: String,
    pub code_verifier: String,
}

impl fmt::Debug for PkceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PkceState")
            .field("state_len", &self.state.len())
            .field("code_verifier", &"<redacted>")
            .finish()
    }
}

/// Parameters the identity provider appends to the redirect URI on success
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationCallback {
    pub code: String,
    pub state: String,
}

impl fmt::Debug for AuthorizationCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationCallback")
            .field("code", &"<redacted>")
            .field("state_len", &self.state.len())
            .finish()
    }
}

/// Token endpoint response body (RFC 6749 §5.1)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// OAuth error response from the authorization server (RFC 6749 §5.2)
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderError {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Identity provider configuration for the hosted-UI flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    /// Identity provider domain, with or without scheme
    /// (`auth.example.com` or `https://auth.example.com`)
    pub domain: String,

    /// OAuth client ID
    pub client_id: String,

    /// Where the provider sends the browser back with `code` and `state`
    pub redirect_uri: String,

    /// Where the provider sends the browser after logout
    pub logout_uri: String,

    /// Scopes to request
    pub scopes: Vec<String>,

    /// Optional federated identity provider hint
    pub identity_provider: Option<String>,

    /// Bound on the whole token exchange. `None` leaves only the transport
    /// defaults in place.
    pub exchange_timeout: Option<Duration>,
}

impl OAuthConfig {
    /// Create a configuration with the default scopes and no timeout.
    #[must_use]
    pub fn new(
        domain: impl Into<String>,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
        logout_uri: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            logout_uri: logout_uri.into(),
            scopes: DEFAULT_SCOPES.iter().map(|s| (*s).to_string()).collect(),
            identity_provider: None,
            exchange_timeout: None,
        }
    }

    /// Set the identity provider hint. Empty strings are ignored.
    #[must_use]
    pub fn with_identity_provider(mut self, provider: impl Into<String>) -> Self {
        let provider = provider.into();
        self.identity_provider = (!provider.trim().is_empty()).then_some(provider);
        self
    }

    /// Bound the token exchange.
    #[must_use]
    pub const fn with_exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout = Some(timeout);
        self
    }

    /// Check that every required setting is present.
    ///
    /// # Errors
    /// Returns [`AuthError::ConfigurationMissing`] naming the first empty
    /// field.
    pub fn validate(&self) -> Result<(), AuthError> {
        let required = [
            ("domain", &self.domain),
            ("client_id", &self.client_id),
            ("redirect_uri", &self.redirect_uri),
            ("logout_uri", &self.logout_uri),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AuthError::ConfigurationMissing(name.to_string()));
            }
        }
        Ok(())
    }

    /// Provider base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        let domain = self.domain.trim().trim_end_matches('/');
        if domain.contains("://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        }
    }

    /// `{base}/oauth2/authorize`
    #[must_use]
    pub fn authorization_url(&self) -> String {
        format!("{}/oauth2/authorize", self.base_url())
    }

    /// `{base}/oauth2/token`
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/token", self.base_url())
    }

    /// `{base}/logout`
    #[must_use]
    pub fn logout_endpoint(&self) -> String {
        format!("{}/logout", self.base_url())
    }

    /// Get scopes as space-separated string
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::types.
    use super::*;

    fn config() -> OAuthConfig {
        OAuthConfig::new(
            "https://idp.example.com",
            "abc123",
            "https://app.example/callback",
            "https://app.example/",
        )
    }

    /// Validates the persisted JSON layout of `AuthTokens`.
    ///
    /// Assertions:
    /// - Confirms camelCase field names.
    /// - Ensures an absent refresh token is omitted and read back as `None`.
    #[test]
    fn test_auth_tokens_json_layout() {
        let tokens = AuthTokens {
            id_token: "id".into(),
            access_token: "access".into(),
            refresh_token: None,
            expires_at_epoch_seconds: 1_700_000_000,
        };

        let json = serde_json::to_value(&tokens).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "idToken": "id",
                "accessToken": "access",
                "expiresAtEpochSeconds": 1_700_000_000
            })
        );

        let back: AuthTokens = serde_json::from_value(json).unwrap();
        assert_eq!(back, tokens);
    }

    /// Validates the persisted JSON layout of `PkceState`.
    ///
    /// Assertions:
    /// - Confirms the verifier is stored as `codeVerifier`.
    #[test]
    fn test_pkce_state_json_layout() {
        let pending = PkceState { state: "s".into(), code_verifier: "v".into() };
        let json = serde_json::to_string(&pending).unwrap();
        assert_eq!(json, r#"{"state":"s","codeVerifier":"v"}"#);
    }

    /// Validates that debug output never contains token material.
    ///
    /// Assertions:
    /// - Ensures token strings are redacted.
    #[test]
    fn test_debug_redacts_secrets() {
        let tokens = AuthTokens {
            id_token: "secret-id".into(),
            access_token: "secret-access".into(),
            refresh_token: Some("secret-refresh".into()),
            expires_at_epoch_seconds: 1,
        };
        let rendered = format!("{tokens:?}");
        assert!(!rendered.contains("secret"));

        let pending = PkceState { state: "st".into(), code_verifier: "secret-verifier".into() };
        assert!(!format!("{pending:?}").contains("secret"));
    }

    /// Validates `AuthTokens::expires_within` at the margin boundary.
    ///
    /// Assertions:
    /// - Ensures expiry exactly at `now + margin` counts as expiring.
    /// - Ensures one second later does not.
    #[test]
    fn test_expires_within_boundary() {
        let tokens = AuthTokens {
            id_token: String::new(),
            access_token: String::new(),
            refresh_token: None,
            expires_at_epoch_seconds: 1_030,
        };
        assert!(tokens.expires_within(1_000, 30));
        assert!(!tokens.expires_within(999, 30));
    }

    /// Validates endpoint derivation.
    ///
    /// Assertions:
    /// - Confirms authorize, token and logout URLs.
    /// - Confirms a bare domain gets an https scheme and trailing slashes are
    ///   trimmed.
    #[test]
    fn test_endpoint_urls() {
        let cfg = config();
        assert_eq!(cfg.authorization_url(), "https://idp.example.com/oauth2/authorize");
        assert_eq!(cfg.token_url(), "https://idp.example.com/oauth2/token");
        assert_eq!(cfg.logout_endpoint(), "https://idp.example.com/logout");
        assert_eq!(cfg.scope_string(), "openid email profile");

        let bare = OAuthConfig { domain: "auth.example.com/".into(), ..config() };
        assert_eq!(bare.authorization_url(), "https://auth.example.com/oauth2/authorize");

        let local = OAuthConfig { domain: "http://127.0.0.1:9000".into(), ..config() };
        assert_eq!(local.token_url(), "http://127.0.0.1:9000/oauth2/token");
    }

    /// Validates `OAuthConfig::validate`.
    ///
    /// Assertions:
    /// - Ensures a complete config passes.
    /// - Confirms the first empty field is named in the error.
    #[test]
    fn test_validate_reports_missing_field() {
        assert!(config().validate().is_ok());

        let missing = OAuthConfig { client_id: "  ".into(), ..config() };
        match missing.validate() {
            Err(AuthError::ConfigurationMissing(field)) => assert_eq!(field, "client_id"),
            other => panic!("expected ConfigurationMissing, got {other:?}"),
        }
    }

    /// Validates the optional settings builders.
    ///
    /// Assertions:
    /// - Ensures an empty provider hint is dropped.
    /// - Confirms the exchange timeout is recorded.
    #[test]
    fn test_builders() {
        let cfg = config()
            .with_identity_provider("")
            .with_exchange_timeout(Duration::from_millis(100));
        assert_eq!(cfg.identity_provider, None);
        assert_eq!(cfg.exchange_timeout, Some(Duration::from_millis(100)));

        let google = config().with_identity_provider("Google");
        assert_eq!(google.identity_provider.as_deref(), Some("Google"));
    }

    /// Validates `ProviderError` display.
    ///
    /// Assertions:
    /// - Confirms description is appended after a colon.
    #[test]
    fn test_provider_error_display() {
        let err = ProviderError {
            error: "invalid_grant".into(),
            error_description: Some("code expired".into()),
        };
        assert_eq!(err.to_string(), "invalid_grant: code expired");
    }
}
