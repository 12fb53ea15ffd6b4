//! OAuth 2.0 + PKCE session core
//!
//! Relying-party side of the hosted-UI authorization code flow: PKCE
//! construction and verification, identity token decoding, token storage and
//! the session service built on top of them.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────┐
//! │ AuthSessionService │  get_session / start_login / finish_login / logout
//! └─────────┬──────────┘
//!           │
//!           ├──► OAuthClient   (authorize URL, code exchange, logout URL)
//!           │        │
//!           │        ├──► pkce           (state, verifier, S256 challenge)
//!           │        ├──► jwt            (claims, no signature check)
//!           │        └──► KeyValueStore  (pending attempt, tab-scoped)
//!           │
//!           ├──► TokenStore    (current tokens, durable)
//!           └──► Clock         (expiry arithmetic)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use autonomos_common::auth::callback::parse_callback_url;
//! use autonomos_common::auth::{AuthSessionService, OAuthClient, OAuthConfig, TokenStore};
//! use autonomos_common::storage::MemoryStore;
//! use autonomos_common::time::SystemClock;
//!
//! # async fn example() -> Result<(), autonomos_common::auth::AuthError> {
//! let config = OAuthConfig::new(
//!     "auth.example.com",
//!     "client_id",
//!     "http://127.0.0.1:8765/auth/callback",
//!     "http://127.0.0.1:8765/",
//! );
//! let client = OAuthClient::new(config, Arc::new(MemoryStore::new()))?;
//! let tokens = Arc::new(TokenStore::new(Arc::new(MemoryStore::new())));
//! let service = AuthSessionService::new(Arc::new(client), tokens, Arc::new(SystemClock));
//!
//! let redirect = service.start_login()?;
//! // ... the browser visits redirect.url() and comes back ...
//! let callback = parse_callback_url("http://127.0.0.1:8765/auth/callback?code=c&state=s")?;
//! let session = service.finish_login(&callback).await?;
//! assert!(!session.user.sub.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # Trust boundary
//!
//! Identity token signatures are not verified here. The API verifies them on
//! every authenticated request; claims decoded on the client only drive
//! display and expiry.

pub mod callback;
pub mod client;
pub mod error;
pub mod jwt;
pub mod pkce;
pub mod service;
pub mod token_store;
pub mod traits;
pub mod types;

pub use callback::{parse_callback_query, parse_callback_url};
pub use client::{OAuthClient, PKCE_STORAGE_KEY};
pub use error::{AuthError, ErrorKind};
pub use jwt::{decode_jwt_claims, JwtClaims};
pub use pkce::PkceChallenge;
pub use service::{session_from_tokens, AuthSessionService, Redirect, EXPIRY_SAFETY_MARGIN_SECS};
pub use token_store::{TokenStore, TOKENS_STORAGE_KEY};
pub use traits::OAuthClientTrait;
pub use types::{
    AuthSession, AuthTokens, AuthUser, AuthorizationCallback, OAuthConfig, PkceState,
    ProviderError, TokenResponse,
};
