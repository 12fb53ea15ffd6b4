//! Shared test helpers for `autonomos-core` integration tests.
//!
//! Recording doubles for the UI ports and a harness that wires a coordinator
//! to in-memory stores and a mock clock.

#![allow(dead_code)]

pub mod ui;

use std::sync::Arc;

use autonomos_common::auth::{session_from_tokens, TokenStore};
use autonomos_common::testing::{test_jwt_with_exp, MockClock};
use autonomos_common::{AuthSession, AuthTokens, MemoryStore};
use autonomos_core::{CoordinatorDeps, CurrentSession, SessionExpiryBus};

pub use ui::{RecordingNavigator, RecordingPrompt};

pub const NOW: i64 = 1_700_000_000;

/// Everything a coordinator talks to, kept so tests can inspect it.
pub struct Harness {
    pub bus: Arc<SessionExpiryBus>,
    pub current_session: Arc<CurrentSession>,
    pub token_store: Arc<TokenStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub prompt: Arc<RecordingPrompt>,
    pub clock: MockClock,
}

impl Harness {
    pub fn at(route: &str) -> Self {
        Self {
            bus: SessionExpiryBus::new(),
            current_session: Arc::new(CurrentSession::default()),
            token_store: Arc::new(TokenStore::new(Arc::new(MemoryStore::new()))),
            navigator: Arc::new(RecordingNavigator::at(route)),
            prompt: Arc::new(RecordingPrompt::default()),
            clock: MockClock::new(NOW),
        }
    }

    pub fn deps(&self) -> CoordinatorDeps {
        CoordinatorDeps {
            bus: self.bus.clone(),
            current_session: self.current_session.clone(),
            token_store: self.token_store.clone(),
            navigator: self.navigator.clone(),
            prompt: self.prompt.clone(),
            clock: Arc::new(self.clock.clone()),
        }
    }

    /// Persist and hold a session expiring at `exp`.
    pub fn sign_in(&self, sub: &str, exp: i64) -> AuthSession {
        let session = session_for(sub, exp);
        self.token_store.write(&session.tokens).unwrap();
        self.current_session.set(session.clone());
        session
    }
}

pub fn session_for(sub: &str, exp: i64) -> AuthSession {
    session_from_tokens(AuthTokens {
        id_token: test_jwt_with_exp(sub, exp),
        access_token: format!("access-{sub}-{exp}"),
        refresh_token: None,
        expires_at_epoch_seconds: exp,
    })
    .unwrap()
}
