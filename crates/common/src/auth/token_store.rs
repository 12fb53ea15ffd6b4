//! Durable token storage
//!
//! Persists the current [`AuthTokens`] as one JSON blob under a single key.
//! Corrupt or unreadable state reads as "no tokens"; startup never fails
//! because of what is on disk.

use std::sync::Arc;

use tracing::warn;

use super::types::AuthTokens;
use crate::storage::{KeyValueStore, StorageError};

/// Storage key of the current token set (durable store).
pub const TOKENS_STORAGE_KEY: &str = "autonomos.auth.tokens";

/// Token persistence over a [`KeyValueStore`]
#[derive(Clone)]
pub struct TokenStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl TokenStore {
    /// Store tokens under [`TOKENS_STORAGE_KEY`].
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(backend, TOKENS_STORAGE_KEY)
    }

    #[must_use]
    pub fn with_key(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { backend, key: key.into() }
    }

    /// Read the stored tokens.
    ///
    /// Backend failures and malformed JSON are logged and read as `None`.
    #[must_use]
    pub fn read(&self) -> Option<AuthTokens> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key = %self.key, error = %err, "token store unreadable; treating as signed out");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(tokens) => Some(tokens),
            Err(err) => {
                warn!(key = %self.key, error = %err, "stored tokens are malformed; ignoring");
                None
            }
        }
    }

    /// Replace the stored tokens.
    ///
    /// # Errors
    /// Returns [`StorageError`] if the tokens cannot be persisted.
    pub fn write(&self, tokens: &AuthTokens) -> Result<(), StorageError> {
        let json = serde_json::to_string(tokens)?;
        self.backend.set(&self.key, &json)
    }

    /// Remove the stored tokens.
    ///
    /// # Errors
    /// Returns [`StorageError`] if the backend refuses the removal.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.backend.remove(&self.key)
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").field("key", &self.key).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::token_store.
    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::mocks::MockStorage;

    fn tokens() -> AuthTokens {
        AuthTokens {
            id_token: "h.p.s".into(),
            access_token: "access".into(),
            refresh_token: Some("refresh".into()),
            expires_at_epoch_seconds: 1_700_000_000,
        }
    }

    /// Validates the write, read, clear cycle.
    ///
    /// Assertions:
    /// - Confirms an empty store reads `None`.
    /// - Confirms written tokens read back equal.
    /// - Ensures `clear` removes them.
    #[test]
    fn test_write_read_clear() {
        let store = TokenStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(store.read(), None);

        store.write(&tokens()).unwrap();
        assert_eq!(store.read(), Some(tokens()));

        store.clear().unwrap();
        assert_eq!(store.read(), None);
        store.clear().unwrap();
    }

    /// Validates tolerance of corrupt stored JSON.
    ///
    /// Assertions:
    /// - Ensures malformed and wrong-shaped JSON read as `None`.
    #[test]
    fn test_corrupt_json_reads_none() {
        let backend = Arc::new(MemoryStore::new());
        let store = TokenStore::new(backend.clone());

        backend.set(TOKENS_STORAGE_KEY, "{not json").unwrap();
        assert_eq!(store.read(), None);

        backend.set(TOKENS_STORAGE_KEY, r#"{"idToken":"x"}"#).unwrap();
        assert_eq!(store.read(), None);
    }

    /// Validates behaviour when the backend fails.
    ///
    /// Assertions:
    /// - Ensures a failing read is `None`.
    /// - Ensures a failing write surfaces the error.
    #[test]
    fn test_backend_failure() {
        let backend = Arc::new(MockStorage::new());
        let store = TokenStore::new(backend.clone());
        store.write(&tokens()).unwrap();

        backend.set_failing(true);
        assert_eq!(store.read(), None);
        assert!(store.write(&tokens()).is_err());
        assert!(store.clear().is_err());
    }
}
