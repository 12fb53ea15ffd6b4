//! Mock implementations of common traits
//!
//! Provides mock objects for testing purposes.

// Allow missing error/panic docs for test mocks - they are designed to be simple
// and errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::auth::{AuthError, AuthTokens, OAuthClientTrait};
use crate::storage::{KeyValueStore, StorageError};

type StorageData = Arc<Mutex<HashMap<String, String>>>;
type ExchangeQueue = Arc<Mutex<VecDeque<Result<AuthTokens, AuthError>>>>;

/// In-memory [`KeyValueStore`] with a failure switch
///
/// # Examples
///
/// ```
/// use autonomos_common::storage::KeyValueStore;
/// use autonomos_common::testing::mocks::MockStorage;
///
/// let storage = MockStorage::new();
/// storage.set("key1", "value1").unwrap();
/// assert_eq!(storage.get("key1").unwrap(), Some("value1".to_string()));
///
/// storage.set_failing(true);
/// assert!(storage.get("key1").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockStorage {
    data: StorageData,
    failing: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MockStorage {
    /// Create a new mock storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with `StorageError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Check if a key exists
    #[must_use]
    pub fn exists(&self, key: &str) -> bool {
        // SAFETY: Mutex poisoning is acceptable in test mocks
        self.data.lock().unwrap().contains_key(key)
    }

    /// Get all keys
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        // SAFETY: Mutex poisoning is acceptable in test mocks
        self.data.lock().unwrap().keys().cloned().collect()
    }

    /// Number of successful `set` calls.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StorageError::Unavailable("mock storage set to fail".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MockStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        // SAFETY: Mutex poisoning is acceptable in test mocks
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.data.lock().unwrap().insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.data.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Scripted [`OAuthClientTrait`] implementation
///
/// Exchange results are queued with [`push_exchange`](Self::push_exchange)
/// and returned in order. An empty queue behaves like a client with no
/// pending attempt.
#[derive(Debug, Clone, Default)]
pub struct MockOAuthClient {
    exchanges: ExchangeQueue,
    authorize_calls: Arc<AtomicUsize>,
    exchange_calls: Arc<AtomicUsize>,
}

impl MockOAuthClient {
    /// Create a new mock OAuth client with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next `exchange_code_for_tokens` call.
    pub fn push_exchange(&self, result: Result<AuthTokens, AuthError>) {
        self.exchanges.lock().unwrap().push_back(result);
    }

    #[must_use]
    pub fn authorize_calls(&self) -> usize {
        self.authorize_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OAuthClientTrait for MockOAuthClient {
    fn build_authorize_url(&self) -> Result<String, AuthError> {
        let n = self.authorize_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("https://idp.test/oauth2/authorize?client_id=mock&state=mock-state-{n}"))
    }

    async fn exchange_code_for_tokens(
        &self,
        _code: &str,
        _state: &str,
    ) -> Result<AuthTokens, AuthError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        self.exchanges.lock().unwrap().pop_front().unwrap_or(Err(AuthError::MissingPkceState))
    }

    fn build_logout_url(&self) -> String {
        "https://idp.test/logout?client_id=mock&logout_uri=https%3A%2F%2Fapp.test%2F".to_string()
    }

    fn redirect_uri(&self) -> &str {
        "https://app.test/auth/callback"
    }
}
