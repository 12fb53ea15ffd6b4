//! Key-value storage abstraction
//!
//! Two lifetimes of state back the auth subsystem:
//!
//! - a durable, origin-scoped store for the current token set (see
//!   `autonomos_infra::storage::FileStore`)
//! - a short-lived, tab-scoped store for the pending PKCE attempt
//!   ([`MemoryStore`], gone when the process exits)
//!
//! Both sit behind [`KeyValueStore`]. The trait is synchronous because the
//! session probe that reads it is synchronous.

pub mod error;
pub mod memory;

pub use error::StorageError;
pub use memory::MemoryStore;

/// Minimal string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// Readers observe either the previous or the new value, never a mix.
    ///
    /// # Errors
    /// Returns [`StorageError`] if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    /// Returns [`StorageError`] if the backend refuses the removal.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
