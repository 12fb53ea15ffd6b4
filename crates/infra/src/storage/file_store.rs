//! Durable, origin-scoped key-value store on the local filesystem
//!
//! Layout:
//!
//! ```text
//! <data_dir>/origins/<blake3(origin) hex prefix>/<key>.json
//! ```
//!
//! Each origin gets its own directory, so two origins never see each other's
//! entries. Writes land in a temporary file in the same directory and are
//! renamed over the target, so a reader sees the old or the new value and
//! never a torn one.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use autonomos_common::{KeyValueStore, StorageError};
use tempfile::NamedTempFile;
use tracing::debug;

const ORIGINS_DIR: &str = "origins";
const ORIGIN_DIGEST_HEX_LEN: usize = 32;
const ENTRY_EXTENSION: &str = "json";

/// File-backed [`KeyValueStore`] scoped to one application origin
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    origin: String,
}

impl FileStore {
    /// Open (creating if needed) the store for `origin` under `data_dir`.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(
        data_dir: impl AsRef<Path>,
        origin: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let origin = origin.into();
        let dir = data_dir.as_ref().join(ORIGINS_DIR).join(origin_dir_name(&origin));
        fs::create_dir_all(&dir)?;
        debug!(origin = %origin, dir = %dir.display(), "file store opened");
        Ok(Self { dir, origin })
    }

    /// Directory holding this origin's entries
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{ENTRY_EXTENSION}")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.entry_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key)?;
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|err| StorageError::Io(err.error))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn origin_dir_name(origin: &str) -> String {
    let digest = blake3::hash(origin.trim_end_matches('/').as_bytes()).to_hex();
    digest.as_str()[..ORIGIN_DIGEST_HEX_LEN].to_string()
}

/// Keys become file names, so only `[A-Za-z0-9._-]` is allowed and dot-only
/// names are rejected.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let allowed = key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if key.is_empty() || !allowed || key.chars().all(|c| c == '.') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
