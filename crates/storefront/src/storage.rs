//! Persistent key-value storage for client state.
//!
//! The stores persist four small values between runs: the access token, the
//! serialized user record, the serialized cart map and the active locale.
//! [`Storage`] abstracts over where they live: [`MemoryStorage`] for tests
//! and embedding, [`FileStorage`] for the command-line front end.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use thiserror::Error;
use tracing::warn;

/// Storage keys for persisted client state.
pub mod keys {
    /// Key for the bearer access token.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Key for the JSON-serialized user record.
    pub const AUTH_USER: &str = "auth_user";

    /// Key for the JSON-serialized cart line map.
    pub const SHOPPING_CART: &str = "shopping_cart";

    /// Key for the active locale tag.
    pub const LOCALE: &str = "shop_locale";
}

/// Errors that can occur when persisting state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file could not be encoded.
    #[error("storage encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String key-value storage with synchronous access.
pub trait Storage: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Write a value, logging instead of failing.
///
/// Store actions must not fail because persistence did.
pub fn persist(storage: &dyn Storage, key: &str, value: &str) {
    if let Err(e) = storage.set(key, value) {
        warn!(key, error = %e, "Failed to persist value");
    }
}

/// Remove a value, logging instead of failing.
pub fn forget(storage: &dyn Storage, key: &str) {
    if let Err(e) = storage.remove(key) {
        warn!(key, error = %e, "Failed to remove persisted value");
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// Volatile in-process storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with values.
    #[must_use]
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// Storage backed by a single JSON object file.
///
/// The whole file is rewritten on every change through a temporary file and
/// a rename, so a crash never leaves a half-written file behind.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open storage at `path`, creating parent directories as needed.
    ///
    /// A missing file starts empty. A file that cannot be parsed is
    /// discarded with a warning and also starts empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or the parent
    /// directory cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Discarding unreadable storage file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let encoded = serde_json::to_vec_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, encoded)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        if values.remove(key).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.get(keys::LOCALE).is_none());
        storage.set(keys::LOCALE, "en").unwrap();
        assert_eq!(storage.get(keys::LOCALE).as_deref(), Some("en"));
        storage.remove(keys::LOCALE).unwrap();
        assert!(storage.get(keys::LOCALE).is_none());
    }

    #[test]
    fn test_memory_storage_remove_missing_is_ok() {
        let storage = MemoryStorage::new();
        assert!(storage.remove("nothing").is_ok());
    }

    #[test]
    fn test_file_storage_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("storage.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set(keys::ACCESS_TOKEN, "tok").unwrap();
        storage.set(keys::SHOPPING_CART, r#"{"1":2}"#).unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(keys::ACCESS_TOKEN).as_deref(), Some("tok"));
        assert_eq!(reopened.get(keys::SHOPPING_CART).as_deref(), Some(r#"{"1":2}"#));
    }

    #[test]
    fn test_file_storage_discards_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert!(storage.get(keys::ACCESS_TOKEN).is_none());
        storage.set(keys::LOCALE, "ru").unwrap();
        assert_eq!(
            FileStorage::open(&path).unwrap().get(keys::LOCALE).as_deref(),
            Some("ru")
        );
    }
}
