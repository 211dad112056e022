//! Durable key-value store.
//!
//! The configurator persists exactly one thing, the saved configuration, as
//! a JSON string under a fixed key.  The store itself knows nothing about
//! configurations: it maps string keys to string values, the same contract a
//! browser's `localStorage` offers.
//!
//! Two adapters implement [`KeyValueStore`]:
//!
//! - [`FileKeyValueStore`] keeps every key in one JSON object on disk
//!   (`{"carConfiguratorConfig": "{\"color\":\"white\",...}"}`).  Each `set`
//!   is a read-modify-write of that file.
//! - [`InMemoryKeyValueStore`] keeps a `HashMap`, for tests and for running
//!   without a writable data directory.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

/// Error type for key-value store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but is not a JSON object of strings.
    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The store contents could not be serialized.
    #[error("failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A previous writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
}

/// String-to-string durable storage.
///
/// Implementations must make a successful `set` visible to every later `get`
/// for the same key, including across process restarts for durable adapters.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if the key was never set.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

// ── File adapter ──────────────────────────────────────────────────────────────

/// Key-value store backed by a single JSON file.
pub struct FileKeyValueStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Creates a store backed by `path`.  The file is created on first `set`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)?;
        debug!("stored key {key} in {}", self.path.display());
        Ok(())
    }
}

// ── In-memory adapter ─────────────────────────────────────────────────────────

/// Volatile key-value store.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> FileKeyValueStore {
        FileKeyValueStore::new(
            std::env::temp_dir()
                .join(format!("carcfg_test_{}", Uuid::new_v4()))
                .join("store.json"),
        )
    }

    fn cleanup(store: &FileKeyValueStore) {
        if let Some(dir) = store.path().parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_file_store_get_missing_file_returns_none() {
        let store = temp_store();
        assert_eq!(store.get("carConfiguratorConfig").expect("get"), None);
    }

    #[test]
    fn test_file_store_set_then_get_returns_value() {
        // Arrange
        let store = temp_store();

        // Act
        store.set("k", "{\"color\":\"blue\"}").expect("set");
        let value = store.get("k").expect("get");

        // Assert
        assert_eq!(value.as_deref(), Some("{\"color\":\"blue\"}"));
        cleanup(&store);
    }

    #[test]
    fn test_file_store_set_overwrites_and_keeps_other_keys() {
        // Arrange
        let store = temp_store();
        store.set("a", "1").expect("set a");
        store.set("b", "2").expect("set b");

        // Act
        store.set("a", "3").expect("overwrite a");

        // Assert
        assert_eq!(store.get("a").expect("get").as_deref(), Some("3"));
        assert_eq!(store.get("b").expect("get").as_deref(), Some("2"));
        cleanup(&store);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let store = temp_store();
        store.set("k", "v").expect("set");

        let reopened = FileKeyValueStore::new(store.path().to_path_buf());

        assert_eq!(reopened.get("k").expect("get").as_deref(), Some("v"));
        cleanup(&store);
    }

    #[test]
    fn test_file_store_corrupt_file_returns_error() {
        // Arrange
        let store = temp_store();
        if let Some(dir) = store.path().parent() {
            std::fs::create_dir_all(dir).expect("mkdir");
        }
        std::fs::write(store.path(), "not json").expect("write");

        // Act
        let result = store.get("k");

        // Assert
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
        cleanup(&store);
    }

    #[test]
    fn test_in_memory_store_round_trip() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("k").expect("get"), None);

        store.set("k", "v").expect("set");

        assert_eq!(store.get("k").expect("get").as_deref(), Some("v"));
    }
}
