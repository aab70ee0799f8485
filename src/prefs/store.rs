//! String key-value storage for preferences
//!
//! The game only needs get/set by key with string values. [`JsonFileStore`]
//! keeps the map in a flat JSON object on disk and rewrites it on every set.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write preferences to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Stored value, or `default` when the key was never written
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

/// In-memory store, used when no preferences file is configured
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store persisted as a JSON object of strings
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// A missing file starts empty. An unreadable or corrupt file is logged and
    /// also starts empty; it is replaced on the next write.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(values) => values,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "ignoring corrupt preferences file"
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "could not read preferences file"
                );
                BTreeMap::new()
            }
        };

        Self { path, values }
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.values)?;

        let write_err = |source| StoreError::Write {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        std::fs::write(&self.path, json).map_err(write_err)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_defaults() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("missing"), None);
        assert_eq!(store.get_or("missing", "fallback"), "fallback");

        store.set("key", "value").unwrap();
        assert_eq!(store.get_or("key", "fallback"), "value");
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.get("snakeHighScore"), None);
        store.set("snakeHighScore", "120").unwrap();
        store.set("soundEnabled", "false").unwrap();

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("snakeHighScore").as_deref(), Some("120"));
        assert_eq!(reopened.get("soundEnabled").as_deref(), Some("false"));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.get("soundEnabled"), None);

        store.set("soundEnabled", "true").unwrap();
        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("soundEnabled").as_deref(), Some("true"));
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes the write fail
        let path = dir.path().join("prefs.json");
        std::fs::create_dir(&path).unwrap();

        let mut store = JsonFileStore::open(&path);
        assert!(matches!(
            store.set("soundEnabled", "false"),
            Err(StoreError::Write { .. })
        ));
    }
}
