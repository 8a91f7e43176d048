//! Key-value preference stores.
//!
//! This module provides:
//! - `KeyValueStore`: the string-keyed, string-valued store the game persists into
//! - `MemoryStore`: in-process store for tests and ephemeral sessions
//! - `FileStore`: the whole map kept as one JSON document on disk

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StorageResult;

/// A string-keyed preference store.
///
/// Implementations use interior locking so a store can be shared behind an
/// `Arc`.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value.
    fn set(&self, key: &str, value: String) -> StorageResult<()>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

// ============================================================================
// Memory Store
// ============================================================================

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> StorageResult<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

// ============================================================================
// File Store
// ============================================================================

/// Store backed by a single JSON file.
///
/// Every write rewrites the file atomically (write to temp, then rename).
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file opens empty. A file that is not a JSON object of
    /// strings is treated as empty and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Discarding corrupt preference file {}: {e}", path.display());
                    BTreeMap::new()
                },
            }
        } else {
            debug!("Preference file {} not found, starting empty", path.display());
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let bytes = serde_json::to_vec_pretty(entries)?;
        let temp_path = self.temp_path();

        let written = fs::File::create(&temp_path).and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()?;
            drop(file);
            fs::rename(&temp_path, &self.path)
        });

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                debug!("Could not remove {}: {cleanup}", temp_path.display());
            }
            return Err(e.into());
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> StorageResult<()> {
        let mut entries = self.entries.write();
        let previous = entries.insert(key.to_string(), value);
        if let Err(e) = self.persist(&entries) {
            // Keep memory in sync with what is on disk.
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write();
        if let Some(previous) = entries.remove(key) {
            if let Err(e) = self.persist(&entries) {
                entries.insert(key.to_string(), previous);
                return Err(e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("a", "1".to_string()).expect("set");
        assert_eq!(store.get("a").expect("get"), Some("1".to_string()));
        assert_eq!(store.len(), 1);

        store.remove("a").expect("remove");
        store.remove("a").expect("remove missing");
        assert_eq!(store.get("a").expect("get"), None);
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("prefs.json");

        let store = FileStore::open(&path).expect("open");
        store.set("player_stats", "{}".to_string()).expect("set");
        assert!(path.exists());
        assert!(!store.temp_path().exists());

        let reopened = FileStore::open(&path).expect("reopen");
        assert_eq!(
            reopened.get("player_stats").expect("get"),
            Some("{}".to_string())
        );

        reopened.remove("player_stats").expect("remove");
        let reopened = FileStore::open(&path).expect("reopen");
        assert_eq!(reopened.get("player_stats").expect("get"), None);
    }

    #[test]
    fn test_file_store_corrupt_file_opens_empty() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json at all").expect("write");

        let store = FileStore::open(&path).expect("open");
        assert_eq!(store.get("anything").expect("get"), None);

        store.set("k", "v".to_string()).expect("set");
        let reopened = FileStore::open(&path).expect("reopen");
        assert_eq!(reopened.get("k").expect("get"), Some("v".to_string()));
    }

    #[test]
    fn test_failed_persist_removes_temp_and_rolls_back() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("prefs.json");
        let store = FileStore::open(&path).expect("open");
        store.set("kept", "1".to_string()).expect("set");

        // A non-empty directory at the target makes the final rename fail.
        fs::remove_file(&path).expect("remove file");
        fs::create_dir(&path).expect("create dir");
        fs::write(path.join("occupied"), "x").expect("write");

        assert!(store.set("lost", "2".to_string()).is_err());
        assert!(!store.temp_path().exists());
        assert_eq!(store.get("lost").expect("get"), None);
        assert_eq!(store.get("kept").expect("get"), Some("1".to_string()));
    }
}
