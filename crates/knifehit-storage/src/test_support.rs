//! Stores for exercising failure paths in unit tests.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{StorageError, StorageResult};
use crate::kv::{KeyValueStore, MemoryStore};

/// Store whose writes fail while broken.
#[derive(Debug, Default)]
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    broken: AtomicBool,
}

impl FlakyStore {
    /// A store that rejects writes until repaired.
    pub(crate) fn broken() -> Self {
        let store = Self::default();
        store.set_broken(true);
        store
    }

    pub(crate) fn set_broken(&self, broken: bool) {
        self.broken.store(broken, Ordering::SeqCst);
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: String) -> StorageResult<()> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(StorageError::Io(io::Error::other("disk full")));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner.remove(key)
    }
}
