//! In-memory profile store for tests and embedded use.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use evolve_types::ProfileSet;

use crate::error::StorageError;
use crate::store::ProfileStore;

/// A `ProfileStore` held entirely in memory.
///
/// Supports failure injection so callers can test the swallow-and-log
/// behavior required of persistence consumers.
#[derive(Default)]
pub struct MemoryProfileStore {
    records: Mutex<HashMap<String, ProfileSet>>,
    fail_saves: AtomicBool,
    save_count: AtomicU64,
}

impl MemoryProfileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save` fail.
    pub fn inject_save_failure(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> u64 {
        self.save_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn load(&self, key: &str) -> Result<Option<ProfileSet>, StorageError> {
        let records = self
            .records
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(records.get(key).cloned())
    }

    async fn save(&self, key: &str, set: &ProfileSet) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("injected failure".to_string()));
        }
        let mut records = self
            .records
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        records.insert(key.to_string(), set.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
