//! RocksDB-backed profile store.
//!
//! One JSON-serialized `ProfileSet` per key. Values are written whole;
//! there is no merge operator and no read-modify-write primitive, so the
//! last writer wins.

use std::path::Path;

use rocksdb::{Options, DB};
use tracing::{debug, info, warn};

use async_trait::async_trait;
use evolve_types::ProfileSet;

use crate::error::StorageError;
use crate::store::ProfileStore;

/// Key prefix for profile-set records.
fn profile_set_key(key: &str) -> String {
    format!("profile_set:{key}")
}

/// Profile store backed by a local RocksDB instance.
pub struct RocksDbProfileStore {
    db: DB,
}

impl RocksDbProfileStore {
    /// Open the store at the given path, creating it if necessary.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        info!("Opening profile store at {:?}", path);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);

        let db = DB::open(&db_opts, path)?;
        Ok(Self { db })
    }
}

#[async_trait]
impl ProfileStore for RocksDbProfileStore {
    async fn load(&self, key: &str) -> Result<Option<ProfileSet>, StorageError> {
        let Some(bytes) = self.db.get(profile_set_key(key))? else {
            debug!(key = %key, "No profile set stored");
            return Ok(None);
        };

        // A record that no longer parses is treated as absent rather than
        // surfaced as an error; the engine starts fresh.
        match serde_json::from_slice::<ProfileSet>(&bytes) {
            Ok(set) => Ok(Some(set)),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding unreadable profile set record");
                Ok(None)
            }
        }
    }

    async fn save(&self, key: &str, set: &ProfileSet) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(set)?;
        self.db.put(profile_set_key(key), bytes)?;
        debug!(key = %key, profiles = set.list.len(), "Saved profile set");
        Ok(())
    }
}
