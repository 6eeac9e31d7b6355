//! The `ProfileStore` contract.

use async_trait::async_trait;
use evolve_types::ProfileSet;

use crate::error::StorageError;

/// Whole-record profile-set persistence.
///
/// The record under a key is read and written in full. Concurrent writers
/// are not coordinated: the later `save` wins entirely, silently discarding
/// any concurrent update. Callers that need stronger guarantees must
/// serialize their own writes.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Load the profile set stored under `key`, if any.
    async fn load(&self, key: &str) -> Result<Option<ProfileSet>, StorageError>;

    /// Overwrite the whole record under `key`.
    async fn save(&self, key: &str, set: &ProfileSet) -> Result<(), StorageError>;
}
