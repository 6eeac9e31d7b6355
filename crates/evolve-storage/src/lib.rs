//! Storage layer for the topic evolution engine.
//!
//! The persistence collaborator is a key-value store holding one whole
//! `ProfileSet` record per key. Only whole-record reads and writes exist:
//! no partial-field updates, no compare-and-swap, no transactions. A later
//! write fully overwrites an earlier one (last-write-wins).

pub mod db;
pub mod error;
pub mod memory;
pub mod store;

pub use db::RocksDbProfileStore;
pub use error::StorageError;
pub use memory::MemoryProfileStore;
pub use store::ProfileStore;
