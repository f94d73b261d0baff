//! Keyed record store abstraction for entities.
//!
//! Entities are stored by their key. Only persisted fields travel through a
//! backend; derived caches are rebuilt on first access after loading.

use crate::entity::SpatialEntity;
use crate::error::Result;
use std::sync::Arc;

mod memory;
#[cfg(feature = "snapshot")]
mod snapshot;

pub use memory::MemoryBackend;
#[cfg(feature = "snapshot")]
pub use snapshot::SnapshotFile;

/// Trait for storage backend implementations
pub trait StorageBackend: Send + Sync {
    /// Insert or replace an entity, returning the previous one with the same key
    fn put(&mut self, entity: Arc<SpatialEntity>) -> Result<Option<Arc<SpatialEntity>>>;

    fn get(&self, key: &str) -> Result<Option<Arc<SpatialEntity>>>;

    /// Delete a key and return the old entity if it existed
    fn delete(&mut self, key: &str) -> Result<Option<Arc<SpatialEntity>>>;

    fn contains_key(&self, key: &str) -> Result<bool>;

    /// Sorted keys starting with `prefix`
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool>;

    fn stats(&self) -> Result<StorageStats>;

    /// Apply operations in order
    fn batch(&mut self, ops: &[StorageOp]) -> Result<()>;

    fn iter(&self) -> Result<Box<dyn Iterator<Item = Arc<SpatialEntity>> + '_>>;

    /// Close the storage backend
    fn close(&mut self) -> Result<()>;
}

/// Storage operation for batch processing
#[derive(Debug, Clone)]
pub enum StorageOp {
    Put { entity: Arc<SpatialEntity> },
    Delete { key: String },
}

/// Storage backend statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub key_count: usize,
    /// Entities carrying a serialized area payload
    pub area_count: usize,
    /// Approximate size of serialized payloads in bytes
    pub payload_bytes: usize,
    pub operations_count: u64,
}
