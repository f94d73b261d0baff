//! In-memory storage backend implementation.

use super::{StorageBackend, StorageOp, StorageStats};
use crate::entity::SpatialEntity;
use crate::error::Result;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// In-memory storage backend using HashMap
#[derive(Default)]
pub struct MemoryBackend {
    data: FxHashMap<String, Arc<SpatialEntity>>,
    operations_count: u64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut backend = Self::new();
        backend.data.reserve(capacity);
        backend
    }
}

impl StorageBackend for MemoryBackend {
    fn put(&mut self, entity: Arc<SpatialEntity>) -> Result<Option<Arc<SpatialEntity>>> {
        self.operations_count += 1;
        Ok(self.data.insert(entity.key().to_string(), entity))
    }

    fn get(&self, key: &str) -> Result<Option<Arc<SpatialEntity>>> {
        Ok(self.data.get(key).cloned())
    }

    fn delete(&mut self, key: &str) -> Result<Option<Arc<SpatialEntity>>> {
        self.operations_count += 1;
        Ok(self.data.remove(key))
    }

    fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.data.contains_key(key))
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self
            .data
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();

        // Hash order is arbitrary; callers expect a stable listing.
        keys.sort();

        Ok(keys)
    }

    fn len(&self) -> Result<usize> {
        Ok(self.data.len())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.data.is_empty())
    }

    fn stats(&self) -> Result<StorageStats> {
        let mut stats = StorageStats {
            key_count: self.data.len(),
            operations_count: self.operations_count,
            ..StorageStats::default()
        };
        for entity in self.data.values() {
            if let Some(payload) = entity.serialized_geometry() {
                stats.area_count += 1;
                stats.payload_bytes += payload.len();
            }
            stats.payload_bytes += entity.serialized_entrance_ids().map_or(0, <[u8]>::len);
        }
        Ok(stats)
    }

    fn batch(&mut self, ops: &[StorageOp]) -> Result<()> {
        for op in ops {
            match op {
                StorageOp::Put { entity } => {
                    self.put(Arc::clone(entity))?;
                }
                StorageOp::Delete { key } => {
                    self.delete(key)?;
                }
            }
        }
        Ok(())
    }

    fn iter(&self) -> Result<Box<dyn Iterator<Item = Arc<SpatialEntity>> + '_>> {
        Ok(Box::new(self.data.values().cloned()))
    }

    fn close(&mut self) -> Result<()> {
        self.data.clear();
        self.operations_count = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    fn entity(key: &str) -> Arc<SpatialEntity> {
        Arc::new(SpatialEntity::from_location_parameters(
            Some(key.to_string()),
            key,
            Point::new(0.0, 0.0),
            None,
        ))
    }

    #[test]
    fn test_memory_backend_basic_ops() {
        let mut backend = MemoryBackend::new();

        assert!(backend.put(entity("node/1")).unwrap().is_none());
        let retrieved = backend.get("node/1").unwrap().unwrap();
        assert_eq!(retrieved.key(), "node/1");

        assert!(backend.contains_key("node/1").unwrap());
        assert!(!backend.contains_key("node/2").unwrap());

        let replaced = backend.put(entity("node/1")).unwrap();
        assert!(replaced.is_some());
        assert_eq!(backend.len().unwrap(), 1);

        let deleted = backend.delete("node/1").unwrap().unwrap();
        assert_eq!(deleted.key(), "node/1");
        assert!(backend.is_empty().unwrap());
        assert!(backend.delete("node/1").unwrap().is_none());
    }

    #[test]
    fn test_keys_with_prefix_are_sorted() {
        let mut backend = MemoryBackend::with_capacity(4);
        for key in ["way/9", "node/3", "way/1", "node/1"] {
            backend.put(entity(key)).unwrap();
        }

        assert_eq!(backend.keys_with_prefix("way/").unwrap(), vec!["way/1", "way/9"]);
        assert_eq!(backend.keys_with_prefix("").unwrap().len(), 4);
        assert!(backend.keys_with_prefix("relation/").unwrap().is_empty());
    }

    #[test]
    fn test_batch_and_stats() {
        let mut backend = MemoryBackend::new();
        backend
            .batch(&[
                StorageOp::Put { entity: entity("a") },
                StorageOp::Put { entity: entity("b") },
                StorageOp::Delete { key: "a".to_string() },
            ])
            .unwrap();

        let stats = backend.stats().unwrap();
        assert_eq!(stats.key_count, 1);
        assert_eq!(stats.area_count, 0);
        assert_eq!(stats.operations_count, 3);
        assert_eq!(backend.iter().unwrap().count(), 1);

        backend.close().unwrap();
        assert!(backend.is_empty().unwrap());
    }
}
