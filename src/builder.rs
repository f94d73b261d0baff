//! Builder for place indexes with optional snapshot persistence.

use crate::config::Config;
use crate::error::{PlacemarkError, Result};
use crate::index::PlaceIndex;
use crate::storage::MemoryBackend;

#[cfg(feature = "snapshot")]
use crate::storage::{SnapshotFile, StorageBackend};
#[cfg(feature = "snapshot")]
use std::{path::PathBuf, sync::Arc};

/// Builder for a [`PlaceIndex`] with a custom configuration and snapshot path.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    #[cfg(feature = "snapshot")]
    snapshot_path: Option<PathBuf>,
    config: Config,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the snapshot path. An existing snapshot is loaded on build; the file
    /// is written on `snapshot()`, on close, and every `auto_snapshot_ops`
    /// mutations when configured.
    #[cfg(feature = "snapshot")]
    pub fn snapshot_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Drop any snapshot path.
    pub fn in_memory(mut self) -> Self {
        #[cfg(feature = "snapshot")]
        {
            self.snapshot_path = None;
        }
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<PlaceIndex> {
        self.config.validate().map_err(PlacemarkError::InvalidInput)?;

        #[cfg(feature = "snapshot")]
        if let Some(snapshot_path) = self.snapshot_path {
            let snapshot_file = SnapshotFile::new(&snapshot_path, self.config.snapshot.clone());

            let mut backend = MemoryBackend::new();
            for entity in snapshot_file.load()? {
                backend.put(Arc::new(entity))?;
            }
            log::debug!(
                "Restored {} entities from {}",
                backend.len()?,
                snapshot_path.display()
            );

            let mut index = PlaceIndex::with_backend(self.config, Box::new(backend))?;
            index.attach_snapshot(snapshot_file);
            return Ok(index);
        }

        PlaceIndex::with_backend(self.config, Box::new(MemoryBackend::new()))
    }
}
