//! Snapshot persistence of the entity set.
//!
//! A snapshot is a magic header, a format version, the write timestamp and a
//! bincode-encoded list of entities. Snapshots are written to a temporary file
//! and atomically renamed over the previous one.

use crate::config::SnapshotSettings;
use crate::entity::SpatialEntity;
use crate::error::{PlacemarkError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const SNAPSHOT_MAGIC: &[u8] = b"PLACEMARK_SNAPSHOT";
const SNAPSHOT_VERSION: u8 = 1;

pub struct SnapshotFile {
    path: PathBuf,
    settings: SnapshotSettings,
    ops_since_snapshot: usize,
}

impl SnapshotFile {
    pub fn new<P: AsRef<Path>>(path: P, settings: SnapshotSettings) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            settings,
            ops_since_snapshot: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads every entity. A missing or empty file is an empty snapshot.
    pub fn load(&self) -> Result<Vec<SpatialEntity>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Vec::new());
        }

        let mut reader = BufReader::new(file);

        let mut magic = vec![0u8; SNAPSHOT_MAGIC.len()];
        reader.read_exact(&mut magic)?;
        if magic != SNAPSHOT_MAGIC {
            return Err(PlacemarkError::InvalidFormat);
        }

        let mut version = [0u8; 1];
        reader.read_exact(&mut version)?;
        if version[0] != SNAPSHOT_VERSION {
            return Err(PlacemarkError::InvalidFormat);
        }

        let mut timestamp = [0u8; 12];
        reader.read_exact(&mut timestamp)?;

        let entities: Vec<SpatialEntity> = bincode::deserialize_from(&mut reader)?;
        log::debug!(
            "Loaded {} entities from snapshot {}",
            entities.len(),
            self.path.display()
        );
        Ok(entities)
    }

    pub fn save<'a, I>(&mut self, entities: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a SpatialEntity>,
    {
        let entities: Vec<&SpatialEntity> = entities.into_iter().collect();
        let temp_path = self.temp_path();

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;

        let mut writer = BufWriter::new(file);

        writer.write_all(SNAPSHOT_MAGIC)?;
        writer.write_all(&[SNAPSHOT_VERSION])?;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        writer.write_all(&timestamp.as_secs().to_le_bytes())?;
        writer.write_all(&timestamp.subsec_nanos().to_le_bytes())?;

        bincode::serialize_into(&mut writer, &entities)?;

        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&temp_path, &self.path)?;
        self.sync_parent_dir()?;

        self.ops_since_snapshot = 0;
        log::debug!(
            "Wrote {} entities to snapshot {}",
            entities.len(),
            self.path.display()
        );

        Ok(())
    }

    pub fn record_operation(&mut self) {
        self.ops_since_snapshot += 1;
    }

    pub fn should_snapshot(&self) -> bool {
        self.settings
            .auto_snapshot_ops
            .is_some_and(|threshold| self.ops_since_snapshot >= threshold)
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        if let Some(name) = temp.file_name() {
            let mut new_name = name.to_string_lossy().into_owned();
            new_name.push_str(".tmp");
            temp.set_file_name(new_name);
        }
        temp
    }

    fn sync_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MapFeature, Point};
    use placemark_types::geometry::Geometry;
    use tempfile::NamedTempFile;

    #[test]
    fn test_snapshot_roundtrip() {
        let temp = NamedTempFile::new().unwrap();
        let mut snapshot = SnapshotFile::new(temp.path(), SnapshotSettings::default());

        let area = Geometry::from_rings(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], vec![])
            .unwrap();
        let mut building =
            SpatialEntity::from_feature(&MapFeature::new(area.clone()).with_id("way/1"), None)
                .unwrap();
        building.set_entrance_ids(&["node/2".to_string()]).unwrap();
        building.mark_selected(SystemTime::now());
        let stop = SpatialEntity::new("Stop", Point::new(0.5, 0.5));

        snapshot.save([&building, &stop]).unwrap();

        let loaded = snapshot.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], building);
        assert_eq!(loaded[1], stop);
        assert_eq!(loaded[0].geometry(), Some(&area));
    }

    #[test]
    fn test_auto_snapshot_threshold() {
        let temp = NamedTempFile::new().unwrap();
        let settings = SnapshotSettings {
            auto_snapshot_ops: Some(3),
        };
        let mut snapshot = SnapshotFile::new(temp.path(), settings);

        assert!(!snapshot.should_snapshot());
        snapshot.record_operation();
        snapshot.record_operation();
        assert!(!snapshot.should_snapshot());
        snapshot.record_operation();
        assert!(snapshot.should_snapshot());

        snapshot.save(std::iter::empty()).unwrap();
        assert!(!snapshot.should_snapshot());
    }

    #[test]
    fn test_load_nonexistent() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path().with_extension("nonexistent");
        let snapshot = SnapshotFile::new(&path, SnapshotSettings::default());

        assert!(snapshot.load().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_magic() {
        let temp = NamedTempFile::new().unwrap();
        let mut file = File::create(temp.path()).unwrap();
        file.write_all(b"NOT_A_PLACEMARK_SNAPSHOT_FILE").unwrap();
        file.sync_all().unwrap();
        drop(file);

        let snapshot = SnapshotFile::new(temp.path(), SnapshotSettings::default());
        assert!(matches!(snapshot.load(), Err(PlacemarkError::InvalidFormat)));
    }
}
