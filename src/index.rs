//! In-memory place index: keyed entity storage plus R*-trees over centroids and
//! area bounds.
//!
//! The index is the shared lookup that entrance identifiers resolve against, and
//! answers proximity (`nearest`, `within_radius`) and containment queries.
//!
//! ```rust
//! use placemark::{PlaceIndex, Point, SpatialEntity};
//!
//! let index = PlaceIndex::memory();
//! index.insert(SpatialEntity::from_location_parameters(
//!     Some("cafe".to_string()),
//!     "Cafe",
//!     Point::new(13.4050, 52.5200),
//!     None,
//! ))?;
//!
//! let nearby = index.within_radius(&Point::new(13.4051, 52.5201), 100.0, None)?;
//! assert_eq!(nearby[0].0.key(), "cafe");
//! # Ok::<(), placemark::PlacemarkError>(())
//! ```

use crate::compute::validation::{
    validate_geographic_point, validate_geometry, validate_limit, validate_radius,
};
use crate::config::Config;
use crate::entity::SpatialEntity;
use crate::error::{PlacemarkError, Result};
use crate::resolver::EntranceResolver;
use crate::storage::{MemoryBackend, StorageBackend, StorageStats};
use parking_lot::RwLock;
use placemark_types::geo::Point;
use rstar::{AABB, Point as RstarPoint, RTree, RTreeObject};
use std::sync::Arc;
use std::time::SystemTime;

#[cfg(feature = "snapshot")]
use crate::storage::SnapshotFile;
#[cfg(feature = "snapshot")]
use parking_lot::Mutex;

const EARTH_MEAN_RADIUS_METERS: f64 = 6_371_008.8;

/// Entity centroid on the unit sphere.
///
/// Euclidean distance between unit vectors is the chord length, which orders
/// points exactly as great-circle distance does and has no seam at the
/// antimeridian.
#[derive(Debug, Clone, PartialEq)]
struct IndexedCentroid {
    x: f64,
    y: f64,
    z: f64,
    lon: f64,
    lat: f64,
    key: String,
}

impl IndexedCentroid {
    fn new(point: &Point, key: String) -> Self {
        let (lon, lat) = (point.x().to_radians(), point.y().to_radians());
        Self {
            x: lat.cos() * lon.cos(),
            y: lat.cos() * lon.sin(),
            z: lat.sin(),
            lon: point.x(),
            lat: point.y(),
            key,
        }
    }

    fn of(entity: &SpatialEntity) -> Option<Self> {
        let centroid = entity.centroid();
        centroid
            .is_finite()
            .then(|| Self::new(&centroid, entity.key().to_string()))
    }

    fn query(center: &Point) -> Self {
        Self::new(center, String::new())
    }

    fn position(&self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

impl RstarPoint for IndexedCentroid {
    type Scalar = f64;
    const DIMENSIONS: usize = 3;

    fn generate(mut generator: impl FnMut(usize) -> Self::Scalar) -> Self {
        Self {
            x: generator(0),
            y: generator(1),
            z: generator(2),
            lon: 0.0,
            lat: 0.0,
            key: String::new(),
        }
    }

    fn nth(&self, index: usize) -> Self::Scalar {
        match index {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => unreachable!(),
        }
    }

    fn nth_mut(&mut self, index: usize) -> &mut Self::Scalar {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => unreachable!(),
        }
    }
}

/// Area bounds for R*-tree indexing.
#[derive(Debug, Clone, PartialEq)]
struct IndexedArea {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    key: String,
}

impl IndexedArea {
    fn of(entity: &SpatialEntity) -> Option<Self> {
        let geometry = entity.geometry().filter(|geometry| geometry.is_area())?;
        let rect = geometry.bounding_rect()?;
        let bounds = [rect.min().x, rect.min().y, rect.max().x, rect.max().y];
        if !bounds.iter().all(|value| value.is_finite()) {
            return None;
        }
        Some(Self {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
            key: entity.key().to_string(),
        })
    }
}

impl RTreeObject for IndexedArea {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

struct IndexState {
    backend: Box<dyn StorageBackend>,
    centroids: RTree<IndexedCentroid>,
    areas: RTree<IndexedArea>,
    closed: bool,
}

impl IndexState {
    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(PlacemarkError::IndexClosed);
        }
        Ok(())
    }

    fn put(&mut self, entity: Arc<SpatialEntity>) -> Result<()> {
        let (centroid, area) = index_entries(&entity)?;

        if let Some(previous) = self.backend.put(entity)? {
            self.unlink(&previous);
        }
        self.centroids.insert(centroid);
        if let Some(area) = area {
            self.areas.insert(area);
        }
        Ok(())
    }

    fn unlink(&mut self, entity: &SpatialEntity) {
        if let Some(centroid) = IndexedCentroid::of(entity) {
            self.centroids.remove(&centroid);
        }
        if let Some(area) = IndexedArea::of(entity) {
            self.areas.remove(&area);
        }
    }

    fn entity(&self, key: &str) -> Option<Arc<SpatialEntity>> {
        match self.backend.get(key) {
            Ok(entity) => entity,
            Err(e) => {
                log::warn!("Failed to read {} from storage: {}", key, e);
                None
            }
        }
    }
}

/// Shared, thread-safe index of entities.
pub struct PlaceIndex {
    config: Config,
    state: RwLock<IndexState>,
    #[cfg(feature = "snapshot")]
    snapshot: Option<Mutex<SnapshotFile>>,
}

impl PlaceIndex {
    /// An empty in-memory index with the default configuration.
    pub fn memory() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::from_parts(config, Box::new(MemoryBackend::new()))
    }

    /// Index the entities already held by `backend`.
    pub fn with_backend(config: Config, backend: Box<dyn StorageBackend>) -> Result<Self> {
        let mut centroids = Vec::new();
        let mut areas = Vec::new();
        for entity in backend.iter()? {
            match index_entries(&entity) {
                Ok((centroid, area)) => {
                    centroids.push(centroid);
                    areas.extend(area);
                }
                Err(e) => log::warn!("Not indexing stored entity {}: {}", entity.key(), e),
            }
        }

        let index = Self::from_parts(config, backend);
        {
            let mut state = index.state.write();
            state.centroids = RTree::bulk_load(centroids);
            state.areas = RTree::bulk_load(areas);
        }
        Ok(index)
    }

    fn from_parts(config: Config, backend: Box<dyn StorageBackend>) -> Self {
        Self {
            config,
            state: RwLock::new(IndexState {
                backend,
                centroids: RTree::new(),
                areas: RTree::new(),
                closed: false,
            }),
            #[cfg(feature = "snapshot")]
            snapshot: None,
        }
    }

    #[cfg(feature = "snapshot")]
    pub(crate) fn attach_snapshot(&mut self, snapshot: SnapshotFile) {
        self.snapshot = Some(Mutex::new(snapshot));
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Name of `entity` in the configured language, with the usual fallbacks.
    pub fn display_name<'a>(&self, entity: &'a SpatialEntity) -> Option<&'a str> {
        entity.localized_name(&self.config.language)
    }

    /// Insert or replace an entity by key.
    pub fn insert(&self, entity: impl Into<Arc<SpatialEntity>>) -> Result<Arc<SpatialEntity>> {
        let entity = entity.into();
        self.check_entity(&entity)?;

        {
            let mut state = self.state.write();
            state.ensure_open()?;
            state.put(Arc::clone(&entity))?;
        }
        self.record_mutations(1);

        Ok(entity)
    }

    /// Insert several entities. Every entity is validated before any is stored.
    pub fn insert_batch<I>(&self, entities: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<Arc<SpatialEntity>>,
    {
        let entities: Vec<Arc<SpatialEntity>> = entities.into_iter().map(Into::into).collect();
        for entity in &entities {
            self.check_entity(entity)?;
        }

        let count = entities.len();
        {
            let mut state = self.state.write();
            state.ensure_open()?;
            for entity in entities {
                state.put(entity)?;
            }
        }
        self.record_mutations(count);

        Ok(count)
    }

    pub fn get(&self, key: &str) -> Result<Option<Arc<SpatialEntity>>> {
        let state = self.state.read();
        state.ensure_open()?;
        state.backend.get(key)
    }

    pub fn contains_key(&self, key: &str) -> Result<bool> {
        let state = self.state.read();
        state.ensure_open()?;
        state.backend.contains_key(key)
    }

    pub fn remove(&self, key: &str) -> Result<Option<Arc<SpatialEntity>>> {
        let removed = {
            let mut state = self.state.write();
            state.ensure_open()?;
            let removed = state.backend.delete(key)?;
            if let Some(entity) = &removed {
                state.unlink(entity);
            }
            removed
        };
        if removed.is_some() {
            self.record_mutations(1);
        }
        Ok(removed)
    }

    /// Record that the user chose `key` at `at`. Returns `false` if the key is
    /// unknown.
    ///
    /// The stored entity is replaced by an updated copy; references handed out
    /// earlier keep their previous value.
    pub fn mark_selected(&self, key: &str, at: SystemTime) -> Result<bool> {
        let updated = {
            let mut state = self.state.write();
            state.ensure_open()?;
            match state.backend.get(key)? {
                Some(entity) => {
                    let mut entity = SpatialEntity::clone(&entity);
                    entity.set_last_selected(Some(at));
                    state.backend.put(Arc::new(entity))?;
                    true
                }
                None => false,
            }
        };
        if updated {
            self.record_mutations(1);
        }
        Ok(updated)
    }

    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let state = self.state.read();
        state.ensure_open()?;
        state.backend.keys_with_prefix(prefix)
    }

    /// The `k` entities whose centroids are closest to `center`, nearest first,
    /// with their haversine distance in meters.
    pub fn nearest(&self, center: &Point, k: Option<usize>) -> Result<Vec<(Arc<SpatialEntity>, f64)>> {
        validate_geographic_point(center)?;
        let k = k.unwrap_or(self.config.default_query_limit);
        validate_limit(k)?;

        let state = self.state.read();
        state.ensure_open()?;

        let query = IndexedCentroid::query(center);
        let mut results: Vec<(Arc<SpatialEntity>, f64)> = state
            .centroids
            .nearest_neighbor_iter(&query)
            .filter_map(|indexed| {
                let entity = state.entity(&indexed.key)?;
                Some((entity, center.haversine_distance(&indexed.position())))
            })
            .take(k)
            .collect();

        // Chord and haversine order agree up to rounding.
        results.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(results)
    }

    /// Entities whose centroid lies within `radius` meters of `center`, nearest
    /// first.
    pub fn within_radius(
        &self,
        center: &Point,
        radius: f64,
        limit: Option<usize>,
    ) -> Result<Vec<(Arc<SpatialEntity>, f64)>> {
        validate_geographic_point(center)?;
        validate_radius(radius)?;
        let limit = limit.unwrap_or(self.config.default_query_limit);
        validate_limit(limit)?;

        let state = self.state.read();
        state.ensure_open()?;

        // Slack on the chord bound; the haversine check below is exact.
        let chord = chord_length(radius);
        let max_squared = chord * chord * (1.0 + 1e-9);
        let mut results: Vec<(Arc<SpatialEntity>, f64)> = state
            .centroids
            .locate_within_distance(IndexedCentroid::query(center), max_squared)
            .filter_map(|indexed| {
                let distance = center.haversine_distance(&indexed.position());
                if !distance.is_finite() || distance > radius {
                    return None;
                }
                Some((state.entity(&indexed.key)?, distance))
            })
            .collect();

        results.sort_by(|a, b| a.1.total_cmp(&b.1));
        results.truncate(limit);
        Ok(results)
    }

    /// Area entities whose geometry contains `point`, ordered by key.
    pub fn containing(&self, point: &Point) -> Result<Vec<Arc<SpatialEntity>>> {
        validate_geographic_point(point)?;

        let state = self.state.read();
        state.ensure_open()?;

        let envelope = AABB::from_point([point.x(), point.y()]);
        let mut results: Vec<Arc<SpatialEntity>> = state
            .areas
            .locate_in_envelope_intersecting(&envelope)
            .filter_map(|indexed| state.entity(&indexed.key))
            .filter(|entity| entity.contains(point))
            .collect();

        results.sort_by(|a, b| a.key().cmp(b.key()));
        Ok(results)
    }

    pub fn len(&self) -> Result<usize> {
        let state = self.state.read();
        state.ensure_open()?;
        state.backend.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        let state = self.state.read();
        state.ensure_open()?;
        state.backend.is_empty()
    }

    pub fn stats(&self) -> Result<StorageStats> {
        let state = self.state.read();
        state.ensure_open()?;
        state.backend.stats()
    }

    /// Write a snapshot now. A no-op without an attached snapshot file.
    #[cfg(feature = "snapshot")]
    pub fn snapshot(&self) -> Result<()> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };
        let entities: Vec<Arc<SpatialEntity>> = {
            let state = self.state.read();
            state.ensure_open()?;
            state.backend.iter()?.collect()
        };
        snapshot.lock().save(entities.iter().map(|e| e.as_ref()))
    }

    /// Close the index. Later operations return [`PlacemarkError::IndexClosed`].
    pub fn close(&self) -> Result<()> {
        #[cfg(feature = "snapshot")]
        if self.snapshot.is_some() && !self.state.read().closed {
            self.snapshot()?;
        }

        let mut state = self.state.write();
        if state.closed {
            return Ok(());
        }
        state.closed = true;
        state.centroids = RTree::new();
        state.areas = RTree::new();
        state.backend.close()
    }

    fn check_entity(&self, entity: &SpatialEntity) -> Result<()> {
        if entity.key().is_empty() {
            return Err(PlacemarkError::MissingKey);
        }
        if let Err(e) = index_entries(entity) {
            log::warn!("Rejecting entity {}: {}", entity.key(), e);
            return Err(e);
        }
        if self.config.validate_coordinates {
            let checked = validate_geographic_point(&entity.centroid()).and_then(|_| {
                match entity.geometry().filter(|geometry| geometry.is_area()) {
                    Some(geometry) => validate_geometry(geometry),
                    None => Ok(()),
                }
            });
            if let Err(e) = checked {
                log::warn!("Rejecting entity {}: {}", entity.key(), e);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Counts mutations toward the auto-snapshot interval. A failed automatic
    /// snapshot is logged; the mutation that triggered it stays applied and
    /// the next mutation retries.
    #[cfg(feature = "snapshot")]
    fn record_mutations(&self, count: usize) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let due = {
            let mut snapshot = snapshot.lock();
            for _ in 0..count {
                snapshot.record_operation();
            }
            snapshot.should_snapshot()
        };
        if due && let Err(e) = self.snapshot() {
            log::warn!("Automatic snapshot failed: {}", e);
        }
    }

    #[cfg(not(feature = "snapshot"))]
    fn record_mutations(&self, _count: usize) {}
}

impl EntranceResolver for PlaceIndex {
    fn resolve(&self, key: &str) -> Option<Arc<SpatialEntity>> {
        let state = self.state.read();
        if state.closed {
            return None;
        }
        state.entity(key)
    }
}

impl Drop for PlaceIndex {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Failed to close place index cleanly: {}", e);
        }
    }
}

/// Tree entries for `entity`. Fails for a centroid or area bound that is not
/// finite, since those cannot be placed in an R*-tree.
fn index_entries(entity: &SpatialEntity) -> Result<(IndexedCentroid, Option<IndexedArea>)> {
    let centroid = IndexedCentroid::of(entity).ok_or_else(|| {
        let centroid = entity.centroid();
        PlacemarkError::InvalidInput(format!(
            "Centroid must be finite, got: ({}, {})",
            centroid.x(),
            centroid.y()
        ))
    })?;
    let area = IndexedArea::of(entity);
    let is_area = entity.geometry().is_some_and(|geometry| geometry.is_area());
    if is_area && area.is_none() {
        return Err(PlacemarkError::InvalidInput("Area bounds must be finite".to_string()));
    }
    Ok((centroid, area))
}

/// Unit-sphere chord spanning a great-circle arc of `meters`.
fn chord_length(meters: f64) -> f64 {
    let angle = (meters / EARTH_MEAN_RADIUS_METERS).min(std::f64::consts::PI);
    2.0 * (angle / 2.0).sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::MapFeature;
    use placemark_types::geometry::Geometry;

    fn place(key: &str, lon: f64, lat: f64) -> SpatialEntity {
        SpatialEntity::from_location_parameters(Some(key.to_string()), key, Point::new(lon, lat), None)
    }

    fn block(key: &str, min: (f64, f64), max: (f64, f64)) -> SpatialEntity {
        let geometry = Geometry::from_rings(
            &[(min.0, min.1), (max.0, min.1), (max.0, max.1), (min.0, max.1)],
            vec![],
        )
        .unwrap();
        SpatialEntity::from_feature(&MapFeature::new(geometry).with_id(key), None).unwrap()
    }

    #[test]
    fn test_insert_get_remove() {
        let index = PlaceIndex::memory();
        index.insert(place("a", 13.40, 52.52)).unwrap();

        assert_eq!(index.len().unwrap(), 1);
        assert_eq!(index.get("a").unwrap().unwrap().name(), "a");

        let removed = index.remove("a").unwrap();
        assert!(removed.is_some());
        assert!(index.get("a").unwrap().is_none());
        assert!(index.is_empty().unwrap());
        assert!(index.within_radius(&Point::new(13.40, 52.52), 1000.0, None).unwrap().is_empty());
    }

    #[test]
    fn test_replace_moves_entity() {
        let index = PlaceIndex::memory();
        index.insert(place("a", 13.40, 52.52)).unwrap();
        index.insert(place("a", 2.35, 48.85)).unwrap();

        assert_eq!(index.len().unwrap(), 1);
        let berlin = index.within_radius(&Point::new(13.40, 52.52), 1000.0, None).unwrap();
        assert!(berlin.is_empty());
        let paris = index.within_radius(&Point::new(2.35, 48.85), 1000.0, None).unwrap();
        assert_eq!(paris.len(), 1);
    }

    #[test]
    fn test_rejects_invalid_coordinates() {
        let index = PlaceIndex::memory();
        let result = index.insert(place("bad", 200.0, 52.0));
        assert!(matches!(result, Err(PlacemarkError::InvalidInput(_))));

        let lenient = PlaceIndex::with_config(Config::default().with_coordinate_validation(false));
        assert!(lenient.insert(place("bad", 200.0, 52.0)).is_ok());
    }

    #[test]
    fn test_batch_is_validated_up_front() {
        let index = PlaceIndex::memory();
        let result = index.insert_batch(vec![place("a", 0.0, 0.0), place("b", 0.0, 95.0)]);
        assert!(result.is_err());
        assert!(index.is_empty().unwrap());

        let count = index.insert_batch(vec![place("a", 0.0, 0.0), place("b", 0.0, 0.5)]).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_within_radius_orders_by_distance() {
        let index = PlaceIndex::memory();
        index
            .insert_batch(vec![
                place("far", 13.4100, 52.5200),
                place("near", 13.4051, 52.5200),
                place("mid", 13.4070, 52.5200),
                place("out", 13.5000, 52.5200),
            ])
            .unwrap();

        let center = Point::new(13.4050, 52.5200);
        let results = index.within_radius(&center, 1000.0, None).unwrap();
        let keys: Vec<&str> = results.iter().map(|(e, _)| e.key()).collect();
        assert_eq!(keys, vec!["near", "mid", "far"]);
        assert!(results.windows(2).all(|w| w[0].1 <= w[1].1));

        let limited = index.within_radius(&center, 1000.0, Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].0.key(), "near");
    }

    #[test]
    fn test_nearest() {
        let index = PlaceIndex::memory();
        index
            .insert_batch(vec![place("a", 0.0, 0.0), place("b", 1.0, 0.0), place("c", 5.0, 0.0)])
            .unwrap();

        let results = index.nearest(&Point::new(0.9, 0.0), Some(2)).unwrap();
        let keys: Vec<&str> = results.iter().map(|(e, _)| e.key()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_nearest_at_high_latitude() {
        let index = PlaceIndex::memory();
        // At 60°N a degree of longitude is half a degree of latitude.
        index
            .insert_batch(vec![place("east", 10.9, 60.0), place("north", 10.0, 60.6)])
            .unwrap();

        let center = Point::new(10.0, 60.0);
        let results = index.nearest(&center, Some(1)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.key(), "east");
        assert!((results[0].1 - 50_037.0).abs() < 100.0);

        let both = index.nearest(&center, Some(2)).unwrap();
        let keys: Vec<&str> = both.iter().map(|(e, _)| e.key()).collect();
        assert_eq!(keys, vec!["east", "north"]);
    }

    #[test]
    fn test_queries_across_antimeridian() {
        let index = PlaceIndex::memory();
        index
            .insert_batch(vec![place("date-line", 179.9995, 0.0), place("far", 170.0, 0.0)])
            .unwrap();

        let center = Point::new(-179.9995, 0.0);
        let hits = index.within_radius(&center, 1000.0, None).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0.key(), "date-line");
        assert!((hits[0].1 - 111.2).abs() < 1.0);

        let nearest = index.nearest(&center, Some(1)).unwrap();
        assert_eq!(nearest[0].0.key(), "date-line");
    }

    #[test]
    fn test_non_finite_centroid_rejected_without_validation() {
        let lenient = PlaceIndex::with_config(Config::default().with_coordinate_validation(false));

        let mut accepted = 0;
        for i in 0..50 {
            let lon = if i % 3 == 0 { f64::NAN } else { i as f64 * 0.01 };
            match lenient.insert(place(&format!("p{}", i), lon, 1.0)) {
                Ok(_) => accepted += 1,
                Err(e) => assert!(matches!(e, PlacemarkError::InvalidInput(_))),
            }
        }

        assert_eq!(accepted, 33);
        assert_eq!(lenient.len().unwrap(), 33);
        assert!(lenient.get("p0").unwrap().is_none());
        let hits = lenient.nearest(&Point::new(0.0, 1.0), Some(100)).unwrap();
        assert_eq!(hits.len(), 33);

        let result = lenient.insert_batch(vec![place("ok", 0.0, 0.0), place("nan", 0.0, f64::NAN)]);
        assert!(matches!(result, Err(PlacemarkError::InvalidInput(_))));
        assert!(lenient.get("ok").unwrap().is_none());
    }

    #[test]
    fn test_query_argument_validation() {
        let index = PlaceIndex::memory();
        let center = Point::new(0.0, 0.0);
        assert!(index.within_radius(&center, -1.0, None).is_err());
        assert!(index.within_radius(&center, 10.0, Some(0)).is_err());
        assert!(index.nearest(&Point::new(0.0, 91.0), None).is_err());
    }

    #[test]
    fn test_containing() {
        let index = PlaceIndex::memory();
        index
            .insert_batch(vec![
                block("outer", (0.0, 0.0), (10.0, 10.0)),
                block("inner", (2.0, 2.0), (4.0, 4.0)),
                block("elsewhere", (20.0, 20.0), (30.0, 30.0)),
                place("poi", 3.0, 3.0),
            ])
            .unwrap();

        let hits = index.containing(&Point::new(3.0, 3.0)).unwrap();
        let keys: Vec<&str> = hits.iter().map(|e| e.key()).collect();
        assert_eq!(keys, vec!["inner", "outer"]);

        let hits = index.containing(&Point::new(8.0, 8.0)).unwrap();
        assert_eq!(hits.len(), 1);

        // Boundary points are not contained.
        assert!(index.containing(&Point::new(10.0, 5.0)).unwrap().is_empty());

        index.remove("outer").unwrap();
        assert!(index.containing(&Point::new(8.0, 8.0)).unwrap().is_empty());
    }

    #[test]
    fn test_mark_selected() {
        let index = PlaceIndex::memory();
        let before = index.insert(place("a", 0.0, 0.0)).unwrap();
        let at = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000);

        assert!(index.mark_selected("a", at).unwrap());
        assert!(!index.mark_selected("missing", at).unwrap());

        assert_eq!(index.get("a").unwrap().unwrap().last_selected(), Some(at));
        assert_eq!(before.last_selected(), None);
        assert_eq!(index.within_radius(&Point::new(0.0, 0.0), 10.0, None).unwrap().len(), 1);
    }

    #[test]
    fn test_resolves_entrances() {
        let index = PlaceIndex::memory();
        index
            .insert_batch(vec![place("door-1", 0.0, 0.0), place("door-2", 0.001, 0.0)])
            .unwrap();

        let mut building = block("building", (0.0, 0.0), (0.01, 0.01));
        building
            .set_entrance_ids(&["door-2".to_string(), "gone".to_string(), "door-1".to_string()])
            .unwrap();

        let entrances = building.entrances(&index).unwrap();
        let keys: Vec<&str> = entrances.iter().map(|e| e.key()).collect();
        assert_eq!(keys, vec!["door-2", "door-1"]);
    }

    #[test]
    fn test_closed_index() {
        let index = PlaceIndex::memory();
        index.insert(place("a", 0.0, 0.0)).unwrap();
        index.close().unwrap();

        assert!(matches!(index.get("a"), Err(PlacemarkError::IndexClosed)));
        assert!(matches!(index.insert(place("b", 0.0, 0.0)), Err(PlacemarkError::IndexClosed)));
        assert!(matches!(index.len(), Err(PlacemarkError::IndexClosed)));
        assert!(index.resolve("a").is_none());
        assert!(index.close().is_ok());
    }

    #[test]
    fn test_with_backend_indexes_existing_entities() {
        let mut backend = MemoryBackend::new();
        backend.put(Arc::new(place("a", 1.0, 1.0))).unwrap();
        backend.put(Arc::new(block("b", (0.0, 0.0), (2.0, 2.0)))).unwrap();

        let index = PlaceIndex::with_backend(Config::default(), Box::new(backend)).unwrap();
        assert_eq!(index.nearest(&Point::new(1.0, 1.0), Some(1)).unwrap()[0].0.key(), "a");
        assert_eq!(index.containing(&Point::new(1.5, 1.5)).unwrap()[0].key(), "b");
    }

    #[test]
    fn test_index_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PlaceIndex>();
    }
}
