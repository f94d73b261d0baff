//! Point-of-interest entities with multilingual names, lazily decoded geometry,
//! entrance resolution and point-in-area containment.
//!
//! ```rust
//! use placemark::{Geometry, MapFeature, PlaceIndex, Point, SpatialEntity};
//!
//! let index = PlaceIndex::memory();
//! index.insert(SpatialEntity::from_location_parameters(
//!     Some("door".to_string()),
//!     "Main entrance",
//!     Point::new(13.4050, 52.5200),
//!     None,
//! ))?;
//!
//! let footprint = Geometry::from_rings(
//!     &[(13.4049, 52.5199), (13.4052, 52.5199), (13.4052, 52.5202), (13.4049, 52.5202)],
//!     vec![],
//! )
//! .unwrap();
//! let mut building =
//!     SpatialEntity::from_feature(&MapFeature::new(footprint).with_id("building"), None)?;
//! building.set_entrance_ids(&["door".to_string()])?;
//!
//! assert!(building.contains(&Point::new(13.4051, 52.5201)));
//! assert_eq!(building.entrances(&index).unwrap()[0].name(), "Main entrance");
//! # Ok::<(), placemark::PlacemarkError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod entity;
pub mod error;
pub mod feature;
pub mod index;
pub mod resolver;
pub mod storage;

pub use builder::IndexBuilder;
pub use config::{Config, SnapshotSettings};
pub use entity::{PERSISTENCE_IGNORED_FIELDS, SpatialEntity};
pub use error::{PlacemarkError, Result};
pub use feature::MapFeature;
pub use index::PlaceIndex;
pub use resolver::{EntranceResolver, FnResolver, NoopResolver};

pub use placemark_types::category::SuperCategory;
pub use placemark_types::geo::Point;
pub use placemark_types::geometry::{Area, Coordinates, Geometry};
pub use placemark_types::localized::LocalizedText;

pub use storage::{MemoryBackend, StorageBackend, StorageOp, StorageStats};

#[cfg(feature = "snapshot")]
pub use storage::SnapshotFile;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{IndexBuilder, PlaceIndex, PlacemarkError, Result};

    pub use crate::{Area, Geometry, LocalizedText, Point, SuperCategory};

    pub use crate::{EntranceResolver, FnResolver, MapFeature, SpatialEntity};

    pub use crate::Config;

    pub use crate::{MemoryBackend, StorageBackend};

    pub use std::time::SystemTime;
}
