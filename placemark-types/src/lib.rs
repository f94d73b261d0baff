//! # placemark-types
//!
//! Core spatial and naming types for the Placemark point-of-interest model.
//!
//! - **Point**: a longitude/latitude wrapper around `geo::Point`
//! - **Geometry**: the `Point` / `Area` sum type with centroid and containment
//! - **LocalizedText**: a (language, text) pair used for multilingual names
//! - **SuperCategory**: the coarse classification of an entity
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use placemark_types::geo::Point;
//! use placemark_types::geometry::Geometry;
//!
//! let square = Geometry::from_rings(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)], vec![])
//!     .unwrap();
//! let center = square.centroid();
//! assert!((center.x() - 2.0).abs() < 1e-9 && (center.y() - 2.0).abs() < 1e-9);
//! assert!(square.within_area(&Point::new(1.0, 1.0)));
//! ```

pub mod category;
pub mod geo;
pub mod geometry;
pub mod localized;
