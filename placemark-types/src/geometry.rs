//! Point and area geometry backing an entity's spatial footprint.
//!
//! A [`Geometry`] is either a single [`Point`] or an [`Area`]: one or more
//! polygons, each an exterior ring with optional hole rings. Values are
//! immutable once built; centroid and containment are pure functions of them.

use crate::geo::Point;
use geo::{Area as _, BoundingRect, Centroid, Contains, Coord, LineString, MultiPolygon, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// Returned when an area is built from polygons that carry no vertices at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyAreaError;

impl std::fmt::Display for EmptyAreaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "area geometry must contain at least one vertex")
    }
}

impl std::error::Error for EmptyAreaError {}

/// An area-bearing shape: polygons with holes, modeled as a multipolygon.
///
/// Always holds at least one vertex, so the centroid is always defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MultiPolygon<f64>", into = "MultiPolygon<f64>")]
pub struct Area {
    polygons: MultiPolygon<f64>,
}

impl Area {
    /// Wrap a multipolygon, refusing one without any vertex.
    pub fn new(polygons: MultiPolygon<f64>) -> Option<Self> {
        let has_vertex = polygons.0.iter().any(|polygon| {
            !polygon.exterior().0.is_empty()
                || polygon.interiors().iter().any(|ring| !ring.0.is_empty())
        });
        has_vertex.then_some(Self { polygons })
    }

    pub fn polygons(&self) -> &MultiPolygon<f64> {
        &self.polygons
    }

    pub fn into_inner(self) -> MultiPolygon<f64> {
        self.polygons
    }

    /// Every ring, exterior first then holes, polygon by polygon.
    pub fn rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.polygons
            .0
            .iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
    }

    /// Area-weighted centroid of the constituent polygons.
    ///
    /// Zero-area polygons are skipped. When all of them are degenerate the
    /// plain mean of the distinct ring vertices is used instead.
    pub fn centroid(&self) -> Point {
        let mut weighted_x = 0.0;
        let mut weighted_y = 0.0;
        let mut total_area = 0.0;

        for polygon in &self.polygons.0 {
            let area = polygon.unsigned_area();
            if !area.is_finite() || area <= 0.0 {
                continue;
            }
            if let Some(center) = polygon.centroid() {
                weighted_x += center.x() * area;
                weighted_y += center.y() * area;
                total_area += area;
            }
        }

        if total_area > 0.0 {
            Point::new(weighted_x / total_area, weighted_y / total_area)
        } else {
            self.vertex_mean()
        }
    }

    fn vertex_mean(&self) -> Point {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut count = 0usize;

        for ring in self.rings() {
            let coords = &ring.0;
            // The closing vertex repeats the first one.
            let distinct = if coords.len() > 1 && ring.is_closed() {
                &coords[..coords.len() - 1]
            } else {
                &coords[..]
            };
            for coord in distinct {
                sum_x += coord.x;
                sum_y += coord.y;
                count += 1;
            }
        }

        // `Area::new` guarantees at least one vertex.
        let count = count.max(1) as f64;
        Point::new(sum_x / count, sum_y / count)
    }

    /// Interior containment. Points on any ring edge are outside, and holes
    /// subtract from their polygon.
    pub fn contains_point(&self, point: &Point) -> bool {
        self.polygons.contains(point.inner())
    }
}

impl TryFrom<MultiPolygon<f64>> for Area {
    type Error = EmptyAreaError;

    fn try_from(polygons: MultiPolygon<f64>) -> Result<Self, Self::Error> {
        Self::new(polygons).ok_or(EmptyAreaError)
    }
}

impl From<Area> for MultiPolygon<f64> {
    fn from(area: Area) -> Self {
        area.polygons
    }
}

/// The spatial footprint of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Point),
    Area(Area),
}

/// Borrowed view of the coordinate data behind a [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinates<'a> {
    Point(Point),
    Area(&'a MultiPolygon<f64>),
}

impl Geometry {
    /// Build an area from an exterior ring and hole rings given as `(lon, lat)`
    /// pairs. Rings are closed automatically.
    ///
    /// Returns `None` if no vertex is supplied.
    pub fn from_rings(exterior: &[(f64, f64)], interiors: Vec<Vec<(f64, f64)>>) -> Option<Self> {
        let exterior = ring_from_pairs(exterior);
        let interiors = interiors
            .iter()
            .map(|ring| ring_from_pairs(ring))
            .collect();
        Self::from_polygons(vec![Polygon::new(exterior, interiors)])
    }

    /// Build an area from one or more polygons.
    pub fn from_polygons(polygons: Vec<Polygon<f64>>) -> Option<Self> {
        Area::new(MultiPolygon::new(polygons)).map(Geometry::Area)
    }

    pub fn is_point(&self) -> bool {
        matches!(self, Geometry::Point(_))
    }

    pub fn is_area(&self) -> bool {
        matches!(self, Geometry::Area(_))
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Geometry::Point(point) => Some(point),
            Geometry::Area(_) => None,
        }
    }

    pub fn as_area(&self) -> Option<&Area> {
        match self {
            Geometry::Point(_) => None,
            Geometry::Area(area) => Some(area),
        }
    }

    /// The representative single location of this geometry.
    pub fn centroid(&self) -> Point {
        match self {
            Geometry::Point(point) => *point,
            Geometry::Area(area) => area.centroid(),
        }
    }

    /// Whether `point` lies strictly inside the area. Always `false` for a
    /// point geometry, which has no area.
    pub fn within_area(&self, point: &Point) -> bool {
        match self {
            Geometry::Point(_) => false,
            Geometry::Area(area) => area.contains_point(point),
        }
    }

    pub fn coordinates(&self) -> Coordinates<'_> {
        match self {
            Geometry::Point(point) => Coordinates::Point(*point),
            Geometry::Area(area) => Coordinates::Area(area.polygons()),
        }
    }

    /// Axis-aligned bounds; degenerate for a point.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            Geometry::Point(point) => {
                let coord = Coord {
                    x: point.x(),
                    y: point.y(),
                };
                Some(Rect::new(coord, coord))
            }
            Geometry::Area(area) => area.polygons().bounding_rect(),
        }
    }
}

impl From<Point> for Geometry {
    fn from(point: Point) -> Self {
        Geometry::Point(point)
    }
}

impl From<Area> for Geometry {
    fn from(area: Area) -> Self {
        Geometry::Area(area)
    }
}

fn ring_from_pairs(pairs: &[(f64, f64)]) -> LineString<f64> {
    LineString::from(
        pairs
            .iter()
            .map(|&(x, y)| Coord { x, y })
            .collect::<Vec<_>>(),
    )
}
