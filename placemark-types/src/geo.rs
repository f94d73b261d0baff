//! Wrapped point type from the `geo` crate.
//!
//! Coordinates follow the `geo` convention: `x` is longitude and `y` is latitude,
//! both in degrees.

use serde::{Deserialize, Serialize};

/// A geographic point with longitude/latitude coordinates.
///
/// # Examples
///
/// ```
/// use placemark_types::geo::Point;
///
/// let stop = Point::from_lat_lon(52.5200, 13.4050);
/// assert_eq!(stop.lon(), 13.4050);
/// assert_eq!(stop.lat(), 52.5200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    inner: geo::Point<f64>,
}

impl Point {
    /// Create a new point from x (longitude) and y (latitude) coordinates.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            inner: geo::Point::new(x, y),
        }
    }

    /// Create a point from a (latitude, longitude) pair, the order map data
    /// usually reports it in.
    #[inline]
    pub fn from_lat_lon(latitude: f64, longitude: f64) -> Self {
        Self::new(longitude, latitude)
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.inner.x()
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.inner.y()
    }

    /// Get the longitude (alias for x).
    #[inline]
    pub fn lon(&self) -> f64 {
        self.x()
    }

    /// Get the latitude (alias for y).
    #[inline]
    pub fn lat(&self) -> f64 {
        self.y()
    }

    /// True when both coordinates are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite()
    }

    /// Access the inner `geo::Point`.
    #[inline]
    pub fn inner(&self) -> &geo::Point<f64> {
        &self.inner
    }

    /// Convert into the inner `geo::Point`.
    #[inline]
    pub fn into_inner(self) -> geo::Point<f64> {
        self.inner
    }

    /// Calculate haversine distance to another point in meters.
    ///
    /// # Examples
    ///
    /// ```
    /// use placemark_types::geo::Point;
    ///
    /// let nyc = Point::new(-74.0060, 40.7128);
    /// let la = Point::new(-118.2437, 34.0522);
    /// assert!(nyc.haversine_distance(&la) > 3_900_000.0);
    /// ```
    #[inline]
    pub fn haversine_distance(&self, other: &Point) -> f64 {
        use geo::Distance;
        geo::Haversine.distance(self.inner, other.inner)
    }
}

impl From<geo::Point<f64>> for Point {
    fn from(point: geo::Point<f64>) -> Self {
        Self { inner: point }
    }
}

impl From<geo::Coord<f64>> for Point {
    fn from(coord: geo::Coord<f64>) -> Self {
        Self::new(coord.x, coord.y)
    }
}

impl From<Point> for geo::Point<f64> {
    fn from(point: Point) -> Self {
        point.inner
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for (f64, f64) {
    fn from(point: Point) -> Self {
        (point.x(), point.y())
    }
}
