//! Validation for geographic coordinates and query parameters.

use crate::error::{PlacemarkError, Result};
use placemark_types::geo::Point;
use placemark_types::geometry::Geometry;

/// Validates a point has valid longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use placemark::compute::validation::validate_geographic_point;
/// use placemark::Point;
///
/// assert!(validate_geographic_point(&Point::new(-74.0060, 40.7128)).is_ok());
/// assert!(validate_geographic_point(&Point::new(200.0, 40.0)).is_err());
/// assert!(validate_geographic_point(&Point::new(-74.0, 95.0)).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    if !x.is_finite() {
        return Err(PlacemarkError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(PlacemarkError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            y
        )));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(PlacemarkError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(PlacemarkError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}

/// Validates every vertex of a geometry.
pub fn validate_geometry(geometry: &Geometry) -> Result<()> {
    match geometry {
        Geometry::Point(point) => validate_geographic_point(point),
        Geometry::Area(area) => {
            for (ring_idx, ring) in area.rings().enumerate() {
                for (idx, coord) in ring.coords().enumerate() {
                    validate_geographic_point(&Point::from(*coord)).map_err(|e| {
                        PlacemarkError::InvalidInput(format!(
                            "Ring {} point at index {}: {}",
                            ring_idx, idx, e
                        ))
                    })?;
                }
            }
            Ok(())
        }
    }
}

/// Validates a radius in meters for proximity queries.
///
/// # Examples
///
/// ```
/// use placemark::compute::validation::validate_radius;
///
/// assert!(validate_radius(1000.0).is_ok());
/// assert!(validate_radius(0.0).is_err());
/// assert!(validate_radius(f64::NAN).is_err());
/// ```
pub fn validate_radius(radius: f64) -> Result<()> {
    if !radius.is_finite() {
        return Err(PlacemarkError::InvalidInput(format!(
            "Radius must be finite, got: {}",
            radius
        )));
    }
    if radius <= 0.0 {
        return Err(PlacemarkError::InvalidInput(format!(
            "Radius must be positive, got: {}",
            radius
        )));
    }
    const EARTH_CIRCUMFERENCE: f64 = 40_075_000.0; // meters
    if radius > EARTH_CIRCUMFERENCE {
        return Err(PlacemarkError::InvalidInput(format!(
            "Radius {} exceeds Earth's circumference ({} meters)",
            radius, EARTH_CIRCUMFERENCE
        )));
    }
    Ok(())
}

pub fn validate_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(PlacemarkError::InvalidInput(
            "Result limit must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_geographic_point() {
        assert!(validate_geographic_point(&Point::new(0.0, 90.0)).is_ok());
        assert!(validate_geographic_point(&Point::new(-180.0, -90.0)).is_ok());
        assert!(validate_geographic_point(&Point::new(180.1, 0.0)).is_err());
        assert!(validate_geographic_point(&Point::new(0.0, -90.1)).is_err());
        assert!(validate_geographic_point(&Point::new(f64::NAN, 0.0)).is_err());
        assert!(validate_geographic_point(&Point::new(0.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn test_validate_geometry() {
        let valid = Geometry::from_rings(&[(10.0, 50.0), (11.0, 50.0), (11.0, 51.0)], vec![])
            .unwrap();
        assert!(validate_geometry(&valid).is_ok());

        let invalid = Geometry::from_rings(
            &[(10.0, 50.0), (11.0, 50.0), (11.0, 51.0)],
            vec![vec![(10.5, 50.2), (300.0, 50.3), (10.6, 50.4)]],
        )
        .unwrap();
        let err = validate_geometry(&invalid).unwrap_err();
        assert!(err.to_string().contains("Ring 1 point at index 1"));
    }

    #[test]
    fn test_validate_radius() {
        assert!(validate_radius(0.1).is_ok());
        assert!(validate_radius(1_000_000.0).is_ok());
        assert!(validate_radius(-5.0).is_err());
        assert!(validate_radius(f64::INFINITY).is_err());
        assert!(validate_radius(50_000_000.0).is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit(1).is_ok());
        assert!(validate_limit(0).is_err());
    }
}
