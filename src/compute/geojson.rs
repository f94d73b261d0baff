//! GeoJSON encoding of geometry payloads and entrance-id lists.
//!
//! Area geometries are stored as a GeoJSON `MultiPolygon` geometry object;
//! `Point` and `Polygon` objects are also accepted when decoding. Entrance ids
//! are stored as a JSON array of strings.

use crate::error::{PlacemarkError, Result};
use bytes::Bytes;
use geojson::Value;
use placemark_types::geo::Point;
use placemark_types::geometry::Geometry;

/// Converts a Point to GeoJSON string.
pub fn point_to_geojson(point: &Point) -> Result<String> {
    let geom = geojson::Geometry::new(Value::Point(vec![point.x(), point.y()]));

    serde_json::to_string(&geom)
        .map_err(|e| PlacemarkError::Serialization(format!("Failed to serialize point: {}", e)))
}

/// Converts a geometry to its GeoJSON geometry object.
pub fn geometry_to_value(geometry: &Geometry) -> Value {
    match geometry {
        Geometry::Point(point) => Value::Point(vec![point.x(), point.y()]),
        Geometry::Area(area) => Value::MultiPolygon(
            area.polygons()
                .0
                .iter()
                .map(|polygon| {
                    std::iter::once(polygon.exterior())
                        .chain(polygon.interiors())
                        .map(|ring| ring.coords().map(|c| vec![c.x, c.y]).collect::<Vec<_>>())
                        .collect::<Vec<_>>()
                })
                .collect(),
        ),
    }
}

/// Converts a geometry to a GeoJSON string.
pub fn geometry_to_geojson(geometry: &Geometry) -> Result<String> {
    let geom = geojson::Geometry::new(geometry_to_value(geometry));

    serde_json::to_string(&geom).map_err(|e| {
        PlacemarkError::Serialization(format!("Failed to serialize geometry: {}", e))
    })
}

/// Builds a geometry from a decoded GeoJSON value.
pub fn geometry_from_value(value: &Value) -> Result<Geometry> {
    match value {
        Value::Point(coords) => {
            let coord = coord_from_position(coords)?;
            Ok(Geometry::Point(Point::from(coord)))
        }
        Value::Polygon(rings) => {
            let polygon = polygon_from_rings(rings)?;
            Geometry::from_polygons(vec![polygon]).ok_or_else(empty_area)
        }
        Value::MultiPolygon(polygons) => {
            let polygons = polygons
                .iter()
                .map(|rings| polygon_from_rings(rings))
                .collect::<Result<Vec<_>>>()?;
            Geometry::from_polygons(polygons).ok_or_else(empty_area)
        }
        _ => Err(PlacemarkError::InvalidInput(
            "GeoJSON geometry is not a Point, Polygon or MultiPolygon".to_string(),
        )),
    }
}

/// Parses a GeoJSON geometry object string.
pub fn geometry_from_geojson(geojson: &str) -> Result<Geometry> {
    let geom: geojson::Geometry = serde_json::from_str(geojson)
        .map_err(|e| PlacemarkError::InvalidInput(format!("Failed to parse GeoJSON: {}", e)))?;
    geometry_from_value(&geom.value)
}

/// Encodes a geometry into its serialized payload.
pub fn encode_geometry(geometry: &Geometry) -> Result<Bytes> {
    geometry_to_geojson(geometry).map(Bytes::from)
}

/// Decodes a serialized geometry payload.
pub fn decode_geometry(payload: &[u8]) -> Result<Geometry> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| PlacemarkError::InvalidInput(format!("Payload is not UTF-8: {}", e)))?;
    geometry_from_geojson(text)
}

/// Decodes a geometry payload, treating malformed input as absent.
pub fn geometry_from_payload(payload: &[u8]) -> Option<Geometry> {
    match decode_geometry(payload) {
        Ok(geometry) => Some(geometry),
        Err(e) => {
            log::debug!("Discarding malformed geometry payload: {}", e);
            None
        }
    }
}

pub fn encode_entrance_ids(ids: &[String]) -> Result<Bytes> {
    serde_json::to_vec(ids).map(Bytes::from).map_err(|e| {
        PlacemarkError::Serialization(format!("Failed to serialize entrance ids: {}", e))
    })
}

/// Decodes an entrance-id payload, treating malformed input as absent.
pub fn decode_entrance_ids(payload: &[u8]) -> Option<Vec<String>> {
    match serde_json::from_slice::<Vec<String>>(payload) {
        Ok(ids) => Some(ids),
        Err(e) => {
            log::debug!("Discarding malformed entrance id payload: {}", e);
            None
        }
    }
}

fn coord_from_position(position: &[f64]) -> Result<geo::Coord<f64>> {
    if position.len() < 2 {
        return Err(PlacemarkError::InvalidInput(
            "Coordinate must have at least 2 values".to_string(),
        ));
    }
    Ok(geo::Coord {
        x: position[0],
        y: position[1],
    })
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Result<geo::Polygon<f64>> {
    let Some((exterior, interiors)) = rings.split_first() else {
        return Err(PlacemarkError::InvalidInput(
            "Polygon must have at least one ring".to_string(),
        ));
    };

    let ring = |positions: &Vec<Vec<f64>>| -> Result<geo::LineString<f64>> {
        positions
            .iter()
            .map(|position| coord_from_position(position))
            .collect::<Result<Vec<_>>>()
            .map(geo::LineString::from)
    };

    let exterior = ring(exterior)?;
    let interiors = interiors.iter().map(ring).collect::<Result<Vec<_>>>()?;
    Ok(geo::Polygon::new(exterior, interiors))
}

fn empty_area() -> PlacemarkError {
    PlacemarkError::InvalidInput("Area geometry has no vertices".to_string())
}
