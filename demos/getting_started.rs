//! Getting Started
//!
//! Builds a small place index from GeoJSON features, resolves a building's
//! entrances and runs proximity and containment queries.

use placemark::{IndexBuilder, MapFeature, Point, SpatialEntity};
use std::error::Error;

const STATION: &str = r#"{
    "type": "Feature",
    "id": "way/23",
    "geometry": {
        "type": "Polygon",
        "coordinates": [[[13.3680, 52.5245], [13.3710, 52.5245], [13.3710, 52.5260], [13.3680, 52.5260], [13.3680, 52.5245]]]
    },
    "properties": {"building": "train_station", "name": "Central Station", "name:de": "Hauptbahnhof"}
}"#;

const ENTRANCES: [&str; 2] = [
    r#"{"type": "Feature", "id": "node/1", "geometry": {"type": "Point", "coordinates": [13.3680, 52.5250]}, "properties": {"entrance": "main", "name": "West entrance"}}"#,
    r#"{"type": "Feature", "id": "node/2", "geometry": {"type": "Point", "coordinates": [13.3710, 52.5255]}, "properties": {"entrance": "yes", "name": "East entrance"}}"#,
];

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("=== Placemark - Getting Started ===\n");

    let index = IndexBuilder::new().build()?;

    for json in ENTRANCES {
        let entity = SpatialEntity::from_feature(&MapFeature::from_geojson(json)?, None)?;
        index.insert(entity)?;
    }

    let mut station = SpatialEntity::from_feature(&MapFeature::from_geojson(STATION)?, None)?;
    station.set_entrance_ids(&["node/1".to_string(), "node/2".to_string()])?;
    let station = index.insert(station)?;

    println!("Indexed {} places", index.len()?);
    println!(
        "   {} ({}) centroid: ({:.5}, {:.5})",
        station.name(),
        station.localized_name("de").unwrap_or_default(),
        station.centroid().x(),
        station.centroid().y()
    );

    println!("\nEntrances:");
    for entrance in station.entrances(&index).unwrap_or_default() {
        println!("   {} [{}]", entrance.name(), entrance.amenity());
    }

    let here = Point::new(13.3695, 52.5252);
    println!("\nPlaces containing ({:.4}, {:.4}):", here.x(), here.y());
    for place in index.containing(&here)? {
        println!("   {}", place.name());
    }

    println!("\nWithin 200m:");
    for (place, distance) in index.within_radius(&here, 200.0, None)? {
        println!("   {:<16} {:>6.1} m", place.name(), distance);
    }

    index.close()?;
    Ok(())
}
