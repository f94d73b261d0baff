//! Payload codecs and coordinate validation.

pub mod geojson;
pub mod validation;
