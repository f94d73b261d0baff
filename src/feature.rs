//! Decoded map features, the input to [`SpatialEntity::from_feature`].
//!
//! [`SpatialEntity::from_feature`]: crate::SpatialEntity::from_feature

use crate::compute::geojson::geometry_from_value;
use crate::error::{PlacemarkError, Result};
use geojson::feature::Id;
use placemark_types::category::SuperCategory;
use placemark_types::geometry::Geometry;
use placemark_types::localized::is_valid_language_code;
use std::collections::{BTreeMap, HashMap};

/// Property carrying the external link.
pub const WEBSITE_KEY: &str = "website";
pub const PHONE_KEY: &str = "phone";
pub const STREET_KEY: &str = "addr:street";
pub const HOUSE_NUMBER_KEY: &str = "addr:housenumber";

const NAME_KEY: &str = "name";
const LOCALIZED_NAME_PREFIX: &str = "name:";
const REFERENCE_KEY: &str = "ref";
const ID_PROPERTY_KEY: &str = "@id";
const PATH_HIGHWAYS: &[&str] = &[
    "footway",
    "path",
    "pedestrian",
    "cycleway",
    "steps",
    "bridleway",
];

/// A map feature as produced by an upstream decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFeature {
    /// External identifiers, most authoritative first.
    pub ids: Vec<String>,
    pub category: SuperCategory,
    /// The raw type value (e.g. `"cafe"` for `amenity=cafe`).
    pub value: String,
    pub name: Option<String>,
    /// Language code to name.
    pub localized_names: Option<BTreeMap<String, String>>,
    pub name_tag: Option<String>,
    pub reference: Option<String>,
    pub geometry: Geometry,
    pub is_roundabout: bool,
    pub properties: HashMap<String, String>,
}

impl MapFeature {
    /// A feature with the given geometry and no metadata.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            ids: Vec::new(),
            category: SuperCategory::Undefined,
            value: String::new(),
            name: None,
            localized_names: None,
            name_tag: None,
            reference: None,
            geometry,
            is_roundabout: false,
            properties: HashMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.ids.push(id.into());
        self
    }

    pub fn with_category(mut self, category: SuperCategory, value: impl Into<String>) -> Self {
        self.category = category;
        self.value = value.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_localized_name(mut self, language: impl Into<String>, name: impl Into<String>) -> Self {
        self.localized_names
            .get_or_insert_with(BTreeMap::new)
            .insert(language.into(), name.into());
        self
    }

    pub fn with_name_tag(mut self, tag: impl Into<String>) -> Self {
        self.name_tag = Some(tag.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_roundabout(mut self, is_roundabout: bool) -> Self {
        self.is_roundabout = is_roundabout;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// A property value, with empty strings treated as absent.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Decodes an OSM-tagged GeoJSON `Feature`.
    ///
    /// Identifiers come from the feature `id` and the `@id` property. Names come
    /// from `name` and `name:<language>`; the category is derived from the
    /// `highway`, `public_transport`, `entrance`, `building`, `shop` and
    /// `amenity` tags, in that order.
    ///
    /// # Examples
    ///
    /// ```
    /// use placemark::MapFeature;
    /// use placemark::SuperCategory;
    ///
    /// let json = r#"{
    ///     "type": "Feature",
    ///     "id": "node/42",
    ///     "geometry": {"type": "Point", "coordinates": [13.37, 52.51]},
    ///     "properties": {"highway": "bus_stop", "name": "Brandenburger Tor", "name:de": "Brandenburger Tor"}
    /// }"#;
    /// let feature = MapFeature::from_geojson(json)?;
    /// assert_eq!(feature.ids, vec!["node/42".to_string()]);
    /// assert_eq!(feature.category, SuperCategory::PublicTransport);
    /// assert_eq!(feature.name_tag.as_deref(), Some("bus_stop"));
    /// # Ok::<(), placemark::PlacemarkError>(())
    /// ```
    pub fn from_geojson(geojson: &str) -> Result<Self> {
        let feature: geojson::Feature = serde_json::from_str(geojson).map_err(|e| {
            PlacemarkError::InvalidInput(format!("Failed to parse GeoJSON feature: {}", e))
        })?;

        let geometry = feature.geometry.as_ref().ok_or_else(|| {
            PlacemarkError::InvalidInput("GeoJSON feature has no geometry".to_string())
        })?;
        let mut decoded = MapFeature::new(geometry_from_value(&geometry.value)?);

        for (key, value) in feature.properties.iter().flatten() {
            let value = match value {
                serde_json::Value::String(text) => text.clone(),
                serde_json::Value::Number(number) => number.to_string(),
                serde_json::Value::Bool(flag) => flag.to_string(),
                _ => continue,
            };
            decoded.properties.insert(key.clone(), value);
        }

        match &feature.id {
            Some(Id::String(id)) => decoded.ids.push(id.clone()),
            Some(Id::Number(id)) => decoded.ids.push(id.to_string()),
            None => {}
        }
        if let Some(id) = decoded.property(ID_PROPERTY_KEY).map(str::to_string)
            && !decoded.ids.contains(&id)
        {
            decoded.ids.push(id);
        }

        decoded.name = decoded.property(NAME_KEY).map(str::to_string);
        decoded.reference = decoded.property(REFERENCE_KEY).map(str::to_string);
        decoded.is_roundabout = decoded.property("junction") == Some("roundabout");

        let localized: BTreeMap<String, String> = decoded
            .properties
            .iter()
            .filter_map(|(key, value)| {
                let language = key.strip_prefix(LOCALIZED_NAME_PREFIX)?;
                (is_valid_language_code(language) && !value.is_empty())
                    .then(|| (language.to_ascii_lowercase(), value.clone()))
            })
            .collect();
        if !localized.is_empty() {
            decoded.localized_names = Some(localized);
        }

        decoded.classify();
        Ok(decoded)
    }

    fn classify(&mut self) {
        let tag = |key: &str| self.property(key).map(str::to_string);

        let (category, value, name_tag) = if let Some(highway) = tag("highway") {
            if highway == "bus_stop" {
                (SuperCategory::PublicTransport, highway.clone(), Some(highway))
            } else if PATH_HIGHWAYS.contains(&highway.as_str()) {
                (SuperCategory::Path, highway, Some("path".to_string()))
            } else {
                (SuperCategory::Road, highway, Some("road".to_string()))
            }
        } else if let Some(stop) = tag("public_transport") {
            (SuperCategory::PublicTransport, stop.clone(), Some(stop))
        } else if let Some(entrance) = tag("entrance") {
            (SuperCategory::Entrance, entrance, Some("entrance".to_string()))
        } else if let Some(building) = tag("building") {
            (SuperCategory::Building, building, Some("building".to_string()))
        } else if let Some(shop) = tag("shop") {
            (SuperCategory::Shop, shop, None)
        } else if let Some(amenity) = tag("amenity") {
            (SuperCategory::Amenity, amenity, None)
        } else {
            (SuperCategory::Undefined, String::new(), None)
        };

        self.category = category;
        self.value = value;
        self.name_tag = name_tag;
    }
}
