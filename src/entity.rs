//! The spatial entity: a point of interest with names, metadata and geometry.
//!
//! Geometry and entrances are derived lazily from serialized payloads and cached
//! for the lifetime of the value. Both caches are `OnceCell`s, so an entity can be
//! shared across threads behind an `Arc` and every reader observes the same
//! cached result.

use crate::compute::geojson::{
    decode_entrance_ids, encode_entrance_ids, encode_geometry, geometry_from_payload,
};
use crate::compute::validation::validate_geographic_point;
use crate::error::{PlacemarkError, Result};
use crate::feature::{HOUSE_NUMBER_KEY, MapFeature, PHONE_KEY, STREET_KEY, WEBSITE_KEY};
use crate::resolver::EntranceResolver;
use bytes::Bytes;
use once_cell::sync::OnceCell;
use placemark_types::category::SuperCategory;
use placemark_types::geo::Point;
use placemark_types::geometry::{Coordinates, Geometry};
use placemark_types::localized::LocalizedText;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::SystemTime;

/// Derived fields that are recomputed after loading and never persisted.
pub const PERSISTENCE_IGNORED_FIELDS: &[&str] = &["geometry", "coordinates", "entrances"];

/// A point-of-interest-like record sourced from map data.
///
/// # Examples
///
/// ```
/// use placemark::{Point, SpatialEntity};
///
/// let entity = SpatialEntity::from_location_parameters(
///     Some("home".to_string()),
///     "Home",
///     Point::from_lat_lon(52.52, 13.405),
///     Some("1 Example Street".to_string()),
/// );
/// assert_eq!(entity.centroid(), entity.coordinate());
/// assert!(entity.geometry().unwrap().is_point());
/// assert!(!entity.contains(&Point::from_lat_lon(52.52, 13.405)));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpatialEntity {
    key: String,
    name: String,
    localized_names: Vec<LocalizedText>,
    name_tag: Option<String>,
    reference: Option<String>,
    category: SuperCategory,
    amenity: String,
    phone: Option<String>,
    street_address: Option<String>,
    street_name: Option<String>,
    is_roundabout: bool,
    coordinate: Point,
    centroid: Point,
    serialized_geometry: Option<Bytes>,
    serialized_entrance_ids: Option<Bytes>,
    external_link_url: Option<String>,
    external_data: Option<String>,
    last_selected: Option<SystemTime>,

    #[serde(skip)]
    geometry: OnceCell<Option<Geometry>>,
    #[serde(skip)]
    entrances: OnceCell<Option<Vec<Arc<SpatialEntity>>>>,
}

impl SpatialEntity {
    /// A point entity with a freshly generated key.
    pub fn new(name: impl Into<String>, coordinate: Point) -> Self {
        Self::from_location_parameters(None, name, coordinate, None)
    }

    /// Builds a minimal point entity from caller-supplied location data.
    ///
    /// An absent or empty key is replaced by a random UUID.
    pub fn from_location_parameters(
        key: Option<String>,
        name: impl Into<String>,
        coordinate: Point,
        address: Option<String>,
    ) -> Self {
        let key = key
            .filter(|key| !key.is_empty())
            .unwrap_or_else(generate_key);

        Self {
            key,
            name: name.into(),
            localized_names: Vec::new(),
            name_tag: None,
            reference: None,
            category: SuperCategory::Undefined,
            amenity: String::new(),
            phone: None,
            street_address: address,
            street_name: None,
            is_roundabout: false,
            coordinate,
            centroid: coordinate,
            serialized_geometry: None,
            serialized_entrance_ids: None,
            external_link_url: None,
            external_data: None,
            last_selected: None,
            geometry: OnceCell::new(),
            entrances: OnceCell::new(),
        }
    }

    /// Builds an entity from a decoded map feature.
    ///
    /// The key is `explicit_key` when given, otherwise the feature's first
    /// identifier. Fails with [`PlacemarkError::MissingKey`] when that key is
    /// missing or empty; every other gap in the feature degrades to a default.
    pub fn from_feature(feature: &MapFeature, explicit_key: Option<&str>) -> Result<Self> {
        let key = match explicit_key {
            Some(key) => key.to_string(),
            None => feature.ids.first().cloned().unwrap_or_default(),
        };
        if key.is_empty() {
            return Err(PlacemarkError::MissingKey);
        }

        let centroid = feature.geometry.centroid();
        if let Err(e) = validate_geographic_point(&centroid) {
            log::warn!("Feature {} has an unusable centroid: {}", key, e);
        }

        let (coordinate, serialized_geometry, geometry) = match &feature.geometry {
            Geometry::Point(point) => (*point, None, OnceCell::new()),
            area @ Geometry::Area(_) => {
                let payload = match encode_geometry(area) {
                    Ok(payload) => Some(payload),
                    Err(e) => {
                        log::warn!("Failed to encode geometry of {}: {}", key, e);
                        None
                    }
                };
                (centroid, payload, OnceCell::with_value(Some(area.clone())))
            }
        };

        let localized_names = feature
            .localized_names
            .iter()
            .flatten()
            .map(|(language, text)| LocalizedText::new(language, text.clone()))
            .collect();

        let street_name = feature.property(STREET_KEY).map(str::to_string);
        let street_address = street_name.as_ref().and_then(|street| {
            feature
                .property(HOUSE_NUMBER_KEY)
                .map(|number| format!("{} {}", number, street))
        });

        Ok(Self {
            key,
            name: feature.name.clone().unwrap_or_default(),
            localized_names,
            name_tag: non_empty(feature.name_tag.as_deref()),
            reference: non_empty(feature.reference.as_deref()),
            category: feature.category,
            amenity: feature.value.clone(),
            phone: feature.property(PHONE_KEY).map(str::to_string),
            street_address,
            street_name,
            is_roundabout: feature.is_roundabout,
            coordinate,
            centroid,
            serialized_geometry,
            serialized_entrance_ids: None,
            external_link_url: feature.property(WEBSITE_KEY).map(str::to_string),
            external_data: None,
            last_selected: None,
            geometry,
            entrances: OnceCell::new(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The fallback display name; may be empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn localized_names(&self) -> &[LocalizedText] {
        &self.localized_names
    }

    pub fn name_tag(&self) -> Option<&str> {
        self.name_tag.as_deref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn category(&self) -> SuperCategory {
        self.category
    }

    pub fn amenity(&self) -> &str {
        &self.amenity
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn street_address(&self) -> Option<&str> {
        self.street_address.as_deref()
    }

    pub fn street_name(&self) -> Option<&str> {
        self.street_name.as_deref()
    }

    pub fn is_roundabout(&self) -> bool {
        self.is_roundabout
    }

    /// The anchor point. For area entities this is the centroid.
    pub fn coordinate(&self) -> Point {
        self.coordinate
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn serialized_geometry(&self) -> Option<&[u8]> {
        self.serialized_geometry.as_deref()
    }

    pub fn serialized_entrance_ids(&self) -> Option<&[u8]> {
        self.serialized_entrance_ids.as_deref()
    }

    pub fn external_link_url(&self) -> Option<&str> {
        self.external_link_url.as_deref()
    }

    pub fn external_data(&self) -> Option<&str> {
        self.external_data.as_deref()
    }

    pub fn last_selected(&self) -> Option<SystemTime> {
        self.last_selected
    }

    /// Name in `language`, falling back to the default name and then to the
    /// name tag.
    pub fn localized_name(&self, language: &str) -> Option<&str> {
        self.localized_names
            .iter()
            .find(|text| text.is_language(language))
            .map(LocalizedText::text)
            .or_else(|| non_empty_str(&self.name))
            .or_else(|| self.name_tag())
    }

    /// The parsed geometry, cached after the first call.
    ///
    /// Without a serialized payload a `Point` at [`Self::coordinate`] is
    /// synthesized. `None` only when the payload fails to decode.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry
            .get_or_init(|| match &self.serialized_geometry {
                Some(payload) => {
                    let geometry = geometry_from_payload(payload);
                    if geometry.is_none() {
                        log::debug!("Entity {} has an undecodable geometry payload", self.key);
                    }
                    geometry
                }
                None => Some(Geometry::Point(self.coordinate)),
            })
            .as_ref()
    }

    pub fn coordinates(&self) -> Option<Coordinates<'_>> {
        self.geometry().map(Geometry::coordinates)
    }

    /// Resolved entrances, cached after the first call.
    ///
    /// `None` for point entities, for entities without an entrance payload and
    /// for a payload that is not a list of identifiers. Identifiers the resolver
    /// cannot find are dropped; the rest keep their payload order. The cache is
    /// filled by whichever resolver is passed first.
    pub fn entrances<R>(&self, resolver: &R) -> Option<&[Arc<SpatialEntity>]>
    where
        R: EntranceResolver + ?Sized,
    {
        self.entrances
            .get_or_init(|| {
                if !self.geometry()?.is_area() {
                    return None;
                }
                let ids = decode_entrance_ids(self.serialized_entrance_ids.as_ref()?)?;
                let resolved = ids
                    .iter()
                    .filter_map(|id| {
                        let entrance = resolver.resolve(id);
                        if entrance.is_none() {
                            log::debug!("Entrance {} of {} did not resolve", id, self.key);
                        }
                        entrance
                    })
                    .collect();
                Some(resolved)
            })
            .as_deref()
    }

    /// Whether `point` lies inside this entity's area. `false` for point
    /// entities and for entities whose geometry failed to decode.
    pub fn contains(&self, point: &Point) -> bool {
        self.geometry()
            .is_some_and(|geometry| geometry.within_area(point))
    }

    /// Stores the entrance identifiers and drops any resolved entrances.
    pub fn set_entrance_ids(&mut self, ids: &[String]) -> Result<()> {
        self.serialized_entrance_ids = Some(encode_entrance_ids(ids)?);
        self.entrances = OnceCell::new();
        Ok(())
    }

    /// Stores a raw entrance payload as received from the record store.
    pub fn set_serialized_entrance_ids(&mut self, payload: Option<Bytes>) {
        self.serialized_entrance_ids = payload;
        self.entrances = OnceCell::new();
    }

    pub fn set_external_link_url(&mut self, url: Option<String>) {
        self.external_link_url = url;
    }

    pub fn set_external_data(&mut self, data: Option<String>) {
        self.external_data = data;
    }

    pub fn set_last_selected(&mut self, at: Option<SystemTime>) {
        self.last_selected = at;
    }

    /// Record that the user chose this entity at `now`.
    pub fn mark_selected(&mut self, now: SystemTime) {
        self.last_selected = Some(now);
    }
}

/// Equality over the persisted fields; the derived caches are ignored.
impl PartialEq for SpatialEntity {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.name == other.name
            && self.localized_names == other.localized_names
            && self.name_tag == other.name_tag
            && self.reference == other.reference
            && self.category == other.category
            && self.amenity == other.amenity
            && self.phone == other.phone
            && self.street_address == other.street_address
            && self.street_name == other.street_name
            && self.is_roundabout == other.is_roundabout
            && self.coordinate == other.coordinate
            && self.centroid == other.centroid
            && self.serialized_geometry == other.serialized_geometry
            && self.serialized_entrance_ids == other.serialized_entrance_ids
            && self.external_link_url == other.external_link_url
            && self.external_data == other.external_data
            && self.last_selected == other.last_selected
    }
}

fn generate_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|value| !value.is_empty()).map(str::to_string)
}

fn non_empty_str(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}
