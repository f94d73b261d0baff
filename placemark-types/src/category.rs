use serde::{Deserialize, Serialize};

/// Coarse classification of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuperCategory {
    #[default]
    Undefined,
    Amenity,
    Road,
    Path,
    Building,
    Entrance,
    PublicTransport,
    Shop,
}

impl SuperCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuperCategory::Undefined => "undefined",
            SuperCategory::Amenity => "amenity",
            SuperCategory::Road => "road",
            SuperCategory::Path => "path",
            SuperCategory::Building => "building",
            SuperCategory::Entrance => "entrance",
            SuperCategory::PublicTransport => "public_transport",
            SuperCategory::Shop => "shop",
        }
    }
}

impl std::fmt::Display for SuperCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
