//! Configuration for the place index and entity naming.
use serde::de::Error;

/// Index configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Preferred display language for [`crate::SpatialEntity::localized_name`] lookups.
    #[serde(default = "Config::default_language")]
    pub language: String,

    /// Reject entities with non-finite or out-of-range centroids on insert.
    #[serde(default = "Config::default_validate_coordinates")]
    pub validate_coordinates: bool,

    /// Result limit used by `nearest` / `within_radius` when the caller passes none.
    #[serde(default = "Config::default_query_limit")]
    pub default_query_limit: usize,

    #[serde(default)]
    pub snapshot: SnapshotSettings,
}

/// Configuration for snapshot persistence
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotSettings {
    /// Write a snapshot automatically after this many index mutations.
    #[serde(default)]
    pub auto_snapshot_ops: Option<usize>,
}

impl Config {
    fn default_language() -> String {
        "en".to_string()
    }

    const fn default_validate_coordinates() -> bool {
        true
    }

    const fn default_query_limit() -> usize {
        10
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_coordinate_validation(mut self, enabled: bool) -> Self {
        self.validate_coordinates = enabled;
        self
    }

    pub fn with_default_query_limit(mut self, limit: usize) -> Self {
        assert!(limit > 0, "Default query limit must be greater than zero");
        self.default_query_limit = limit;
        self
    }

    pub fn with_auto_snapshot(mut self, ops: usize) -> Self {
        assert!(ops > 0, "Auto snapshot interval must be greater than zero");
        self.snapshot.auto_snapshot_ops = Some(ops);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !placemark_types::localized::is_valid_language_code(&self.language) {
            return Err(format!("Invalid language code: {:?}", self.language));
        }

        if self.default_query_limit == 0 {
            return Err("Default query limit must be greater than zero".to_string());
        }

        if self.snapshot.auto_snapshot_ops == Some(0) {
            return Err("Auto snapshot interval must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Self::default_language(),
            validate_coordinates: Self::default_validate_coordinates(),
            default_query_limit: Self::default_query_limit(),
            snapshot: SnapshotSettings::default(),
        }
    }
}
