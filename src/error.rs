//! Error types for Placemark.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlacemarkError>;

#[derive(Debug, Error)]
pub enum PlacemarkError {
    /// Neither an explicit key nor a usable feature identifier was available.
    #[error("No usable key: feature has no identifier and no explicit key was given")]
    MissingKey,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid file format")]
    InvalidFormat,

    #[error("Place index is closed")]
    IndexClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PlacemarkError {
    fn from(err: serde_json::Error) -> Self {
        PlacemarkError::Serialization(err.to_string())
    }
}

#[cfg(feature = "snapshot")]
impl From<bincode::Error> for PlacemarkError {
    fn from(err: bincode::Error) -> Self {
        PlacemarkError::Serialization(err.to_string())
    }
}
