//! Error types for the evacmap library.

use thiserror::Error;

/// Errors that can occur while producing a shelter map.
///
/// Every variant is terminal for the current pipeline run; nothing in the
/// library retries automatically.
#[derive(Error, Debug)]
pub enum MapError {
    /// IO error when writing the composited image to disk.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No geolocation capability is configured.
    #[error("Geolocation is not supported: no location source configured")]
    LocationUnsupported,

    /// A location source exists but acquisition failed (denied, timed out,
    /// or returned an unusable payload).
    #[error("Location could not be acquired: {reason}")]
    LocationUnavailable { reason: String },

    /// The static-map rendering service API key is absent.
    #[error("Static map API key is not configured (set EVACMAP_API_KEY)")]
    MissingApiKey,

    /// The map raster could not be fetched or loaded from the rendering service.
    #[error("Failed to load map raster: {reason}")]
    Fetch { reason: String },

    /// A drawing surface with the raster's dimensions could not be acquired.
    #[error("Cannot acquire a {width}x{height} drawing surface")]
    Surface { width: u32, height: u32 },

    /// Encoding the composited surface produced no usable payload.
    #[error("Image encoding failed: {reason}")]
    Encode { reason: String },
}

impl From<reqwest::Error> for MapError {
    fn from(err: reqwest::Error) -> Self {
        MapError::Fetch {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using [`MapError`].
pub type Result<T> = std::result::Result<T, MapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MapError::LocationUnavailable {
            reason: "request timed out".to_string(),
        };
        assert!(err.to_string().contains("timed out"));

        let err = MapError::Surface {
            width: 0,
            height: 500,
        };
        assert!(err.to_string().contains("0x500"));

        let err = MapError::MissingApiKey;
        assert!(err.to_string().contains("EVACMAP_API_KEY"));
    }
}
