//! Asynchronous acquisition of the user's current coordinate.
//!
//! [`LocationSource`] normalizes the host's geolocation capability into a
//! two-variant result: a coordinate, or one of two distinguished failure
//! kinds: the capability is absent entirely, or it exists but acquisition
//! failed. Neither failure is ever swallowed past this layer.

use serde::Deserialize;

use crate::error::{MapError, Result};
use crate::geo::Coordinate;

/// JSON payload expected from a geolocation service endpoint.
#[derive(Debug, Deserialize)]
struct LocationPayload {
    lat: f64,
    lng: f64,
}

/// Where the current coordinate comes from.
///
/// # Example
///
/// ```ignore
/// use evacmap::geo::Coordinate;
/// use evacmap::location::LocationSource;
///
/// let source = LocationSource::Fixed(Coordinate::new(35.6895, 139.6917));
/// let coordinate = source.acquire(&client).await?;
/// assert_eq!(coordinate.lat, 35.6895);
/// ```
#[derive(Debug, Clone, Default)]
pub enum LocationSource {
    /// No geolocation capability is configured.
    #[default]
    Unsupported,
    /// A coordinate supplied directly by the caller.
    Fixed(Coordinate),
    /// An HTTP endpoint returning `{"lat": ..., "lng": ...}` JSON.
    Service {
        /// Endpoint URL queried with a GET request.
        url: String,
    },
}

impl LocationSource {
    /// Acquire the current coordinate.
    ///
    /// Suspends the caller until the source either supplies a coordinate
    /// or reports failure. One outstanding request at a time is
    /// sufficient; callers serialize invocations themselves.
    ///
    /// # Errors
    ///
    /// - [`MapError::LocationUnsupported`] when no source is configured.
    /// - [`MapError::LocationUnavailable`] when a service source fails
    ///   (transport error, non-success status, undecodable payload, or
    ///   non-finite coordinates).
    pub async fn acquire(&self, client: &reqwest::Client) -> Result<Coordinate> {
        match self {
            LocationSource::Unsupported => Err(MapError::LocationUnsupported),
            LocationSource::Fixed(coordinate) => Ok(*coordinate),
            LocationSource::Service { url } => {
                let response = client.get(url).send().await.map_err(|e| {
                    MapError::LocationUnavailable {
                        reason: e.to_string(),
                    }
                })?;

                if !response.status().is_success() {
                    return Err(MapError::LocationUnavailable {
                        reason: format!("location service returned HTTP {}", response.status()),
                    });
                }

                let payload: LocationPayload =
                    response
                        .json()
                        .await
                        .map_err(|e| MapError::LocationUnavailable {
                            reason: format!("location payload undecodable: {e}"),
                        })?;

                let coordinate = Coordinate::new(payload.lat, payload.lng);
                if !coordinate.is_finite() {
                    return Err(MapError::LocationUnavailable {
                        reason: format!(
                            "location service returned non-finite coordinates: {},{}",
                            payload.lat, payload.lng
                        ),
                    });
                }

                Ok(coordinate)
            }
        }
    }

    /// Whether any capability is configured at all.
    pub fn is_supported(&self) -> bool {
        !matches!(self, LocationSource::Unsupported)
    }
}
