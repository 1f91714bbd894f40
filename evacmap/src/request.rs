//! Static-map request construction.
//!
//! This module provides [`MapRequestBuilder`], a pure transform from an
//! origin coordinate plus a filtered shelter set into a [`MapRequest`]
//! that fully determines the raster fetched from the rendering service.
//!
//! # Determinism
//!
//! Building twice from identical inputs yields field-wise identical (and
//! `==`) requests. The marker sequence is always the origin marker
//! followed by one shelter marker per record, in catalog order. The
//! builder performs no network or other I/O.

use serde::Serialize;
use url::Url;

use crate::catalog::ShelterRecord;
use crate::error::{MapError, Result};
use crate::geo::Coordinate;

/// Default map zoom level.
pub const DEFAULT_ZOOM: u32 = 15;

/// Default rendered map size in pixels (width, height).
pub const DEFAULT_SIZE: (u32, u32) = (500, 500);

/// Default static-map rendering endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Environment variable holding the rendering-service API key.
pub const API_KEY_ENV: &str = "EVACMAP_API_KEY";

/// Role of a marker on the rendered map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerRole {
    /// The user's current location.
    Origin,
    /// A shelter from the catalog.
    Shelter,
}

/// A labeled, colored point overlay on the rendered map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    /// Where the marker is placed.
    pub coordinate: Coordinate,
    /// What the marker represents.
    pub role: MarkerRole,
    /// Marker color understood by the rendering service.
    pub color: &'static str,
    /// Single-character marker label.
    pub label: &'static str,
}

impl MarkerSpec {
    /// The black "C" marker for the user's current location.
    pub fn origin(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            role: MarkerRole::Origin,
            color: "black",
            label: "C",
        }
    }

    /// The red "S" marker for a catalog shelter.
    pub fn shelter(record: &ShelterRecord) -> Self {
        Self {
            coordinate: record.coordinate,
            role: MarkerRole::Shelter,
            color: "red",
            label: "S",
        }
    }

    /// Render as a `markers=` query value: `color:C|label:L|lat,lng`.
    pub fn to_param(&self) -> String {
        format!(
            "color:{}|label:{}|{},{}",
            self.color, self.label, self.coordinate.lat, self.coordinate.lng
        )
    }
}

/// Output raster format requested from the rendering service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MapFormat {
    /// JPEG, the pipeline default.
    #[default]
    Jpg,
    /// PNG.
    Png,
}

impl MapFormat {
    /// The `format=` query value.
    pub fn as_str(&self) -> &'static str {
        match self {
            MapFormat::Jpg => "jpg",
            MapFormat::Png => "png",
        }
    }
}

/// A fully-determined static-map request.
///
/// Two requests with identical fields compare equal; equality is the
/// determinism invariant the pipeline relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRequest {
    /// Map center (the user's location).
    pub origin: Coordinate,
    /// Zoom level.
    pub zoom: u32,
    /// Rendered size in pixels (width, height).
    pub size: (u32, u32),
    /// Output raster format.
    pub format: MapFormat,
    /// Overlay markers: origin first, then shelters in catalog order.
    pub markers: Vec<MarkerSpec>,
    /// Rendering service endpoint.
    pub endpoint: String,
    /// Rendering service API key.
    pub key: String,
}

impl MapRequest {
    /// Encode the request as a fetchable URL.
    ///
    /// The query carries `center`, `zoom`, `size`, `format`, `key` and one
    /// repeated `markers` pair per [`MarkerSpec`], in marker order.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::MissingApiKey`] if the key is empty (the
    /// builder never produces such a request, but the check keeps the
    /// fetch gated here too) and [`MapError::Fetch`] if the endpoint is
    /// not a valid base URL.
    pub fn url(&self) -> Result<Url> {
        if self.key.is_empty() {
            return Err(MapError::MissingApiKey);
        }

        let mut url = Url::parse(&self.endpoint).map_err(|e| MapError::Fetch {
            reason: format!("invalid endpoint {}: {}", self.endpoint, e),
        })?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair(
                "center",
                &format!("{},{}", self.origin.lat, self.origin.lng),
            );
            query.append_pair("zoom", &self.zoom.to_string());
            query.append_pair("size", &format!("{}x{}", self.size.0, self.size.1));
            query.append_pair("format", self.format.as_str());
            query.append_pair("key", &self.key);
            for marker in &self.markers {
                query.append_pair("markers", &marker.to_param());
            }
        }

        Ok(url)
    }
}

/// Builder holding the fixed options a [`MapRequest`] is derived from.
///
/// # Example
///
/// ```
/// use evacmap::geo::Coordinate;
/// use evacmap::request::MapRequestBuilder;
///
/// let builder = MapRequestBuilder::new().api_key("secret");
/// let request = builder.build(Coordinate::new(35.0, 139.0), &[])?;
/// assert_eq!(request.zoom, 15);
/// assert_eq!(request.markers.len(), 1); // origin marker only
/// # Ok::<(), evacmap::MapError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MapRequestBuilder {
    zoom: u32,
    size: (u32, u32),
    format: MapFormat,
    endpoint: String,
    api_key: Option<String>,
}

impl Default for MapRequestBuilder {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            size: DEFAULT_SIZE,
            format: MapFormat::Jpg,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
        }
    }
}

impl MapRequestBuilder {
    /// Create a builder with the default options (zoom 15, 500x500, jpg).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder taking the API key from the `EVACMAP_API_KEY`
    /// environment variable. The key may be absent; `build` then returns
    /// [`MapError::MissingApiKey`] instead of a malformed request.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        Self {
            api_key,
            ..Self::default()
        }
    }

    /// Set the rendering service API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = if key.is_empty() { None } else { Some(key) };
        self
    }

    /// Set the zoom level.
    pub fn zoom(mut self, zoom: u32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the rendered size in pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Set the output raster format.
    pub fn format(mut self, format: MapFormat) -> Self {
        self.format = format;
        self
    }

    /// Override the rendering service endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the request for an origin and a filtered shelter set.
    ///
    /// A pure transform: no network, no I/O, no clock. Identical inputs
    /// produce `==` requests regardless of call count.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::MissingApiKey`] when no key is configured; the
    /// caller must not attempt a fetch in that case.
    pub fn build(&self, origin: Coordinate, shelters: &[ShelterRecord]) -> Result<MapRequest> {
        let key = self.api_key.clone().ok_or(MapError::MissingApiKey)?;

        let mut markers = Vec::with_capacity(shelters.len() + 1);
        markers.push(MarkerSpec::origin(origin));
        markers.extend(shelters.iter().map(MarkerSpec::shelter));

        Ok(MapRequest {
            origin,
            zoom: self.zoom,
            size: self.size,
            format: self.format,
            markers,
            endpoint: self.endpoint.clone(),
            key,
        })
    }
}
