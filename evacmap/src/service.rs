//! High-level shelter-map service.
//!
//! This module provides [`EvacMapService`], which wires the pipeline
//! together: location acquisition → catalog radius filter → map request
//! build → raster fetch → JPEG composite. The service owns the read-only
//! catalog and the fixed request options; every download runs the
//! pipeline strictly sequentially and shares no mutable state with other
//! runs.
//!
//! ```ignore
//! use evacmap::{EvacMapServiceBuilder, LocationSource};
//! use evacmap::geo::Coordinate;
//!
//! let service = EvacMapServiceBuilder::new()
//!     .catalog_csv("TokyoSheet.csv")?
//!     .api_key("secret")
//!     .location(LocationSource::Fixed(Coordinate::new(35.6895, 139.6917)))
//!     .build();
//!
//! let image = service.download_map().await?;
//! image.save("map.jpg")?;
//! ```

use std::path::Path;

use tracing::info;

use crate::catalog::{RadiusQuery, ShelterCatalog};
use crate::compositor::{ImageCompositor, MapImage};
use crate::error::Result;
use crate::location::LocationSource;
use crate::request::{MapFormat, MapRequestBuilder};

/// Default search radius in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 0.5;

/// The assembled shelter-map pipeline.
///
/// Stateless across runs apart from the read-only [`ShelterCatalog`];
/// concurrent downloads are safe but independent (no deduplication), and
/// a failed run leaves no state behind.
pub struct EvacMapService {
    catalog: ShelterCatalog,
    location: LocationSource,
    request: MapRequestBuilder,
    radius_km: f64,
    client: reqwest::Client,
    compositor: ImageCompositor,
}

impl EvacMapService {
    /// Create a builder for configuring the service.
    pub fn builder() -> EvacMapServiceBuilder {
        EvacMapServiceBuilder::new()
    }

    /// The loaded shelter catalog.
    pub fn catalog(&self) -> &ShelterCatalog {
        &self.catalog
    }

    /// The configured search radius in kilometers.
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Run the pipeline once and return the composited map image.
    ///
    /// Ordering guarantee: the location resolves before any catalog query
    /// occurs, the request is built before the fetch, and the fetch
    /// completes before compositing. Every error is terminal for this
    /// run; nothing is retried and the catalog is left unchanged.
    pub async fn download_map(&self) -> Result<MapImage> {
        let origin = self.location.acquire(&self.client).await?;

        let query = RadiusQuery::new(origin, self.radius_km);
        let nearby = self.catalog.within_radius(&query);
        info!(
            "{} of {} shelters within {} km of {},{}",
            nearby.len(),
            self.catalog.len(),
            self.radius_km,
            origin.lat,
            origin.lng
        );

        // A missing API key fails here, before any fetch is attempted.
        let request = self.request.build(origin, &nearby)?;

        self.compositor.render(&request).await
    }

    /// Run the pipeline and write the result to `path`.
    pub async fn download_map_to<P: AsRef<Path>>(&self, path: P) -> Result<MapImage> {
        let image = self.download_map().await?;
        image.save(path)?;
        Ok(image)
    }
}

/// Builder for creating [`EvacMapService`] with custom configuration.
///
/// # Environment Variables
///
/// [`from_env`](Self::from_env) reads:
///
/// | Variable | Description | Default |
/// |----------|-------------|---------|
/// | `EVACMAP_API_KEY` | Rendering service API key | None |
/// | `EVACMAP_CATALOG` | Path to the shelter CSV | None (empty catalog) |
/// | `EVACMAP_RADIUS_KM` | Search radius in km | 0.5 |
/// | `EVACMAP_LOCATION_URL` | Geolocation service endpoint | None |
pub struct EvacMapServiceBuilder {
    catalog: ShelterCatalog,
    location: LocationSource,
    request: MapRequestBuilder,
    radius_km: f64,
}

impl Default for EvacMapServiceBuilder {
    fn default() -> Self {
        Self {
            catalog: ShelterCatalog::new(),
            location: LocationSource::Unsupported,
            request: MapRequestBuilder::new(),
            radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

impl EvacMapServiceBuilder {
    /// Create a builder with an empty catalog, no location source, and
    /// the default request options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error only if `EVACMAP_CATALOG` is set but the file
    /// cannot be opened. A missing API key does not fail here; it
    /// degrades the eventual `build` step instead.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self {
            request: MapRequestBuilder::from_env(),
            ..Self::default()
        };

        if let Ok(path) = std::env::var("EVACMAP_CATALOG") {
            builder.catalog = ShelterCatalog::from_csv_path(path)?;
        }

        if let Some(radius) = std::env::var("EVACMAP_RADIUS_KM")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
        {
            builder.radius_km = radius;
        }

        if let Ok(url) = std::env::var("EVACMAP_LOCATION_URL") {
            builder.location = LocationSource::Service { url };
        }

        Ok(builder)
    }

    /// Set the catalog directly.
    pub fn catalog(mut self, catalog: ShelterCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Load the catalog from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened; malformed rows are
    /// dropped and counted, never a hard error.
    pub fn catalog_csv<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.catalog = ShelterCatalog::from_csv_path(path)?;
        Ok(self)
    }

    /// Set the location source.
    pub fn location(mut self, location: LocationSource) -> Self {
        self.location = location;
        self
    }

    /// Set the search radius in kilometers.
    pub fn radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    /// Set the rendering service API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.request = self.request.api_key(key);
        self
    }

    /// Set the map zoom level.
    pub fn zoom(mut self, zoom: u32) -> Self {
        self.request = self.request.zoom(zoom);
        self
    }

    /// Set the rendered map size in pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.request = self.request.size(width, height);
        self
    }

    /// Set the output raster format.
    pub fn format(mut self, format: MapFormat) -> Self {
        self.request = self.request.format(format);
        self
    }

    /// Override the rendering service endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.request = self.request.endpoint(endpoint);
        self
    }

    /// Build the [`EvacMapService`].
    ///
    /// One HTTP client is shared by location acquisition and the raster
    /// fetch.
    pub fn build(self) -> EvacMapService {
        let client = reqwest::Client::new();
        EvacMapService {
            catalog: self.catalog,
            location: self.location,
            request: self.request,
            radius_km: self.radius_km,
            compositor: ImageCompositor::with_client(client.clone()),
            client,
        }
    }
}
