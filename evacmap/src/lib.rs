//! # EvacMap - Evacuation Shelter Map Library
//!
//! Library for producing a downloadable static map of evacuation shelters
//! around the user's current location.
//!
//! ## Pipeline
//!
//! 1. **Locate**: acquire the current coordinate from a
//!    [`LocationSource`] (fixed value or HTTP geolocation endpoint).
//! 2. **Filter**: select catalog shelters within a radius of the origin
//!    using great-circle (haversine) distance.
//! 3. **Build**: deterministically derive a static-map request, base-map
//!    parameters plus one marker per shelter, origin marker first.
//! 4. **Composite**: fetch the rendered raster, draw it onto an in-memory
//!    surface, and re-encode it as a JPEG ready to save as `map.jpg`.
//!
//! All I/O-bound steps are `async` and the pipeline is strictly
//! sequential per invocation; concurrent runs share no mutable state.
//!
//! ## Quick Start
//!
//! ```ignore
//! use evacmap::{EvacMapServiceBuilder, LocationSource};
//! use evacmap::geo::Coordinate;
//!
//! let service = EvacMapServiceBuilder::new()
//!     .catalog_csv("TokyoSheet.csv")?
//!     .api_key(std::env::var("EVACMAP_API_KEY")?)
//!     .location(LocationSource::Fixed(Coordinate::new(35.6895, 139.6917)))
//!     .radius_km(0.5)
//!     .build();
//!
//! let image = service.download_map().await?;
//! image.save("map.jpg")?;
//! ```
//!
//! ## Catalog Format
//!
//! The shelter catalog is a headed CSV with `lat` and `lng` columns in
//! decimal degrees. Malformed rows are dropped at load time and counted;
//! they never enter the record set as NaN coordinates.

pub mod catalog;
pub mod compositor;
pub mod error;
pub mod geo;
pub mod location;
pub mod request;
pub mod service;

// Re-export main types at crate root for convenience
pub use catalog::{RadiusQuery, ShelterCatalog, ShelterRecord};
pub use compositor::{ImageCompositor, MapImage};
pub use error::{MapError, Result};
pub use geo::{distance_km, Coordinate, EARTH_RADIUS_KM};
pub use location::LocationSource;
pub use request::{MapFormat, MapRequest, MapRequestBuilder, MarkerRole, MarkerSpec};
pub use service::{EvacMapService, EvacMapServiceBuilder, DEFAULT_RADIUS_KM};
