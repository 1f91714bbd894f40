//! Raster fetching and JPEG compositing.
//!
//! This module provides [`ImageCompositor`], which resolves a
//! [`MapRequest`](crate::request::MapRequest) into a fetchable URL, loads
//! the rendered raster, draws it onto an in-memory RGB surface sized to
//! the raster's natural dimensions, and re-encodes the surface as a JPEG
//! byte blob ready to save as `map.jpg`.
//!
//! The pure composite step is separated from the fetch
//! ([`ImageCompositor::composite`]) so it can be exercised without a
//! network.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, ImageEncoder};
use tracing::debug;

use crate::error::{MapError, Result};
use crate::request::MapRequest;

/// Default filename for the downloaded map.
pub const DEFAULT_FILENAME: &str = "map.jpg";

/// A composited, JPEG-encoded map image.
#[derive(Debug, Clone, PartialEq)]
pub struct MapImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl MapImage {
    /// The JPEG-encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the image, returning the JPEG-encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Write the image to `path`.
    ///
    /// Idempotent to call repeatedly with fresh blobs; an existing file is
    /// overwritten.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }

    /// Write the image to `map.jpg` in `dir`, returning the full path.
    pub fn save_in<P: AsRef<Path>>(&self, dir: P) -> Result<std::path::PathBuf> {
        let path = dir.as_ref().join(DEFAULT_FILENAME);
        self.save(&path)?;
        Ok(path)
    }
}

/// Fetches rendered rasters and re-encodes them into downloadable JPEGs.
#[derive(Debug, Clone, Default)]
pub struct ImageCompositor {
    client: reqwest::Client,
}

impl ImageCompositor {
    /// Create a compositor with its own HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compositor sharing an existing HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Resolve `request` into a URL, fetch the raster, and composite it.
    ///
    /// # Errors
    ///
    /// Each failure is a distinct outcome and none is retried:
    ///
    /// - [`MapError::MissingApiKey`] if the URL cannot be built.
    /// - [`MapError::Fetch`] on transport failure, non-success status, or
    ///   an undecodable raster payload.
    /// - [`MapError::Surface`] if the drawing surface cannot be acquired.
    /// - [`MapError::Encode`] if JPEG encoding produced no payload.
    pub async fn render(&self, request: &MapRequest) -> Result<MapImage> {
        let url = request.url()?;
        debug!("fetching map raster from {}", url.host_str().unwrap_or("?"));

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(MapError::Fetch {
                reason: format!("rendering service returned HTTP {}", response.status()),
            });
        }

        let raster = response.bytes().await?;
        Self::composite(&raster)
    }

    /// Draw an encoded raster onto a fresh surface and encode it as JPEG.
    ///
    /// The surface takes the raster's natural dimensions; JPEG carries no
    /// alpha, so the surface is reduced to RGB before encoding.
    pub fn composite(raster: &[u8]) -> Result<MapImage> {
        let decoded = image::load_from_memory(raster).map_err(|e| MapError::Fetch {
            reason: format!("raster could not be decoded: {e}"),
        })?;

        let (width, height) = (decoded.width(), decoded.height());
        if width == 0 || height == 0 {
            return Err(MapError::Surface { width, height });
        }

        let mut surface = DynamicImage::new_rgba8(width, height);
        imageops::overlay(&mut surface, &decoded, 0, 0);
        let rgb = surface.to_rgb8();

        let mut cursor = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new(&mut cursor);
        encoder
            .write_image(rgb.as_raw(), width, height, image::ColorType::Rgb8.into())
            .map_err(|e| MapError::Encode {
                reason: e.to_string(),
            })?;

        let bytes = cursor.into_inner();
        if bytes.is_empty() {
            return Err(MapError::Encode {
                reason: "encoder produced no data".to_string(),
            });
        }

        debug!("composited {}x{} raster into {} JPEG bytes", width, height, bytes.len());

        Ok(MapImage {
            bytes,
            width,
            height,
        })
    }
}
