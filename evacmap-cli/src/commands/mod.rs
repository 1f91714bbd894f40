pub mod catalog;
pub mod download;
pub mod filter;
pub mod url;

use anyhow::{Context, Result};
use evacmap::ShelterCatalog;
use std::path::PathBuf;

/// Load the shelter catalog from the CLI argument or fail with a hint.
pub fn load_catalog(path: Option<PathBuf>) -> Result<ShelterCatalog> {
    let path = path.context(
        "No shelter catalog configured. Use --catalog or set EVACMAP_CATALOG",
    )?;
    ShelterCatalog::from_csv_path(&path)
        .with_context(|| format!("Failed to open catalog: {}", path.display()))
}

/// Parse a WxH size argument (e.g. "500x500").
pub fn parse_size(size: &str) -> Result<(u32, u32)> {
    let (w, h) = size
        .split_once('x')
        .with_context(|| format!("Invalid size '{}', expected WxH (e.g. 500x500)", size))?;
    let width = w.parse().with_context(|| format!("Invalid width '{}'", w))?;
    let height = h.parse().with_context(|| format!("Invalid height '{}'", h))?;
    Ok((width, height))
}
