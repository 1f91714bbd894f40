use anyhow::{Context, Result};
use evacmap::geo::Coordinate;
use evacmap::{EvacMapServiceBuilder, LocationSource};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use super::load_catalog;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    catalog: Option<PathBuf>,
    api_key: Option<String>,
    radius_km: f64,
    fixed: Option<(f64, f64)>,
    location_url: Option<String>,
    zoom: u32,
    size: String,
    output: PathBuf,
) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    if catalog.invalid_row_count() > 0 {
        eprintln!(
            "warning: dropped {} unparseable catalog row(s)",
            catalog.invalid_row_count()
        );
    }

    let location = match (fixed, location_url) {
        (Some((lat, lng)), _) => LocationSource::Fixed(Coordinate::new(lat, lng)),
        (None, Some(url)) => LocationSource::Service { url },
        (None, None) => LocationSource::Unsupported,
    };

    let (width, height) = super::parse_size(&size)?;

    let mut builder = EvacMapServiceBuilder::new()
        .catalog(catalog)
        .location(location)
        .radius_km(radius_km)
        .zoom(zoom)
        .size(width, height);
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }
    let service = builder.build();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message("fetching shelter map...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = service.download_map_to(&output).await;
    spinner.finish_and_clear();

    let image = result.context("Failed to produce the shelter map")?;
    println!(
        "Saved {}x{} map to: {}",
        image.width(),
        image.height(),
        output.display()
    );

    Ok(())
}
