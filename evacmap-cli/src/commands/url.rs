use anyhow::{Context, Result};
use evacmap::catalog::RadiusQuery;
use evacmap::geo::Coordinate;
use evacmap::request::MapRequestBuilder;
use std::path::PathBuf;

use super::load_catalog;

pub fn run(
    catalog: Option<PathBuf>,
    api_key: Option<String>,
    radius_km: f64,
    lat: f64,
    lng: f64,
    zoom: u32,
    size: String,
) -> Result<()> {
    let catalog = load_catalog(catalog)?;

    let origin = Coordinate::new(lat, lng);
    let nearby = catalog.within_radius(&RadiusQuery::new(origin, radius_km));

    let (width, height) = super::parse_size(&size)?;

    let mut builder = MapRequestBuilder::new().zoom(zoom).size(width, height);
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }

    let request = builder
        .build(origin, &nearby)
        .context("Cannot build the map request. Use --api-key or set EVACMAP_API_KEY")?;

    println!("{}", request.url()?);
    Ok(())
}
