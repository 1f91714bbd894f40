use anyhow::Result;
use evacmap::catalog::RadiusQuery;
use evacmap::geo::{distance_km, Coordinate};
use serde::Serialize;
use std::path::PathBuf;

use super::load_catalog;

#[derive(Serialize)]
struct FilterResponse {
    origin: Coordinate,
    radius_km: f64,
    shelters: Vec<ShelterEntry>,
}

#[derive(Serialize)]
struct ShelterEntry {
    lat: f64,
    lng: f64,
    distance_km: f64,
}

pub fn run(
    catalog: Option<PathBuf>,
    radius_km: f64,
    lat: f64,
    lng: f64,
    json: bool,
) -> Result<()> {
    let catalog = load_catalog(catalog)?;

    let origin = Coordinate::new(lat, lng);
    let query = RadiusQuery::new(origin, radius_km);
    let nearby = catalog.within_radius(&query);

    if json {
        let response = FilterResponse {
            origin,
            radius_km,
            shelters: nearby
                .iter()
                .map(|r| ShelterEntry {
                    lat: r.coordinate.lat,
                    lng: r.coordinate.lng,
                    distance_km: distance_km(origin, r.coordinate),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string(&response)?);
        return Ok(());
    }

    if nearby.is_empty() {
        println!(
            "No shelters within {} km of {},{} ({} in catalog)",
            radius_km,
            lat,
            lng,
            catalog.len()
        );
        return Ok(());
    }

    println!(
        "{} shelter(s) within {} km of {},{}:",
        nearby.len(),
        radius_km,
        lat,
        lng
    );
    for record in &nearby {
        println!(
            "  {},{}  ({:.3} km)",
            record.coordinate.lat,
            record.coordinate.lng,
            distance_km(origin, record.coordinate)
        );
    }

    Ok(())
}
