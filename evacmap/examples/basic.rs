//! Basic example demonstrating evacmap library usage.
//!
//! Run with: cargo run --example basic -- /path/to/shelters.csv

use evacmap::catalog::{RadiusQuery, ShelterCatalog};
use evacmap::geo::{distance_km, Coordinate};
use evacmap::request::MapRequestBuilder;
use evacmap::MapError;
use std::env;

fn main() -> Result<(), MapError> {
    // Get the catalog path from the command line
    let catalog_path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- /path/to/shelters.csv");
        std::process::exit(1);
    });

    // Load the catalog; malformed rows are dropped and counted
    let catalog = ShelterCatalog::from_csv_path(&catalog_path)?;
    println!(
        "Loaded {} shelter(s), dropped {} invalid row(s)",
        catalog.len(),
        catalog.invalid_row_count()
    );

    // Query around Shinjuku station
    let origin = Coordinate::new(35.6895, 139.6917);
    let query = RadiusQuery::new(origin, 0.5);
    let nearby = catalog.within_radius(&query);

    println!(
        "\nShelters within {} km of {},{}:",
        query.radius_km, origin.lat, origin.lng
    );
    println!("{:-<50}", "");

    for record in &nearby {
        println!(
            "  {},{}  ({:.3} km)",
            record.coordinate.lat,
            record.coordinate.lng,
            distance_km(origin, record.coordinate)
        );
    }

    // Build the static-map request; the key comes from EVACMAP_API_KEY
    match MapRequestBuilder::from_env().build(origin, &nearby) {
        Ok(request) => {
            println!("\nMap URL: {}", request.url()?);
        }
        Err(MapError::MissingApiKey) => {
            println!("\nSet EVACMAP_API_KEY to print the map URL");
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
