//! End-to-end pipeline tests that exercise the service wiring without a
//! network: catalog loading from disk, radius filtering, request
//! building, and the error ordering guarantees.

use std::io::Write;

use evacmap::catalog::{RadiusQuery, ShelterCatalog};
use evacmap::geo::Coordinate;
use evacmap::request::MapRequestBuilder;
use evacmap::{EvacMapServiceBuilder, LocationSource, MapError};
use tempfile::NamedTempFile;

/// Write a shelter CSV fixture and return the file handle.
fn write_catalog(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn csv_to_filtered_request() {
    // Two shelters near Shinjuku, one far away in Chiba, one bad row.
    let file = write_catalog(
        "lat,lng\n\
         35.6900,139.6920\n\
         35.6890,139.6910\n\
         35.6073,140.1063\n\
         oops,139.0\n",
    );

    let catalog = ShelterCatalog::from_csv_path(file.path()).unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.invalid_row_count(), 1);

    let origin = Coordinate::new(35.6895, 139.6917);
    let nearby = catalog.within_radius(&RadiusQuery::new(origin, 0.5));
    assert_eq!(nearby.len(), 2);

    let request = MapRequestBuilder::new()
        .api_key("k")
        .build(origin, &nearby)
        .unwrap();

    // Origin marker plus the two nearby shelters, catalog order.
    assert_eq!(request.markers.len(), 3);
    assert_eq!(
        request.markers[1].coordinate,
        Coordinate::new(35.6900, 139.6920)
    );
    assert_eq!(
        request.markers[2].coordinate,
        Coordinate::new(35.6890, 139.6910)
    );

    let url = request.url().unwrap().to_string();
    assert!(url.contains("zoom=15"));
    assert!(url.contains("size=500x500"));
    assert!(url.contains("format=jpg"));
}

#[tokio::test(flavor = "current_thread")]
async fn missing_key_reported_without_fetch() {
    let file = write_catalog("lat,lng\n35.0,139.0\n");

    // The endpoint is a closed port: any attempted fetch would fail with
    // a Fetch error, so MissingApiKey proves the fetch was never tried.
    let service = EvacMapServiceBuilder::new()
        .catalog_csv(file.path())
        .unwrap()
        .location(LocationSource::Fixed(Coordinate::new(35.0, 139.0)))
        .endpoint("http://127.0.0.1:1/staticmap")
        .build();

    let result = service.download_map().await;
    assert!(matches!(result, Err(MapError::MissingApiKey)));
}

#[tokio::test(flavor = "current_thread")]
async fn absent_capability_reported_before_catalog_query() {
    let file = write_catalog("lat,lng\n35.0,139.0\n");

    let service = EvacMapServiceBuilder::new()
        .catalog_csv(file.path())
        .unwrap()
        .api_key("k")
        .build();

    let result = service.download_map().await;
    assert!(matches!(result, Err(MapError::LocationUnsupported)));
}

#[tokio::test(flavor = "current_thread")]
async fn empty_catalog_still_builds_origin_only_request() {
    // An empty catalog is valid: the request carries just the origin
    // marker. The pipeline then fails at the (unreachable) fetch, not
    // earlier.
    let service = EvacMapServiceBuilder::new()
        .api_key("k")
        .location(LocationSource::Fixed(Coordinate::new(35.0, 139.0)))
        .endpoint("http://127.0.0.1:1/staticmap")
        .build();

    let result = service.download_map().await;
    assert!(matches!(result, Err(MapError::Fetch { .. })));
}

#[test]
fn unreadable_catalog_loads_empty() {
    let file = write_catalog("\u{0}binary\u{1}garbage");
    let catalog = ShelterCatalog::from_csv_path(file.path()).unwrap();
    assert!(catalog.is_empty());

    // Queries over zero records proceed normally.
    let nearby = catalog.within_radius(&RadiusQuery::new(Coordinate::new(35.0, 139.0), 0.5));
    assert!(nearby.is_empty());
}
