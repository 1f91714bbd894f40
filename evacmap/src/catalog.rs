//! Shelter catalog loading and radius filtering.
//!
//! This module provides [`ShelterCatalog`], the read-only set of candidate
//! shelter coordinates, loaded once from a CSV source and queried per
//! download with [`ShelterCatalog::within_radius`].
//!
//! # CSV Format
//!
//! The catalog source is a headed CSV with at least `lat` and `lng`
//! columns in decimal degrees:
//!
//! ```text
//! lat,lng
//! 35.6895,139.6917
//! 35.6586,139.7454
//! ```
//!
//! Rows whose coordinates are missing, unparseable, or non-finite are
//! dropped at this boundary and counted, never silently kept as NaN
//! records. A row-level failure does not abort loading of the remaining
//! rows: the load always succeeds, possibly with fewer records.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::geo::{distance_km, Coordinate};

/// Default CSV column name for latitude.
pub const LAT_COLUMN: &str = "lat";

/// Default CSV column name for longitude.
pub const LNG_COLUMN: &str = "lng";

/// A coordinate belonging to the static shelter catalog.
///
/// Created once at load time and immutable thereafter; the whole set is
/// replaced only by reloading the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShelterRecord {
    /// The shelter's position.
    pub coordinate: Coordinate,
}

impl ShelterRecord {
    /// Create a record from a coordinate.
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

/// An ephemeral radius query, constructed per download action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusQuery {
    /// The dynamic origin (usually the user's current location).
    pub origin: Coordinate,
    /// Search radius in kilometers. Must be positive.
    pub radius_km: f64,
}

impl RadiusQuery {
    /// Create a new radius query.
    pub fn new(origin: Coordinate, radius_km: f64) -> Self {
        Self { origin, radius_km }
    }
}

/// Outcome of parsing one catalog row.
///
/// The loader tags every row instead of mapping malformed values to NaN
/// coordinates, letting the catalog decide what to do with invalid rows.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRow {
    /// The row yielded a usable shelter record.
    Valid(ShelterRecord),
    /// The row could not be converted to finite coordinates.
    Invalid {
        /// The raw field values of the offending row.
        raw: Vec<String>,
    },
}

/// The read-only set of candidate shelter points.
///
/// # Example
///
/// ```no_run
/// use evacmap::catalog::{RadiusQuery, ShelterCatalog};
/// use evacmap::geo::Coordinate;
///
/// let catalog = ShelterCatalog::from_csv_path("TokyoSheet.csv")?;
/// let query = RadiusQuery::new(Coordinate::new(35.6895, 139.6917), 0.5);
/// let nearby = catalog.within_radius(&query);
/// println!("{} shelters within 0.5 km", nearby.len());
/// # Ok::<(), evacmap::MapError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShelterCatalog {
    /// Records in source order.
    records: Vec<ShelterRecord>,
    /// Raw rows that failed to parse, in source order.
    invalid_rows: Vec<Vec<String>>,
}

impl ShelterCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from an already-parsed record sequence.
    ///
    /// Record order is preserved; it defines the order of
    /// [`within_radius`](Self::within_radius) results.
    pub fn load(records: Vec<ShelterRecord>) -> Self {
        Self {
            records,
            invalid_rows: Vec::new(),
        }
    }

    /// Load a catalog from a CSV file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file cannot be opened. Malformed
    /// content never fails the load: a structurally unreadable CSV yields
    /// a loaded-but-empty catalog, and bad rows are dropped and counted.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::from_csv_reader(BufReader::new(file)))
    }

    /// Load a catalog from any CSV reader.
    ///
    /// Rows parse to a tagged [`ParsedRow`]; invalid rows (missing
    /// columns, unparseable or non-finite values) are dropped and kept
    /// queryable via [`invalid_row_count`](Self::invalid_row_count).
    pub fn from_csv_reader<R: Read>(reader: R) -> Self {
        let mut csv_reader = csv::Reader::from_reader(reader);

        // Locate the lat/lng columns. Without them every row is invalid
        // and the catalog loads empty.
        let headers = match csv_reader.headers() {
            Ok(h) => h.clone(),
            Err(e) => {
                warn!("catalog CSV headers unreadable, loading empty catalog: {e}");
                return Self::new();
            }
        };
        let lat_idx = headers.iter().position(|h| h == LAT_COLUMN);
        let lng_idx = headers.iter().position(|h| h == LNG_COLUMN);

        let mut catalog = Self::new();

        for record in csv_reader.records() {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    warn!("skipping unreadable catalog row: {e}");
                    catalog.invalid_rows.push(Vec::new());
                    continue;
                }
            };

            match parse_row(&record, lat_idx, lng_idx) {
                ParsedRow::Valid(shelter) => catalog.records.push(shelter),
                ParsedRow::Invalid { raw } => catalog.invalid_rows.push(raw),
            }
        }

        if !catalog.invalid_rows.is_empty() {
            warn!(
                "dropped {} invalid catalog row(s), {} record(s) loaded",
                catalog.invalid_rows.len(),
                catalog.records.len()
            );
        }

        catalog
    }

    /// All records in catalog order.
    pub fn records(&self) -> &[ShelterRecord] {
        &self.records
    }

    /// Number of usable records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog holds no usable records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of source rows dropped as unparseable.
    pub fn invalid_row_count(&self) -> usize {
        self.invalid_rows.len()
    }

    /// The raw field values of dropped rows, in source order.
    pub fn invalid_rows(&self) -> &[Vec<String>] {
        &self.invalid_rows
    }

    /// All records within `query.radius_km` of `query.origin`.
    ///
    /// The boundary is inclusive: a shelter exactly at the radius distance
    /// is included. This is a stable filter: results keep catalog order
    /// and repeated calls with the same query return the same sequence.
    /// An empty catalog or an empty result is valid, not an error.
    pub fn within_radius(&self, query: &RadiusQuery) -> Vec<ShelterRecord> {
        self.records
            .iter()
            .filter(|r| distance_km(query.origin, r.coordinate) <= query.radius_km)
            .copied()
            .collect()
    }
}

/// Parse one CSV row into a tagged result.
fn parse_row(
    record: &csv::StringRecord,
    lat_idx: Option<usize>,
    lng_idx: Option<usize>,
) -> ParsedRow {
    let raw = || record.iter().map(str::to_string).collect::<Vec<_>>();

    let (Some(lat_idx), Some(lng_idx)) = (lat_idx, lng_idx) else {
        return ParsedRow::Invalid { raw: raw() };
    };

    let lat = record.get(lat_idx).and_then(|v| v.trim().parse::<f64>().ok());
    let lng = record.get(lng_idx).and_then(|v| v.trim().parse::<f64>().ok());

    match (lat, lng) {
        (Some(lat), Some(lng)) => {
            let coordinate = Coordinate::new(lat, lng);
            if coordinate.is_finite() {
                ParsedRow::Valid(ShelterRecord::new(coordinate))
            } else {
                ParsedRow::Invalid { raw: raw() }
            }
        }
        _ => ParsedRow::Invalid { raw: raw() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_from(csv: &str) -> ShelterCatalog {
        ShelterCatalog::from_csv_reader(csv.as_bytes())
    }

    #[test]
    fn test_load_valid_csv() {
        let catalog = catalog_from("lat,lng\n35.0,139.0\n36.0,140.0\n");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.invalid_row_count(), 0);
        assert_eq!(
            catalog.records()[0].coordinate,
            Coordinate::new(35.0, 139.0)
        );
    }

    #[test]
    fn test_extra_columns_ignored() {
        let catalog = catalog_from("name,lat,lng\nShinjuku,35.69,139.69\n");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records()[0].coordinate, Coordinate::new(35.69, 139.69));
    }

    #[test]
    fn test_invalid_rows_dropped_and_counted() {
        let catalog = catalog_from("lat,lng\n35.0,139.0\nnot-a-number,139.0\n,\n36.0,140.0\n");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.invalid_row_count(), 2);
        assert_eq!(catalog.invalid_rows()[0], vec!["not-a-number", "139.0"]);
    }

    #[test]
    fn test_missing_columns_loads_empty() {
        let catalog = catalog_from("latitude,longitude\n35.0,139.0\n");
        assert!(catalog.is_empty());
        assert_eq!(catalog.invalid_row_count(), 1);
    }

    #[test]
    fn test_non_finite_values_dropped() {
        // "NaN" and "inf" parse as f64 but must never enter the record set.
        let catalog = catalog_from("lat,lng\nNaN,139.0\n35.0,inf\n35.0,139.0\n");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.invalid_row_count(), 2);
    }

    #[test]
    fn test_within_radius_scenario_a() {
        // Shelter at the origin itself: distance 0, always included.
        let catalog = ShelterCatalog::load(vec![ShelterRecord::new(Coordinate::new(35.0, 139.0))]);
        let query = RadiusQuery::new(Coordinate::new(35.0, 139.0), 0.5);
        assert_eq!(catalog.within_radius(&query).len(), 1);
    }

    #[test]
    fn test_within_radius_scenario_b() {
        // ~140 km away, far outside a 0.5 km radius.
        let catalog = ShelterCatalog::load(vec![ShelterRecord::new(Coordinate::new(36.0, 140.0))]);
        let query = RadiusQuery::new(Coordinate::new(35.0, 139.0), 0.5);
        assert!(catalog.within_radius(&query).is_empty());
    }

    #[test]
    fn test_within_radius_empty_catalog() {
        let catalog = ShelterCatalog::new();
        let query = RadiusQuery::new(Coordinate::new(35.0, 139.0), 0.5);
        assert!(catalog.within_radius(&query).is_empty());
    }

    #[test]
    fn test_within_radius_boundary_inclusive() {
        let origin = Coordinate::new(35.0, 139.0);
        let shelter = Coordinate::new(35.003, 139.0);
        let exact = distance_km(origin, shelter);

        let catalog = ShelterCatalog::load(vec![ShelterRecord::new(shelter)]);

        // Radius exactly equal to the distance: included (<=, not <).
        let query = RadiusQuery::new(origin, exact);
        assert_eq!(catalog.within_radius(&query).len(), 1);

        // Any smaller radius excludes it.
        let query = RadiusQuery::new(origin, exact * 0.999);
        assert!(catalog.within_radius(&query).is_empty());
    }

    #[test]
    fn test_within_radius_stable_order() {
        let records = vec![
            ShelterRecord::new(Coordinate::new(35.002, 139.0)),
            ShelterRecord::new(Coordinate::new(35.0005, 139.0)),
            ShelterRecord::new(Coordinate::new(35.001, 139.0)),
        ];
        let catalog = ShelterCatalog::load(records.clone());
        let query = RadiusQuery::new(Coordinate::new(35.0, 139.0), 1.0);

        // Results keep catalog order, not distance order, and repeated
        // calls return the same sequence.
        let first = catalog.within_radius(&query);
        let second = catalog.within_radius(&query);
        assert_eq!(first, records);
        assert_eq!(first, second);
    }

    #[test]
    fn test_garbage_input_loads_empty() {
        let catalog = catalog_from("\u{0}\u{1}\u{2}");
        assert!(catalog.is_empty());
    }
}
