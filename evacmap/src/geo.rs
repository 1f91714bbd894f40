//! Great-circle distance computation on the sphere.
//!
//! This module provides the [`Coordinate`] value type and the haversine
//! [`distance_km`] function used for radius filtering.
//!
//! # Coordinate Convention
//!
//! Coordinates are WGS84 decimal degrees: latitude in `[-90, 90]`,
//! longitude in `[-180, 180]`. Distances are computed on a sphere with a
//! fixed mean Earth radius of 6371 km.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// An immutable latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees (-90 to 90).
    pub lat: f64,
    /// Longitude in decimal degrees (-180 to 180).
    pub lng: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Check that both components are finite numbers.
    ///
    /// Catalog rows with malformed values parse to NaN; the catalog uses
    /// this to keep such rows out of the record set.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Haversine great-circle distance between two coordinates, in kilometers.
///
/// Total for all finite inputs: identical coordinates yield `0.0`, and the
/// result grows monotonically with angular separation. NaN components
/// propagate to a NaN result; sanitizing inputs is the caller's
/// responsibility.
///
/// # Example
///
/// ```
/// use evacmap::geo::{distance_km, Coordinate};
///
/// let tokyo = Coordinate::new(35.6762, 139.6503);
/// let osaka = Coordinate::new(34.6937, 135.5023);
/// let d = distance_km(tokyo, osaka);
/// assert!((d - 392.5).abs() < 1.0);
/// ```
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_identity() {
        let points = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(35.0, 139.0),
            Coordinate::new(-33.8688, 151.2093),
            Coordinate::new(89.9, -179.9),
        ];
        for p in points {
            assert_eq!(distance_km(p, p), 0.0);
        }
    }

    #[test]
    fn test_distance_symmetry() {
        let a = Coordinate::new(35.0, 139.0);
        let b = Coordinate::new(36.0, 140.0);
        assert_eq!(distance_km(a, b), distance_km(b, a));
    }

    #[test]
    fn test_known_distance() {
        // One degree of latitude along a meridian is ~111.19 km on a
        // 6371 km sphere.
        let a = Coordinate::new(35.0, 139.0);
        let b = Coordinate::new(36.0, 139.0);
        let d = distance_km(a, b);
        assert!((d - 111.19).abs() < 0.1, "got {}", d);
    }

    #[test]
    fn test_monotonic_in_separation() {
        let origin = Coordinate::new(35.0, 139.0);
        let near = Coordinate::new(35.001, 139.0);
        let mid = Coordinate::new(35.01, 139.0);
        let far = Coordinate::new(35.1, 139.0);

        let d_near = distance_km(origin, near);
        let d_mid = distance_km(origin, mid);
        let d_far = distance_km(origin, far);

        assert!(d_near < d_mid);
        assert!(d_mid < d_far);
    }

    #[test]
    fn test_nan_propagates() {
        let a = Coordinate::new(f64::NAN, 139.0);
        let b = Coordinate::new(35.0, 139.0);
        assert!(distance_km(a, b).is_nan());
    }

    #[test]
    fn test_is_finite() {
        assert!(Coordinate::new(35.0, 139.0).is_finite());
        assert!(!Coordinate::new(f64::NAN, 139.0).is_finite());
        assert!(!Coordinate::new(35.0, f64::INFINITY).is_finite());
    }
}
