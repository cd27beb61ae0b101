//! Geographic coordinates and great-circle distance.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Mean Earth radius in meters (IUGG).
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_phi = (other.lat - self.lat).to_radians();
        let d_lambda = (other.lng - self.lng).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        // Clamp guards against a > 1.0 from rounding on antipodal points.
        let c = 2.0 * a.sqrt().min(1.0).asin();
        EARTH_RADIUS_METERS * c
    }

    /// Returns this point shifted by the given offsets in degrees.
    pub fn offset(&self, d_lat: f64, d_lng: f64) -> Self {
        Self::new(self.lat + d_lat, self.lng + d_lng)
    }

    /// Clamps latitude to `[-90, 90]` and wraps longitude into `[-180, 180)`.
    pub fn normalized(&self) -> Self {
        let mut lng = self.lng;
        if !(-180.0..180.0).contains(&lng) {
            lng = (lng + 180.0).rem_euclid(360.0) - 180.0;
            if lng >= 180.0 {
                lng -= 360.0;
            }
        }
        Self::new(self.lat.clamp(-90.0, 90.0), lng)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = Coordinate::new(55.751244, 37.618423);
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let expected = EARTH_RADIUS_METERS * 1.0_f64.to_radians();
        assert!((a.distance_to(&b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_normalized_wraps_and_clamps() {
        let p = Coordinate::new(90.004, 180.004).normalized();
        assert_eq!(p.lat, 90.0);
        assert!((p.lng + 179.996).abs() < 1e-9, "lng {}", p.lng);

        let p = Coordinate::new(-91.0, -180.5).normalized();
        assert_eq!(p.lat, -90.0);
        assert!((p.lng - 179.5).abs() < 1e-9, "lng {}", p.lng);

        let inside = Coordinate::new(55.751244, 37.618423);
        assert_eq!(inside.normalized(), inside);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinate::new(55.75, 37.61);
        let b = Coordinate::new(55.76, 37.63);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-9);
        // Roughly 1.7 km across central Moscow.
        let d = a.distance_to(&b);
        assert!(d > 1_500.0 && d < 2_000.0, "unexpected distance {d}");
    }
}
