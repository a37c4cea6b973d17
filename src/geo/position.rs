//! Geodesic agent positions.
//!
//! One canonical position representation (latitude/longitude/altitude)
//! together with the planar-meter arithmetic the rest of the engine works in.

use serde::{Deserialize, Serialize};

/// Linear scale between degrees and planar meters: 1 degree ≈ 111 319.9 m.
pub const METERS_PER_DEGREE: f64 = 111_319.9;

/// Mean Earth radius for great-circle distances.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Converts degrees to planar meters.
pub fn deg_to_m(deg: f64) -> f64 {
    deg * METERS_PER_DEGREE
}

/// Converts planar meters to degrees.
pub fn m_to_deg(m: f64) -> f64 {
    m / METERS_PER_DEGREE
}

/// A single telemetry fix: geodesic coordinates plus absolute altitude.
///
/// Created on every position read and passed around by value. Altitude is
/// carried but never enters 2D distance or patch indexing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub absolute_altitude_m: f64,
}

impl Position {
    pub fn new(latitude_deg: f64, longitude_deg: f64, absolute_altitude_m: f64) -> Self {
        Position {
            latitude_deg,
            longitude_deg,
            absolute_altitude_m,
        }
    }

    /// Planar meter offsets of this position, (latitude axis, longitude axis).
    pub fn meters(&self) -> (f64, f64) {
        (deg_to_m(self.latitude_deg), deg_to_m(self.longitude_deg))
    }

    /// Returns this position displaced by the given meter offsets.
    pub fn increment_m(&self, lat_increment_m: f64, lon_increment_m: f64, alt_increment_m: f64) -> Self {
        Position {
            latitude_deg: self.latitude_deg + m_to_deg(lat_increment_m),
            longitude_deg: self.longitude_deg + m_to_deg(lon_increment_m),
            absolute_altitude_m: self.absolute_altitude_m + alt_increment_m,
        }
    }

    /// Haversine great-circle distance in meters, ignoring altitude.
    ///
    /// Symmetric, and zero exactly when both fixes share latitude and
    /// longitude.
    pub fn distance_2d_m(&self, other: &Position) -> f64 {
        let lat1 = self.latitude_deg.to_radians();
        let lat2 = other.latitude_deg.to_radians();
        let dlat = (other.latitude_deg - self.latitude_deg).to_radians();
        let dlon = (other.longitude_deg - self.longitude_deg).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }

    /// Heading in degrees a vehicle should face when flying here from `prev`,
    /// normalized to the flight-stack yaw convention.
    pub fn goto_yaw_deg(&self, prev: &Position) -> f64 {
        let d_lat = self.latitude_deg - prev.latitude_deg;
        let d_lon = self.longitude_deg - prev.longitude_deg;
        let yaw = d_lat.atan2(d_lon).to_degrees();
        (yaw + 360.0) % 360.0 - 90.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_meter_conversions_roundtrip() {
        let m = deg_to_m(0.5);
        assert!((m - 55_659.95).abs() < 1e-6);
        assert!((m_to_deg(m) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = Position::new(47.397742, 8.545594, 488.0);
        assert_eq!(p.distance_2d_m(&p), 0.0);
    }

    #[test]
    fn distance_ignores_altitude() {
        let a = Position::new(47.397742, 8.545594, 488.0);
        let b = Position::new(47.397742, 8.545594, 530.0);
        assert_eq!(a.distance_2d_m(&b), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Position::new(47.397742, 8.545594, 488.0);
        let b = a.increment_m(120.0, -35.0, 0.0);
        let ab = a.distance_2d_m(&b);
        let ba = b.distance_2d_m(&a);
        assert!((ab - ba).abs() < 1e-9);
        assert!(ab > 0.0);
    }

    #[test]
    fn increment_displaces_by_roughly_the_requested_meters() {
        let a = Position::new(47.0, 8.0, 488.0);
        let b = a.increment_m(100.0, 0.0, 10.0);
        // the linear scale and the haversine agree to well under a meter
        // at these displacements
        assert!((a.distance_2d_m(&b) - 100.0).abs() < 1.0);
        assert!((b.absolute_altitude_m - 498.0).abs() < 1e-9);
    }

    #[test]
    fn yaw_follows_the_bearing_convention() {
        let prev = Position::new(47.0, 8.0, 488.0);
        // due north: atan2(+, 0) = 90° -> normalized 0°
        let north = prev.increment_m(10.0, 0.0, 0.0);
        assert!((north.goto_yaw_deg(&prev) - 0.0).abs() < 1e-9);
        // due east: atan2(0, +) = 0° -> normalized -90°
        let east = prev.increment_m(0.0, 10.0, 0.0);
        assert!((east.goto_yaw_deg(&prev) - (-90.0)).abs() < 1e-9);
    }
}
