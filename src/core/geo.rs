use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A geographic coordinate in degrees.
///
/// Values are not validated: latitudes outside `[-90, 90]` and unbounded
/// longitudes flow through the trigonometry unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoCoordinate {
    /// Creates a new coordinate. Note the GeoJSON argument order: longitude first.
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Great-circle distance to another coordinate, in radians.
    pub fn angular_distance(&self, other: &GeoCoordinate) -> f64 {
        angular_distance(*self, *other)
    }

    /// Returns the same point with its longitude wrapped to `[-180, 180)`.
    pub fn wrapped(&self) -> Self {
        Self::new(wrap_longitude(self.longitude), self.latitude)
    }

    /// The antipodal point.
    pub fn antipode(&self) -> Self {
        Self::new(wrap_longitude(self.longitude + 180.0), -self.latitude)
    }
}

impl Default for GeoCoordinate {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<[f64; 2]> for GeoCoordinate {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<geo_types::Coord<f64>> for GeoCoordinate {
    fn from(coord: geo_types::Coord<f64>) -> Self {
        Self::new(coord.x, coord.y)
    }
}

/// A point in pixel space, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &ScreenPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for ScreenPoint {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Wraps a longitude in degrees to `[-180, 180)`.
pub fn wrap_longitude(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

/// Great-circle distance between two coordinates, in radians, in `[0, π]`.
///
/// Uses the atan2 (Vincenty) form of the central angle, which stays
/// well-conditioned both for nearby and for nearly antipodal points where
/// the law of cosines and haversine respectively lose precision. Arguments
/// are put in a canonical order first so the result is bit-for-bit
/// symmetric.
pub fn angular_distance(a: GeoCoordinate, b: GeoCoordinate) -> f64 {
    let (a, b) = match canonical_order(&a, &b) {
        Ordering::Greater => (b, a),
        _ => (a, b),
    };

    let (sin_phi1, cos_phi1) = a.latitude.to_radians().sin_cos();
    let (sin_phi2, cos_phi2) = b.latitude.to_radians().sin_cos();
    let (sin_dl, cos_dl) = (b.longitude - a.longitude).to_radians().sin_cos();

    let east = cos_phi2 * sin_dl;
    let north = cos_phi1 * sin_phi2 - sin_phi1 * cos_phi2 * cos_dl;
    let along = sin_phi1 * sin_phi2 + cos_phi1 * cos_phi2 * cos_dl;

    (east * east + north * north).sqrt().atan2(along)
}

fn canonical_order(a: &GeoCoordinate, b: &GeoCoordinate) -> Ordering {
    a.longitude
        .total_cmp(&b.longitude)
        .then(a.latitude.total_cmp(&b.latitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_coordinate_creation() {
        let coord = GeoCoordinate::new(-74.0060, 40.7128);
        assert_eq!(coord.longitude, -74.0060);
        assert_eq!(coord.latitude, 40.7128);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for coord in [
            GeoCoordinate::new(0.0, 0.0),
            GeoCoordinate::new(-74.0060, 40.7128),
            GeoCoordinate::new(179.9, -89.5),
            GeoCoordinate::new(540.0, 12.0),
        ] {
            assert_eq!(angular_distance(coord, coord), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let nyc = GeoCoordinate::new(-74.0060, 40.7128);
        let la = GeoCoordinate::new(-118.2437, 34.0522);
        let tokyo = GeoCoordinate::new(139.6503, 35.6762);

        assert_eq!(angular_distance(nyc, la), angular_distance(la, nyc));
        assert_eq!(angular_distance(la, tokyo), angular_distance(tokyo, la));
    }

    #[test]
    fn test_known_distance() {
        let nyc = GeoCoordinate::new(-74.0060, 40.7128);
        let la = GeoCoordinate::new(-118.2437, 34.0522);
        // ~3936 km on a 6371 km sphere
        let distance_km = nyc.angular_distance(&la) * 6371.0;
        assert!((distance_km - 3936.0).abs() < 10.0);
    }

    #[test]
    fn test_antipodal_distance_is_pi() {
        let point = GeoCoordinate::new(0.0, 25.0);
        let distance = angular_distance(point, point.antipode());
        assert!((distance - PI).abs() < 1e-12);
        assert!(distance <= PI);

        let pole = GeoCoordinate::new(10.0, 90.0);
        let other_pole = GeoCoordinate::new(10.0, -90.0);
        assert!((angular_distance(pole, other_pole) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_distance_near_zero_is_stable() {
        let a = GeoCoordinate::new(10.0, 10.0);
        let b = GeoCoordinate::new(10.0, 10.0 + 1e-9);
        let distance = angular_distance(a, b);
        assert!(distance > 0.0);
        assert!((distance - 1e-9_f64.to_radians()).abs() < 1e-15);
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(0.0), 0.0);
        assert_eq!(wrap_longitude(190.0), -170.0);
        assert_eq!(wrap_longitude(-190.0), 170.0);
        assert_eq!(wrap_longitude(180.0), -180.0);
        assert_eq!(wrap_longitude(720.0 + 45.0), 45.0);
    }

    #[test]
    fn test_screen_point_distance() {
        let a = ScreenPoint::new(3.0, 4.0);
        let b = ScreenPoint::new(0.0, 0.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }
}
