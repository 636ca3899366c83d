//! Geographic coordinates and great-circle distance.

use crate::QolError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in meters used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 position in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, QolError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(QolError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Haversine great-circle distance to `other`, in meters.
    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mohali() -> GeoPoint {
        GeoPoint::new(30.7046, 76.7179).unwrap()
    }

    #[test]
    fn zero_distance_to_self() {
        assert_eq!(mohali().distance_meters(&mohali()), 0.0);
    }

    #[test]
    fn latitude_step_of_0_0018_degrees_is_just_over_200m() {
        let a = mohali();
        let b = GeoPoint::new(a.latitude + 0.0018, a.longitude).unwrap();
        let d = a.distance_meters(&b);
        assert!(d > 200.0 && d < 200.3, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = mohali();
        let b = GeoPoint::new(30.7101, 76.7205).unwrap();
        let ab = a.distance_meters(&b);
        let ba = b.distance_meters(&a);
        assert!((ab - ba).abs() < 1e-9);
        assert!(ab > 600.0 && ab < 700.0, "got {ab}");
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -181.0).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }
}
