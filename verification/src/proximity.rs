//! On-site proximity check.

use crate::{GeolocationError, VerificationError};
use qol_types::GeoPoint;

/// Supplies the verifier's current position.
pub trait Geolocator: Send + Sync {
    fn current_position(&self) -> Result<GeoPoint, GeolocationError>;
}

/// A geolocator that always reports the same point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedPosition(pub GeoPoint);

impl Geolocator for FixedPosition {
    fn current_position(&self) -> Result<GeoPoint, GeolocationError> {
        Ok(self.0)
    }
}

/// Ensure `verifier_at` lies within `radius_m` of `audit_at` (inclusive).
///
/// Returns the measured distance in meters.
pub fn check_on_site(
    audit_at: &GeoPoint,
    verifier_at: &GeoPoint,
    radius_m: f64,
) -> Result<f64, VerificationError> {
    let distance_m = audit_at.distance_meters(verifier_at);
    if distance_m <= radius_m {
        Ok(distance_m)
    } else {
        Err(VerificationError::NotOnSite {
            distance_m,
            radius_m,
        })
    }
}
