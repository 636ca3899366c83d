//! Nullable geolocation: a scripted position fix.

use qol_types::GeoPoint;
use qol_verification::{GeolocationError, Geolocator};
use std::sync::Mutex;

/// A geolocator whose fix is set by the test; `None` means "unavailable".
#[derive(Debug, Default)]
pub struct NullGeolocator {
    position: Mutex<Option<GeoPoint>>,
}

impl NullGeolocator {
    pub fn at(position: GeoPoint) -> Self {
        Self {
            position: Mutex::new(Some(position)),
        }
    }

    /// A geolocator that never produces a fix.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn set(&self, position: Option<GeoPoint>) {
        match self.position.lock() {
            Ok(mut guard) => *guard = position,
            Err(poisoned) => *poisoned.into_inner() = position,
        }
    }
}

impl Geolocator for NullGeolocator {
    fn current_position(&self) -> Result<GeoPoint, GeolocationError> {
        let guard = match self.position.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        (*guard).ok_or_else(|| GeolocationError("no position fix".into()))
    }
}
