use qol_store::StoreError;
use qol_types::AuditId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum VerificationError {
    #[error("audit {0} is already verified")]
    AlreadyVerified(AuditId),

    #[error("self-verification is not allowed")]
    SelfVerification,

    #[error("duplicate verification: this wallet already verified the audit")]
    DuplicateVerification,

    #[error("not on-site: {distance_m:.0} m from the audit location (limit {radius_m:.0} m)")]
    NotOnSite { distance_m: f64, radius_m: f64 },

    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl VerificationError {
    /// Short machine-readable reason, used as a metrics/event label.
    pub fn reason(&self) -> &'static str {
        match self {
            VerificationError::AlreadyVerified(_) => "already_verified",
            VerificationError::SelfVerification => "self_verification",
            VerificationError::DuplicateVerification => "duplicate_verification",
            VerificationError::NotOnSite { .. } => "not_on_site",
            VerificationError::LocationUnavailable(_) => "location_unavailable",
            VerificationError::Store(_) => "store",
        }
    }
}

/// Failure reported by a [`crate::Geolocator`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct GeolocationError(pub String);

impl From<GeolocationError> for VerificationError {
    fn from(e: GeolocationError) -> Self {
        VerificationError::LocationUnavailable(e.0)
    }
}
