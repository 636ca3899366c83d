//! Audit records and their storage trait.

use crate::StoreError;
use qol_types::{AuditId, GeoPoint, Timestamp, WalletAddress};
use serde::{Deserialize, Serialize};

/// A photo-backed observation of one metric at one location.
///
/// Created on submission, mutated by each accepted verification, never deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Audit {
    pub id: AuditId,
    pub location_id: String,
    pub category_id: String,
    pub metric_id: String,
    /// Where the observation was made; verifiers must be on-site relative to this.
    pub coordinates: GeoPoint,
    /// Submitter's rating on the 1-5 scale.
    pub rating: u8,
    /// Reference to the uploaded photo.
    pub photo: String,
    pub submitter: WalletAddress,
    pub submitted_at: Timestamp,
    /// Wallets that verified this audit, in verification order.
    pub verifiers: Vec<WalletAddress>,
    pub verification_count: u32,
    pub is_verified: bool,
    /// Optimistic-concurrency counter, bumped by the store on every update.
    #[serde(default)]
    pub version: u64,
}

impl Audit {
    pub fn has_verifier(&self, wallet: &WalletAddress) -> bool {
        self.verifiers.iter().any(|v| v == wallet)
    }

    /// Ratings collected for the quality bonus.
    ///
    /// Only the submitter's own rating is collected today; verifiers confirm
    /// presence but do not rate.
    pub fn ratings(&self) -> Vec<u8> {
        vec![self.rating]
    }
}

/// Trait for audit storage operations.
pub trait AuditStore: Send + Sync {
    /// Insert a new audit. Fails with [`StoreError::Duplicate`] if the id exists.
    fn insert_audit(&self, audit: &Audit) -> Result<(), StoreError>;

    fn get_audit(&self, id: &AuditId) -> Result<Audit, StoreError>;

    /// Replace an audit if its stored version still equals `expected_version`.
    ///
    /// Returns the new version on success and [`StoreError::Conflict`] if another
    /// writer got there first.
    fn update_audit(&self, audit: &Audit, expected_version: u64) -> Result<u64, StoreError>;

    /// All audits ordered by submission time, then id.
    fn iter_audits(&self) -> Result<Vec<Audit>, StoreError>;

    fn audit_count(&self) -> Result<u64, StoreError> {
        self.iter_audits().map(|v| v.len() as u64)
    }

    /// Audits that have not yet reached quorum.
    fn iter_unverified(&self) -> Result<Vec<Audit>, StoreError> {
        self.iter_audits()
            .map(|all| all.into_iter().filter(|a| !a.is_verified).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratings_hold_only_the_submitters_rating() {
        let audit = Audit {
            id: AuditId::new("AUDIT-1"),
            location_id: "Mohali-India".into(),
            category_id: "mobility-infrastructure".into(),
            metric_id: "road-conditions".into(),
            coordinates: GeoPoint::new(30.7046, 76.7179).unwrap(),
            rating: 4,
            photo: "pothole.jpg".into(),
            submitter: WalletAddress::new("user-123"),
            submitted_at: Timestamp::new(0),
            verifiers: vec![WalletAddress::new("v1")],
            verification_count: 1,
            is_verified: false,
            version: 0,
        };
        assert_eq!(audit.ratings(), vec![4]);
        assert!(audit.has_verifier(&WalletAddress::new("v1")));
        assert!(!audit.has_verifier(&WalletAddress::new("user-123")));
    }
}
