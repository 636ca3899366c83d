//! Verification quorum state machine.

use crate::proximity::check_on_site;
use crate::VerificationError;
use qol_store::Audit;
use qol_types::{GeoPoint, RewardParams, WalletAddress};
use serde::{Deserialize, Serialize};

/// Where an audit stands relative to the quorum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditPhase {
    /// Collecting verifications; `count` is below the quorum.
    Unverified { count: u32 },
    /// Quorum reached. Terminal.
    Verified,
}

/// Result of an accepted verification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    /// 1-based position of this verification for the audit.
    pub verification_number: u32,
    /// True only for the verification that brought the count to the quorum.
    pub reached_quorum: bool,
    pub distance_m: f64,
}

/// Applies the verification guards and transitions for audits.
#[derive(Clone, Debug, PartialEq)]
pub struct QuorumTracker {
    quorum: u32,
    radius_m: f64,
}

impl QuorumTracker {
    pub fn new(quorum: u32, radius_m: f64) -> Self {
        Self { quorum, radius_m }
    }

    pub fn from_params(params: &RewardParams) -> Self {
        Self::new(params.quorum, params.on_site_radius_m)
    }

    pub fn quorum(&self) -> u32 {
        self.quorum
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn phase(&self, audit: &Audit) -> AuditPhase {
        if audit.is_verified {
            AuditPhase::Verified
        } else {
            AuditPhase::Unverified {
                count: audit.verification_count,
            }
        }
    }

    /// Run every guard without mutating the audit. Returns the verifier's distance.
    pub fn check(
        &self,
        audit: &Audit,
        verifier: &WalletAddress,
        position: &GeoPoint,
    ) -> Result<f64, VerificationError> {
        if audit.is_verified {
            return Err(VerificationError::AlreadyVerified(audit.id.clone()));
        }
        if &audit.submitter == verifier {
            return Err(VerificationError::SelfVerification);
        }
        if audit.has_verifier(verifier) {
            return Err(VerificationError::DuplicateVerification);
        }
        check_on_site(&audit.coordinates, position, self.radius_m)
    }

    /// Check the guards, then record the verification on `audit`.
    ///
    /// The caller persists the mutated audit.
    pub fn apply(
        &self,
        audit: &mut Audit,
        verifier: &WalletAddress,
        position: &GeoPoint,
    ) -> Result<VerificationOutcome, VerificationError> {
        let distance_m = self.check(audit, verifier, position)?;

        audit.verifiers.push(verifier.clone());
        audit.verification_count += 1;
        let reached_quorum = audit.verification_count == self.quorum;
        if audit.verification_count >= self.quorum {
            audit.is_verified = true;
        }

        tracing::debug!(
            audit = %audit.id,
            verifier = %verifier,
            count = audit.verification_count,
            quorum = self.quorum,
            distance_m,
            "verification recorded"
        );

        Ok(VerificationOutcome {
            verification_number: audit.verification_count,
            reached_quorum,
            distance_m,
        })
    }

    /// Whether `viewer` may still act on `audit` from the verification queue.
    pub fn is_queued_for(&self, audit: &Audit, viewer: &WalletAddress) -> bool {
        !audit.is_verified && &audit.submitter != viewer && !audit.has_verifier(viewer)
    }

    /// The verification queue for `viewer`: unverified audits submitted by
    /// someone else and not yet verified by the viewer, order preserved.
    pub fn queue_for(&self, audits: Vec<Audit>, viewer: &WalletAddress) -> Vec<Audit> {
        audits
            .into_iter()
            .filter(|a| self.is_queued_for(a, viewer))
            .collect()
    }
}

impl Default for QuorumTracker {
    fn default() -> Self {
        Self::from_params(&RewardParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qol_types::{AuditId, Timestamp};

    fn site() -> GeoPoint {
        GeoPoint::new(30.7046, 76.7179).unwrap()
    }

    fn audit() -> Audit {
        Audit {
            id: AuditId::new("AUDIT-1"),
            location_id: "Mohali-India".into(),
            category_id: "mobility-infrastructure".into(),
            metric_id: "road-conditions".into(),
            coordinates: site(),
            rating: 3,
            photo: "road.jpg".into(),
            submitter: WalletAddress::new("submitter"),
            submitted_at: Timestamp::new(1_000),
            verifiers: Vec::new(),
            verification_count: 0,
            is_verified: false,
            version: 1,
        }
    }

    fn wallet(name: &str) -> WalletAddress {
        WalletAddress::new(name)
    }

    #[test]
    fn three_verifications_reach_quorum() {
        let tracker = QuorumTracker::default();
        let mut a = audit();

        let first = tracker.apply(&mut a, &wallet("v1"), &site()).unwrap();
        assert_eq!(first.verification_number, 1);
        assert!(!first.reached_quorum);
        assert_eq!(tracker.phase(&a), AuditPhase::Unverified { count: 1 });

        let second = tracker.apply(&mut a, &wallet("v2"), &site()).unwrap();
        assert_eq!(second.verification_number, 2);
        assert!(!a.is_verified);

        let third = tracker.apply(&mut a, &wallet("v3"), &site()).unwrap();
        assert_eq!(third.verification_number, 3);
        assert!(third.reached_quorum);
        assert!(a.is_verified);
        assert_eq!(tracker.phase(&a), AuditPhase::Verified);
        assert_eq!(a.verifiers, vec![wallet("v1"), wallet("v2"), wallet("v3")]);
    }

    #[test]
    fn self_verification_is_rejected() {
        let tracker = QuorumTracker::default();
        let mut a = audit();
        let err = tracker.apply(&mut a, &wallet("submitter"), &site()).unwrap_err();
        assert_eq!(err, VerificationError::SelfVerification);
        assert_eq!(a.verification_count, 0);
    }

    #[test]
    fn duplicate_verification_is_rejected() {
        let tracker = QuorumTracker::default();
        let mut a = audit();
        tracker.apply(&mut a, &wallet("v1"), &site()).unwrap();
        let err = tracker.apply(&mut a, &wallet("v1"), &site()).unwrap_err();
        assert_eq!(err, VerificationError::DuplicateVerification);
        assert_eq!(a.verification_count, 1);
    }

    #[test]
    fn off_site_verification_is_rejected() {
        let tracker = QuorumTracker::default();
        let mut a = audit();
        let far = GeoPoint::new(30.7046 + 0.0018, 76.7179).unwrap();
        let err = tracker.apply(&mut a, &wallet("v1"), &far).unwrap_err();
        assert_eq!(err.reason(), "not_on_site");
        assert!(a.verifiers.is_empty());
    }

    #[test]
    fn verified_audit_rejects_before_other_checks() {
        let tracker = QuorumTracker::default();
        let mut a = audit();
        a.is_verified = true;
        a.verification_count = 3;
        // Even the submitter gets "already verified" rather than "self-verification".
        let err = tracker.check(&a, &wallet("submitter"), &site()).unwrap_err();
        assert_eq!(err, VerificationError::AlreadyVerified(AuditId::new("AUDIT-1")));
    }

    #[test]
    fn self_check_precedes_proximity() {
        let tracker = QuorumTracker::default();
        let far = GeoPoint::new(0.0, 0.0).unwrap();
        let err = tracker.check(&audit(), &wallet("submitter"), &far).unwrap_err();
        assert_eq!(err, VerificationError::SelfVerification);
    }

    #[test]
    fn queue_excludes_own_verified_and_already_verified() {
        let tracker = QuorumTracker::default();
        let viewer = wallet("viewer");

        let open = audit();
        let mut mine = audit();
        mine.id = AuditId::new("AUDIT-2");
        mine.submitter = viewer.clone();
        let mut seen = audit();
        seen.id = AuditId::new("AUDIT-3");
        seen.verifiers.push(viewer.clone());
        seen.verification_count = 1;
        let mut done = audit();
        done.id = AuditId::new("AUDIT-4");
        done.is_verified = true;

        let queue = tracker.queue_for(vec![open, mine, seen, done], &viewer);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, AuditId::new("AUDIT-1"));
    }

    #[test]
    fn quorum_of_one() {
        let tracker = QuorumTracker::new(1, 200.0);
        let mut a = audit();
        let outcome = tracker.apply(&mut a, &wallet("v1"), &site()).unwrap();
        assert!(outcome.reached_quorum);
        assert!(a.is_verified);
    }
}
