use proptest::prelude::*;
use qol_store::Audit;
use qol_types::{AuditId, GeoPoint, Timestamp, WalletAddress};
use qol_verification::{QuorumTracker, VerificationError};

fn fresh_audit() -> Audit {
    Audit {
        id: AuditId::new("AUDIT-prop"),
        location_id: "Mohali-India".into(),
        category_id: "core-social".into(),
        metric_id: "education-quality".into(),
        coordinates: GeoPoint::new(30.7046, 76.7179).unwrap(),
        rating: 3,
        photo: "school.jpg".into(),
        submitter: WalletAddress::new("submitter"),
        submitted_at: Timestamp::new(0),
        verifiers: Vec::new(),
        verification_count: 0,
        is_verified: false,
        version: 1,
    }
}

proptest! {
    /// is_verified flips exactly when the count reaches the quorum and never reverts.
    #[test]
    fn verified_exactly_at_quorum(
        quorum in 1u32..6,
        verifier_ids in proptest::collection::vec(0u8..8, 0..20),
    ) {
        let tracker = QuorumTracker::new(quorum, 200.0);
        let mut audit = fresh_audit();
        let site = audit.coordinates;
        let mut quorum_events = 0;
        let mut was_verified = false;

        for id in verifier_ids {
            let verifier = WalletAddress::new(format!("v{id}"));
            match tracker.apply(&mut audit, &verifier, &site) {
                Ok(outcome) => {
                    if outcome.reached_quorum {
                        quorum_events += 1;
                    }
                    prop_assert_eq!(outcome.verification_number, audit.verification_count);
                }
                Err(VerificationError::DuplicateVerification)
                | Err(VerificationError::AlreadyVerified(_)) => {}
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
            prop_assert_eq!(audit.is_verified, audit.verification_count >= quorum);
            prop_assert!(audit.verification_count <= quorum);
            prop_assert!(!was_verified || audit.is_verified);
            was_verified = audit.is_verified;
        }
        prop_assert!(quorum_events <= 1);
        prop_assert_eq!(quorum_events == 1, audit.is_verified);
    }

    /// No wallet ever appears twice in the verifier list, and the submitter never does.
    #[test]
    fn verifier_set_stays_unique(ids in proptest::collection::vec(0u8..4, 0..12)) {
        let tracker = QuorumTracker::new(10, 200.0);
        let mut audit = fresh_audit();
        let site = audit.coordinates;
        for id in ids {
            let who = if id == 0 {
                WalletAddress::new("submitter")
            } else {
                WalletAddress::new(format!("v{id}"))
            };
            let _ = tracker.apply(&mut audit, &who, &site);
        }
        let mut seen = audit.verifiers.clone();
        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), audit.verifiers.len());
        prop_assert!(!audit.has_verifier(&WalletAddress::new("submitter")));
    }
}
