//! Audit verification.
//!
//! An audit starts unverified and collects verifications from other wallets.
//! Each verification must pass three guards, in order:
//! 1. the verifier is not the submitter,
//! 2. the verifier has not already verified this audit,
//! 3. the verifier is physically on-site (haversine distance within the radius).
//!
//! Once the verification count reaches the quorum the audit is verified and
//! accepts nothing further. Reaching the quorum is reported exactly once so the
//! caller can pay the submitter's quality bonus.

pub mod error;
pub mod proximity;
pub mod quorum;

pub use error::{GeolocationError, VerificationError};
pub use proximity::{check_on_site, FixedPosition, Geolocator};
pub use quorum::{AuditPhase, QuorumTracker, VerificationOutcome};
