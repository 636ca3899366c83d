//! Reward calculation and the reward ledger.
//!
//! Three events pay out:
//! - **Submission**: a flat reward to the submitter, recorded pending and then
//!   settled through the token transfer. A failed transfer leaves it pending.
//! - **Verification**: base reward to the verifier, with a multiplier for the
//!   first and the quorum-closing verification. Confirmed immediately.
//! - **Quality bonus**: paid once to the submitter when the audit reaches
//!   quorum, scaled by how closely the collected ratings agree.

pub mod calculator;
pub mod error;
pub mod ledger;

pub use calculator::{quality_bonus, rating_std_dev, submission_reward, verification_reward};
pub use error::RewardError;
pub use ledger::{Award, RewardLedger, Settlement, SettlementSummary};
