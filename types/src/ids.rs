//! Identifiers for audits and rewards.

use crate::{Timestamp, WalletAddress};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

type Blake2b256 = Blake2b<U32>;

/// Identifier of a submitted audit (`AUDIT-<secs>-<seq>`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AuditId(String);

impl AuditId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Build the id for the `seq`-th audit accepted at `at`.
    pub fn generate(at: Timestamp, seq: u64) -> Self {
        Self(format!("AUDIT-{}-{:04}", at.as_secs(), seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a reward record (`REWARD-<secs>-<digest>`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RewardId(String);

impl RewardId {
    /// Length of the hex digest suffix.
    const DIGEST_CHARS: usize = 12;

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Derive a reward id from its owner, audit, kind tag and a ledger sequence number.
    ///
    /// The sequence number makes ids unique within a ledger even when the same
    /// wallet earns the same kind of reward twice in one second.
    pub fn derive(
        wallet: &WalletAddress,
        audit: &AuditId,
        kind: &str,
        seq: u64,
        at: Timestamp,
    ) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update(wallet.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(audit.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(kind.as_bytes());
        hasher.update(seq.to_le_bytes());
        let digest = hex::encode(hasher.finalize());
        Self(format!(
            "REWARD-{}-{}",
            at.as_secs(),
            &digest[..Self::DIGEST_CHARS]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RewardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_id_format() {
        let id = AuditId::generate(Timestamp::new(1_700_000_000), 7);
        assert_eq!(id.as_str(), "AUDIT-1700000000-0007");
    }

    #[test]
    fn reward_ids_differ_by_sequence() {
        let wallet = WalletAddress::new("user-123");
        let audit = AuditId::new("AUDIT-MOHALI-001");
        let at = Timestamp::new(42);
        let a = RewardId::derive(&wallet, &audit, "verification", 1, at);
        let b = RewardId::derive(&wallet, &audit, "verification", 2, at);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("REWARD-42-"));
        assert_eq!(a.as_str().len(), "REWARD-42-".len() + 12);
    }

    #[test]
    fn reward_id_is_deterministic() {
        let wallet = WalletAddress::new("user-123");
        let audit = AuditId::new("AUDIT-1");
        let at = Timestamp::new(1);
        assert_eq!(
            RewardId::derive(&wallet, &audit, "submission", 0, at),
            RewardId::derive(&wallet, &audit, "submission", 0, at)
        );
    }
}
