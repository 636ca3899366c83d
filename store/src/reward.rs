//! Reward records and their storage trait.

use crate::StoreError;
use qol_types::{AuditId, QolAmount, RewardId, Timestamp, WalletAddress};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a reward was paid for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    Submission,
    Verification,
    QualityBonus,
}

impl RewardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submission => "submission",
            Self::Verification => "verification",
            Self::QualityBonus => "quality_bonus",
        }
    }
}

impl fmt::Display for RewardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement status. The only allowed transition is `Pending -> Confirmed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardStatus {
    Pending,
    Confirmed,
}

/// An append-only reward record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub id: RewardId,
    pub wallet: WalletAddress,
    pub audit_id: AuditId,
    pub amount: QolAmount,
    pub kind: RewardKind,
    pub status: RewardStatus,
    pub created_at: Timestamp,
    /// Transfer signature once the payout settled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Reward {
    pub fn is_pending(&self) -> bool {
        self.status == RewardStatus::Pending
    }
}

/// Trait for reward storage operations.
pub trait RewardStore: Send + Sync {
    /// Append a reward. Fails with [`StoreError::Duplicate`] if the id exists.
    fn insert_reward(&self, reward: &Reward) -> Result<(), StoreError>;

    fn get_reward(&self, id: &RewardId) -> Result<Reward, StoreError>;

    /// Move a pending reward to confirmed, recording the settlement signature.
    ///
    /// Confirming an already-confirmed reward fails with
    /// [`StoreError::InvalidTransition`].
    fn confirm_reward(&self, id: &RewardId, signature: Option<String>) -> Result<Reward, StoreError>;

    /// Record the transfer signature of a reward, pending or confirmed.
    ///
    /// Does not change the status.
    fn attach_signature(&self, id: &RewardId, signature: String) -> Result<(), StoreError>;

    /// A wallet's rewards in the order they were created.
    fn rewards_for(&self, wallet: &WalletAddress) -> Result<Vec<Reward>, StoreError>;

    fn pending_rewards_for(&self, wallet: &WalletAddress) -> Result<Vec<Reward>, StoreError> {
        self.rewards_for(wallet)
            .map(|all| all.into_iter().filter(Reward::is_pending).collect())
    }

    fn reward_count(&self) -> Result<u64, StoreError>;

    fn pending_reward_count(&self) -> Result<u64, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&RewardKind::QualityBonus).unwrap();
        assert_eq!(json, "\"quality_bonus\"");
        assert_eq!(RewardKind::QualityBonus.to_string(), "quality_bonus");
    }

    #[test]
    fn unsettled_reward_omits_signature() {
        let reward = Reward {
            id: RewardId::new("REWARD-1-abc"),
            wallet: WalletAddress::new("user-123"),
            audit_id: AuditId::new("AUDIT-1"),
            amount: QolAmount::from_whole(10),
            kind: RewardKind::Submission,
            status: RewardStatus::Pending,
            created_at: Timestamp::new(1),
            signature: None,
        };
        let json = serde_json::to_string(&reward).unwrap();
        assert!(!json.contains("signature"));
        assert!(json.contains("\"amount\":\"10\""));
        assert!(reward.is_pending());
    }
}
