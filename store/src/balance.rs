//! Per-wallet reward balances.

use crate::StoreError;
use qol_types::{QolAmount, WalletAddress};
use serde::{Deserialize, Serialize};

/// A wallet's reward totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalance {
    pub wallet: WalletAddress,
    /// Settled, spendable tokens.
    pub qol_tokens: QolAmount,
    /// Awarded but not yet settled.
    pub pending_rewards: QolAmount,
    /// Sum of every confirmed reward.
    pub total_earned: QolAmount,
    pub audit_count: u32,
    pub verification_count: u32,
    /// Optimistic-concurrency counter; 0 means "never stored".
    #[serde(default)]
    pub version: u64,
}

impl UserBalance {
    /// An all-zero balance, as seen on a wallet's first interaction.
    pub fn new(wallet: WalletAddress) -> Self {
        Self {
            wallet,
            qol_tokens: QolAmount::ZERO,
            pending_rewards: QolAmount::ZERO,
            total_earned: QolAmount::ZERO,
            audit_count: 0,
            verification_count: 0,
            version: 0,
        }
    }
}

/// Trait for balance storage operations.
pub trait BalanceStore: Send + Sync {
    fn get_balance(&self, wallet: &WalletAddress) -> Result<Option<UserBalance>, StoreError>;

    /// Write a balance if its stored version equals `expected_version`.
    ///
    /// `expected_version == 0` inserts a balance that must not exist yet.
    /// Returns the new version.
    fn put_balance(&self, balance: &UserBalance, expected_version: u64) -> Result<u64, StoreError>;

    fn iter_balances(&self) -> Result<Vec<UserBalance>, StoreError>;
}
