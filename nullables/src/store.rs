//! Nullable store: the in-memory backend with injectable write faults.

use qol_store::{
    Audit, AuditStore, BalanceStore, Reward, RewardStore, StoreError, UserBalance,
};
use qol_store_memory::MemoryStore;
use qol_types::{AuditId, RewardId, WalletAddress};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Default)]
struct Faults {
    /// Stall the next balance write for this long before applying it.
    stall_next_balance_write: Option<Duration>,
    fail_balance_writes: HashSet<WalletAddress>,
    fail_confirmations: bool,
}

/// A [`MemoryStore`] whose writes can be delayed or made to fail.
///
/// Stalls block the calling thread, so use a multi-threaded runtime when
/// another task has to run during the stall.
#[derive(Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    faults: Mutex<Faults>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stall_next_balance_write(&self, delay: Duration) {
        self.faults().stall_next_balance_write = Some(delay);
    }

    /// Every balance write for `wallet` fails with a backend error.
    pub fn fail_balance_writes_for(&self, wallet: &WalletAddress) {
        self.faults().fail_balance_writes.insert(wallet.clone());
    }

    pub fn fail_confirmations(&self, fail: bool) {
        self.faults().fail_confirmations = fail;
    }

    /// Drop every injected fault.
    pub fn heal(&self) {
        *self.faults() = Faults::default();
    }

    fn faults(&self) -> MutexGuard<'_, Faults> {
        match self.faults.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl AuditStore for FaultyStore {
    fn insert_audit(&self, audit: &Audit) -> Result<(), StoreError> {
        self.inner.insert_audit(audit)
    }

    fn get_audit(&self, id: &AuditId) -> Result<Audit, StoreError> {
        self.inner.get_audit(id)
    }

    fn update_audit(&self, audit: &Audit, expected_version: u64) -> Result<u64, StoreError> {
        self.inner.update_audit(audit, expected_version)
    }

    fn iter_audits(&self) -> Result<Vec<Audit>, StoreError> {
        self.inner.iter_audits()
    }
}

impl BalanceStore for FaultyStore {
    fn get_balance(&self, wallet: &WalletAddress) -> Result<Option<UserBalance>, StoreError> {
        self.inner.get_balance(wallet)
    }

    fn put_balance(&self, balance: &UserBalance, expected_version: u64) -> Result<u64, StoreError> {
        let (stall, fail) = {
            let mut faults = self.faults();
            (
                faults.stall_next_balance_write.take(),
                faults.fail_balance_writes.contains(&balance.wallet),
            )
        };
        if let Some(delay) = stall {
            std::thread::sleep(delay);
        }
        if fail {
            return Err(StoreError::Backend(format!(
                "injected balance write failure for {}",
                balance.wallet
            )));
        }
        self.inner.put_balance(balance, expected_version)
    }

    fn iter_balances(&self) -> Result<Vec<UserBalance>, StoreError> {
        self.inner.iter_balances()
    }
}

impl RewardStore for FaultyStore {
    fn insert_reward(&self, reward: &Reward) -> Result<(), StoreError> {
        self.inner.insert_reward(reward)
    }

    fn get_reward(&self, id: &RewardId) -> Result<Reward, StoreError> {
        self.inner.get_reward(id)
    }

    fn confirm_reward(&self, id: &RewardId, signature: Option<String>) -> Result<Reward, StoreError> {
        if self.faults().fail_confirmations {
            return Err(StoreError::Backend("injected confirmation failure".into()));
        }
        self.inner.confirm_reward(id, signature)
    }

    fn attach_signature(&self, id: &RewardId, signature: String) -> Result<(), StoreError> {
        self.inner.attach_signature(id, signature)
    }

    fn rewards_for(&self, wallet: &WalletAddress) -> Result<Vec<Reward>, StoreError> {
        self.inner.rewards_for(wallet)
    }

    fn reward_count(&self) -> Result<u64, StoreError> {
        self.inner.reward_count()
    }

    fn pending_reward_count(&self) -> Result<u64, StoreError> {
        self.inner.pending_reward_count()
    }
}
