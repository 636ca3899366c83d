//! In-memory storage backend for the QoL index.
//!
//! Implements every trait from `qol-store` over mutex-guarded hash maps. State
//! lives for the lifetime of the process; there is no persistence.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use qol_store::{
    Audit, AuditStore, BalanceStore, Reward, RewardStatus, RewardStore, StoreError, UserBalance,
};
use qol_types::{AuditId, RewardId, WalletAddress};

/// Rewards in insertion order plus an id index.
#[derive(Default)]
struct RewardTable {
    order: Vec<RewardId>,
    by_id: HashMap<RewardId, Reward>,
}

/// Audit, balance and reward tables behind one handle.
///
/// Thread-safe for use with tokio's multi-threaded runtime. Each table has its
/// own lock; no operation holds more than one.
#[derive(Default)]
pub struct MemoryStore {
    audits: Mutex<HashMap<AuditId, Audit>>,
    balances: Mutex<HashMap<WalletAddress, UserBalance>>,
    rewards: Mutex<RewardTable>,
}

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    m.lock()
        .map_err(|_| StoreError::Backend("store lock poisoned".into()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditStore for MemoryStore {
    fn insert_audit(&self, audit: &Audit) -> Result<(), StoreError> {
        let mut audits = lock(&self.audits)?;
        if audits.contains_key(&audit.id) {
            return Err(StoreError::Duplicate(audit.id.to_string()));
        }
        audits.insert(audit.id.clone(), audit.clone());
        Ok(())
    }

    fn get_audit(&self, id: &AuditId) -> Result<Audit, StoreError> {
        lock(&self.audits)?
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn update_audit(&self, audit: &Audit, expected_version: u64) -> Result<u64, StoreError> {
        let mut audits = lock(&self.audits)?;
        let stored = audits
            .get_mut(&audit.id)
            .ok_or_else(|| StoreError::NotFound(audit.id.to_string()))?;
        if stored.version != expected_version {
            return Err(StoreError::Conflict {
                key: audit.id.to_string(),
                expected: expected_version,
                found: stored.version,
            });
        }
        let mut next = audit.clone();
        next.version = expected_version + 1;
        *stored = next;
        Ok(expected_version + 1)
    }

    fn iter_audits(&self) -> Result<Vec<Audit>, StoreError> {
        let mut all: Vec<Audit> = lock(&self.audits)?.values().cloned().collect();
        all.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(all)
    }

    fn audit_count(&self) -> Result<u64, StoreError> {
        Ok(lock(&self.audits)?.len() as u64)
    }
}

impl BalanceStore for MemoryStore {
    fn get_balance(&self, wallet: &WalletAddress) -> Result<Option<UserBalance>, StoreError> {
        Ok(lock(&self.balances)?.get(wallet).cloned())
    }

    fn put_balance(&self, balance: &UserBalance, expected_version: u64) -> Result<u64, StoreError> {
        let mut balances = lock(&self.balances)?;
        let found = balances.get(&balance.wallet).map_or(0, |b| b.version);
        if found != expected_version {
            return Err(StoreError::Conflict {
                key: balance.wallet.to_string(),
                expected: expected_version,
                found,
            });
        }
        let mut next = balance.clone();
        next.version = expected_version + 1;
        balances.insert(balance.wallet.clone(), next);
        Ok(expected_version + 1)
    }

    fn iter_balances(&self) -> Result<Vec<UserBalance>, StoreError> {
        Ok(lock(&self.balances)?.values().cloned().collect())
    }
}

impl RewardStore for MemoryStore {
    fn insert_reward(&self, reward: &Reward) -> Result<(), StoreError> {
        let mut table = lock(&self.rewards)?;
        if table.by_id.contains_key(&reward.id) {
            return Err(StoreError::Duplicate(reward.id.to_string()));
        }
        table.order.push(reward.id.clone());
        table.by_id.insert(reward.id.clone(), reward.clone());
        Ok(())
    }

    fn get_reward(&self, id: &RewardId) -> Result<Reward, StoreError> {
        lock(&self.rewards)?
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn confirm_reward(&self, id: &RewardId, signature: Option<String>) -> Result<Reward, StoreError> {
        let mut table = lock(&self.rewards)?;
        let reward = table
            .by_id
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if reward.status != RewardStatus::Pending {
            return Err(StoreError::InvalidTransition {
                key: id.to_string(),
                reason: "reward is already confirmed".into(),
            });
        }
        reward.status = RewardStatus::Confirmed;
        reward.signature = signature;
        tracing::trace!(reward = %id, "reward confirmed");
        Ok(reward.clone())
    }

    fn attach_signature(&self, id: &RewardId, signature: String) -> Result<(), StoreError> {
        let mut table = lock(&self.rewards)?;
        let reward = table
            .by_id
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        reward.signature = Some(signature);
        Ok(())
    }

    fn rewards_for(&self, wallet: &WalletAddress) -> Result<Vec<Reward>, StoreError> {
        let table = lock(&self.rewards)?;
        Ok(table
            .order
            .iter()
            .filter_map(|id| table.by_id.get(id))
            .filter(|r| &r.wallet == wallet)
            .cloned()
            .collect())
    }

    fn reward_count(&self) -> Result<u64, StoreError> {
        Ok(lock(&self.rewards)?.order.len() as u64)
    }

    fn pending_reward_count(&self) -> Result<u64, StoreError> {
        Ok(lock(&self.rewards)?
            .by_id
            .values()
            .filter(|r| r.is_pending())
            .count() as u64)
    }
}
