//! The reward ledger: append-only reward records plus per-wallet balances.

use crate::calculator::{quality_bonus, submission_reward, verification_reward};
use crate::RewardError;
use qol_store::{
    BalanceStore, Reward, RewardKind, RewardStatus, RewardStore, StoreError, UserBalance,
};
use qol_transfer::{TokenTransfer, TransferError, TreasuryRef};
use qol_types::{AuditId, Clock, QolAmount, RewardId, RewardParams, WalletAddress};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Upper bound on compare-and-swap attempts for one balance update.
pub const MAX_CAS_ATTEMPTS: u32 = 16;

/// What happened when a payout was pushed through the token transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settlement {
    Settled { signature: String },
    Failed(TransferError),
    /// No transfer was made: the reward was already settled, or another task
    /// is settling it right now.
    NotAttempted,
}

/// A freshly issued reward and the outcome of its payout attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Award {
    pub reward: Reward,
    pub settlement: Settlement,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettlementSummary {
    pub settled: Vec<Reward>,
    pub failed: Vec<(RewardId, TransferError)>,
    pub skipped: usize,
}

/// Reward ledger over a reward/balance store and a token transfer backend.
pub struct RewardLedger<S, T> {
    store: Arc<S>,
    transfer: Arc<T>,
    clock: Arc<dyn Clock>,
    treasury: TreasuryRef,
    params: RewardParams,
    seq: AtomicU64,
    /// Rewards whose transfer is currently in flight.
    in_flight: Mutex<HashSet<RewardId>>,
}

/// Marks a reward as in flight until dropped.
struct SettleClaim<'a> {
    set: &'a Mutex<HashSet<RewardId>>,
    id: RewardId,
}

impl Drop for SettleClaim<'_> {
    fn drop(&mut self) {
        let mut set = match self.set.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        set.remove(&self.id);
    }
}

impl<S, T> RewardLedger<S, T>
where
    S: RewardStore + BalanceStore,
    T: TokenTransfer,
{
    pub fn new(
        store: Arc<S>,
        transfer: Arc<T>,
        clock: Arc<dyn Clock>,
        treasury: TreasuryRef,
        params: RewardParams,
    ) -> Self {
        Self {
            store,
            transfer,
            clock,
            treasury,
            params,
            seq: AtomicU64::new(0),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn params(&self) -> &RewardParams {
        &self.params
    }

    pub fn treasury(&self) -> &TreasuryRef {
        &self.treasury
    }

    /// A wallet's balance, created with all-zero fields on first read.
    pub fn balance(&self, wallet: &WalletAddress) -> Result<UserBalance, RewardError> {
        if let Some(balance) = self.store.get_balance(wallet)? {
            return Ok(balance);
        }
        let fresh = UserBalance::new(wallet.clone());
        match self.store.put_balance(&fresh, 0) {
            Ok(version) => Ok(UserBalance { version, ..fresh }),
            // Someone else created it first.
            Err(StoreError::Conflict { .. }) => self
                .store
                .get_balance(wallet)?
                .ok_or_else(|| StoreError::NotFound(wallet.to_string()).into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Pay the flat submission reward.
    ///
    /// The submitter's pending balance and audit count are bumped before the
    /// reward is recorded, so a pending reward is never visible without its
    /// pending credit. On transfer success the reward moves to confirmed; on
    /// failure it stays pending until [`Self::settle_pending`].
    pub async fn award_submission(
        &self,
        submitter: &WalletAddress,
        audit_id: &AuditId,
    ) -> Result<Award, RewardError> {
        let amount = submission_reward(&self.params);
        let reward = self.new_reward(
            submitter,
            audit_id,
            amount,
            RewardKind::Submission,
            RewardStatus::Pending,
        );
        self.update_balance(submitter, |b| {
            b.pending_rewards = b
                .pending_rewards
                .checked_add(amount)
                .ok_or("pending rewards overflow")?;
            b.audit_count += 1;
            Ok(())
        })?;
        if let Err(e) = self.store.insert_reward(&reward) {
            self.revert_pending_credit(submitter, amount);
            return Err(e.into());
        }
        tracing::info!(
            wallet = %submitter,
            audit = %audit_id,
            reward = %reward.id,
            amount = %amount,
            "submission reward recorded"
        );

        let settlement = self.settle(&reward).await?;
        let reward = self.store.get_reward(&reward.id)?;
        Ok(Award { reward, settlement })
    }

    /// Pay a verifier for the `verification_number`-th verification of an audit.
    ///
    /// Verification rewards are confirmed and credited immediately. The transfer
    /// is still attempted; a failure is logged and the reward keeps no signature.
    pub async fn award_verification(
        &self,
        verifier: &WalletAddress,
        audit_id: &AuditId,
        verification_number: u32,
    ) -> Result<Award, RewardError> {
        let amount = verification_reward(verification_number, &self.params);
        let reward = self.new_reward(
            verifier,
            audit_id,
            amount,
            RewardKind::Verification,
            RewardStatus::Confirmed,
        );
        self.update_balance(verifier, |b| {
            credit_confirmed(b, amount)?;
            b.verification_count += 1;
            Ok(())
        })?;
        if let Err(e) = self.store.insert_reward(&reward) {
            self.revert_confirmed_credit(verifier, amount, true);
            return Err(e.into());
        }
        tracing::info!(
            wallet = %verifier,
            audit = %audit_id,
            reward = %reward.id,
            amount = %amount,
            verification_number,
            "verification reward issued"
        );

        let settlement = match self
            .transfer
            .send_tokens(verifier, amount, &self.treasury)
            .await
        {
            Ok(receipt) => {
                self.store
                    .attach_signature(&reward.id, receipt.signature.clone())?;
                Settlement::Settled {
                    signature: receipt.signature,
                }
            }
            Err(e) => {
                tracing::warn!(
                    wallet = %verifier,
                    reward = %reward.id,
                    error = %e,
                    "verification transfer failed; reward stays confirmed"
                );
                Settlement::Failed(e)
            }
        };
        let reward = self.store.get_reward(&reward.id)?;
        Ok(Award { reward, settlement })
    }

    /// Pay the one-time quality bonus to a submitter whose audit reached quorum.
    ///
    /// Returns `None` when the ratings earn nothing. No transfer is attempted.
    pub fn award_quality_bonus(
        &self,
        submitter: &WalletAddress,
        audit_id: &AuditId,
        ratings: &[u8],
    ) -> Result<Option<Reward>, RewardError> {
        let amount = quality_bonus(ratings, &self.params);
        if amount.is_zero() {
            tracing::debug!(audit = %audit_id, "no ratings, no quality bonus");
            return Ok(None);
        }
        let reward = self.new_reward(
            submitter,
            audit_id,
            amount,
            RewardKind::QualityBonus,
            RewardStatus::Confirmed,
        );
        self.update_balance(submitter, |b| credit_confirmed(b, amount))?;
        if let Err(e) = self.store.insert_reward(&reward) {
            self.revert_confirmed_credit(submitter, amount, false);
            return Err(e.into());
        }
        tracing::info!(
            wallet = %submitter,
            audit = %audit_id,
            reward = %reward.id,
            amount = %amount,
            "quality bonus issued"
        );
        Ok(Some(reward))
    }

    /// Re-attempt the transfer for every pending reward of `wallet`.
    pub async fn settle_pending(
        &self,
        wallet: &WalletAddress,
    ) -> Result<SettlementSummary, RewardError> {
        let pending = self.store.pending_rewards_for(wallet)?;
        let mut summary = SettlementSummary::default();
        for reward in pending {
            match self.settle(&reward).await? {
                Settlement::Settled { .. } => {
                    summary.settled.push(self.store.get_reward(&reward.id)?);
                }
                Settlement::Failed(e) => summary.failed.push((reward.id.clone(), e)),
                Settlement::NotAttempted => summary.skipped += 1,
            }
        }
        tracing::debug!(
            wallet = %wallet,
            settled = summary.settled.len(),
            failed = summary.failed.len(),
            skipped = summary.skipped,
            "pending rewards settled"
        );
        Ok(summary)
    }

    /// A wallet's rewards, oldest first.
    pub fn history(&self, wallet: &WalletAddress) -> Result<Vec<Reward>, RewardError> {
        Ok(self.store.rewards_for(wallet)?)
    }

    /// All balances by total earned, highest first; ties broken by address.
    pub fn leaderboard(&self, limit: Option<usize>) -> Result<Vec<UserBalance>, RewardError> {
        let mut balances = self.store.iter_balances()?;
        balances.sort_by(|a, b| {
            b.total_earned
                .cmp(&a.total_earned)
                .then_with(|| a.wallet.cmp(&b.wallet))
        });
        if let Some(limit) = limit {
            balances.truncate(limit);
        }
        Ok(balances)
    }

    pub fn pending_reward_count(&self) -> Result<u64, RewardError> {
        Ok(self.store.pending_reward_count()?)
    }

    fn new_reward(
        &self,
        wallet: &WalletAddress,
        audit_id: &AuditId,
        amount: QolAmount,
        kind: RewardKind,
        status: RewardStatus,
    ) -> Reward {
        let now = self.clock.now();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        Reward {
            id: RewardId::derive(wallet, audit_id, kind.as_str(), seq, now),
            wallet: wallet.clone(),
            audit_id: audit_id.clone(),
            amount,
            kind,
            status,
            created_at: now,
            signature: None,
        }
    }

    fn claim(&self, id: &RewardId) -> Option<SettleClaim<'_>> {
        let mut set = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        set.insert(id.clone()).then(|| SettleClaim {
            set: &self.in_flight,
            id: id.clone(),
        })
    }

    /// Push one pending reward through the transfer and confirm it on success.
    ///
    /// The signature is stored on the still-pending reward before any balance
    /// moves. A reward that already carries one was paid by an earlier attempt
    /// whose bookkeeping failed, so only the bookkeeping is redone.
    async fn settle(&self, reward: &Reward) -> Result<Settlement, RewardError> {
        let Some(_claim) = self.claim(&reward.id) else {
            return Ok(Settlement::NotAttempted);
        };
        // Re-read under the claim: a concurrent settlement may have finished.
        let current = self.store.get_reward(&reward.id)?;
        if !current.is_pending() {
            return Ok(Settlement::NotAttempted);
        }

        let signature = match current.signature {
            Some(signature) => {
                tracing::debug!(reward = %reward.id, "transfer already made, finishing bookkeeping");
                signature
            }
            None => match self
                .transfer
                .send_tokens(&reward.wallet, reward.amount, &self.treasury)
                .await
            {
                Ok(receipt) => {
                    self.store
                        .attach_signature(&reward.id, receipt.signature.clone())?;
                    receipt.signature
                }
                Err(e) => {
                    tracing::warn!(
                        wallet = %reward.wallet,
                        reward = %reward.id,
                        error = %e,
                        "transfer failed; reward stays pending"
                    );
                    return Ok(Settlement::Failed(e));
                }
            },
        };

        let amount = reward.amount;
        self.update_balance(&reward.wallet, |b| {
            b.pending_rewards = b
                .pending_rewards
                .checked_sub(amount)
                .ok_or("pending rewards below settled amount")?;
            credit_confirmed(b, amount)
        })?;
        if let Err(e) = self.store.confirm_reward(&reward.id, Some(signature.clone())) {
            self.revert_settled_credit(&reward.wallet, amount);
            return Err(e.into());
        }
        tracing::info!(
            wallet = %reward.wallet,
            reward = %reward.id,
            amount = %amount,
            signature = %signature,
            "reward settled"
        );
        Ok(Settlement::Settled { signature })
    }

    /// Undo a pending credit whose reward record could not be written.
    fn revert_pending_credit(&self, wallet: &WalletAddress, amount: QolAmount) {
        let reverted = self.update_balance(wallet, |b| {
            b.pending_rewards = b
                .pending_rewards
                .checked_sub(amount)
                .ok_or("pending rewards below reverted amount")?;
            b.audit_count = b.audit_count.saturating_sub(1);
            Ok(())
        });
        if let Err(e) = reverted {
            tracing::error!(wallet = %wallet, amount = %amount, error = %e, "could not revert pending credit");
        }
    }

    /// Undo a confirmed credit whose reward record could not be written.
    fn revert_confirmed_credit(&self, wallet: &WalletAddress, amount: QolAmount, verification: bool) {
        let reverted = self.update_balance(wallet, |b| {
            b.qol_tokens = b
                .qol_tokens
                .checked_sub(amount)
                .ok_or("token balance below reverted amount")?;
            b.total_earned = b
                .total_earned
                .checked_sub(amount)
                .ok_or("total earned below reverted amount")?;
            if verification {
                b.verification_count = b.verification_count.saturating_sub(1);
            }
            Ok(())
        });
        if let Err(e) = reverted {
            tracing::error!(wallet = %wallet, amount = %amount, error = %e, "could not revert confirmed credit");
        }
    }

    /// Move a settled amount back to pending after the reward failed to confirm.
    fn revert_settled_credit(&self, wallet: &WalletAddress, amount: QolAmount) {
        let reverted = self.update_balance(wallet, |b| {
            b.qol_tokens = b
                .qol_tokens
                .checked_sub(amount)
                .ok_or("token balance below reverted amount")?;
            b.total_earned = b
                .total_earned
                .checked_sub(amount)
                .ok_or("total earned below reverted amount")?;
            b.pending_rewards = b
                .pending_rewards
                .checked_add(amount)
                .ok_or("pending rewards overflow")?;
            Ok(())
        });
        if let Err(e) = reverted {
            tracing::error!(wallet = %wallet, amount = %amount, error = %e, "could not revert settled credit");
        }
    }

    /// Read-modify-write a balance with compare-and-swap, retrying on conflict.
    fn update_balance<F>(&self, wallet: &WalletAddress, mut apply: F) -> Result<UserBalance, RewardError>
    where
        F: FnMut(&mut UserBalance) -> Result<(), String>,
    {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let mut next = self
                .store
                .get_balance(wallet)?
                .unwrap_or_else(|| UserBalance::new(wallet.clone()));
            let expected = next.version;
            apply(&mut next).map_err(|reason| RewardError::Inconsistent {
                wallet: wallet.to_string(),
                reason,
            })?;
            match self.store.put_balance(&next, expected) {
                Ok(version) => {
                    next.version = version;
                    return Ok(next);
                }
                Err(StoreError::Conflict { .. }) => {
                    tracing::debug!(wallet = %wallet, attempt, "balance update conflicted, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        tracing::warn!(wallet = %wallet, attempts = MAX_CAS_ATTEMPTS, "balance update gave up");
        Err(RewardError::Contention {
            wallet: wallet.to_string(),
            attempts: MAX_CAS_ATTEMPTS,
        })
    }
}

fn credit_confirmed(b: &mut UserBalance, amount: QolAmount) -> Result<(), String> {
    b.qol_tokens = b.qol_tokens.checked_add(amount).ok_or("token balance overflow")?;
    b.total_earned = b
        .total_earned
        .checked_add(amount)
        .ok_or("total earned overflow")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qol_nullables::{NullClock, NullTransfer};
    use qol_store_memory::MemoryStore;

    type Ledger = RewardLedger<MemoryStore, NullTransfer>;

    fn ledger_with(transfer: NullTransfer) -> (Ledger, Arc<NullTransfer>) {
        let transfer = Arc::new(transfer);
        let ledger = RewardLedger::new(
            Arc::new(MemoryStore::new()),
            transfer.clone(),
            Arc::new(NullClock::new(1_700_000_000)),
            TreasuryRef::new("TREASURY"),
            RewardParams::default(),
        );
        (ledger, transfer)
    }

    fn qol(s: &str) -> QolAmount {
        s.parse().unwrap()
    }

    fn wallet(s: &str) -> WalletAddress {
        WalletAddress::new(s)
    }

    fn audit() -> AuditId {
        AuditId::new("AUDIT-1700000000-0001")
    }

    #[test]
    fn balance_is_created_lazily() {
        let (ledger, _) = ledger_with(NullTransfer::new());
        let b = ledger.balance(&wallet("new-user")).unwrap();
        assert_eq!(b.qol_tokens, QolAmount::ZERO);
        assert_eq!(b.audit_count, 0);
        assert_eq!(b.version, 1);
        // Second read returns the stored record.
        assert_eq!(ledger.balance(&wallet("new-user")).unwrap(), b);
    }

    #[tokio::test]
    async fn submission_stays_pending_when_transfer_fails() {
        let (ledger, _) = ledger_with(NullTransfer::failing());
        let award = ledger
            .award_submission(&wallet("user-123"), &audit())
            .await
            .unwrap();
        assert!(matches!(award.settlement, Settlement::Failed(_)));
        assert_eq!(award.reward.status, RewardStatus::Pending);
        assert_eq!(award.reward.signature, None);

        let b = ledger.balance(&wallet("user-123")).unwrap();
        assert_eq!(b.pending_rewards, qol("10"));
        assert_eq!(b.qol_tokens, QolAmount::ZERO);
        assert_eq!(b.total_earned, QolAmount::ZERO);
        assert_eq!(b.audit_count, 1);
        assert_eq!(ledger.pending_reward_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn submission_confirms_when_transfer_succeeds() {
        let (ledger, transfer) = ledger_with(NullTransfer::new());
        let award = ledger
            .award_submission(&wallet("user-123"), &audit())
            .await
            .unwrap();
        assert_eq!(
            award.settlement,
            Settlement::Settled {
                signature: "null_sig_1".into()
            }
        );
        assert_eq!(award.reward.status, RewardStatus::Confirmed);
        assert_eq!(award.reward.signature.as_deref(), Some("null_sig_1"));

        let b = ledger.balance(&wallet("user-123")).unwrap();
        assert_eq!(b.qol_tokens, qol("10"));
        assert_eq!(b.pending_rewards, QolAmount::ZERO);
        assert_eq!(b.total_earned, qol("10"));
        assert_eq!(transfer.sent()[0].amount, qol("10"));
    }

    #[tokio::test]
    async fn settle_pending_retries_failed_submissions() {
        let (ledger, transfer) = ledger_with(NullTransfer::failing());
        let submitter = wallet("user-123");
        ledger.award_submission(&submitter, &audit()).await.unwrap();

        let still_failing = ledger.settle_pending(&submitter).await.unwrap();
        assert!(still_failing.settled.is_empty());
        assert_eq!(still_failing.failed.len(), 1);

        transfer.set_fail_by_default(false);
        let summary = ledger.settle_pending(&submitter).await.unwrap();
        assert_eq!(summary.settled.len(), 1);
        assert_eq!(summary.settled[0].status, RewardStatus::Confirmed);

        let b = ledger.balance(&submitter).unwrap();
        assert_eq!(b.qol_tokens, qol("10"));
        assert_eq!(b.pending_rewards, QolAmount::ZERO);

        // Nothing left to settle.
        let again = ledger.settle_pending(&submitter).await.unwrap();
        assert_eq!(again, SettlementSummary::default());
        assert_eq!(transfer.successful_count(), 1);
    }

    #[tokio::test]
    async fn verification_rewards_follow_schedule() {
        let (ledger, _) = ledger_with(NullTransfer::new());
        let mut amounts = Vec::new();
        for (n, who) in ["v1", "v2", "v3"].iter().enumerate() {
            let award = ledger
                .award_verification(&wallet(who), &audit(), n as u32 + 1)
                .await
                .unwrap();
            assert_eq!(award.reward.status, RewardStatus::Confirmed);
            amounts.push(award.reward.amount);
        }
        assert_eq!(amounts, vec![qol("7.5"), qol("5"), qol("7.5")]);

        let v2 = ledger.balance(&wallet("v2")).unwrap();
        assert_eq!(v2.qol_tokens, qol("5"));
        assert_eq!(v2.total_earned, qol("5"));
        assert_eq!(v2.verification_count, 1);
    }

    #[tokio::test]
    async fn verification_transfer_failure_keeps_reward_confirmed() {
        let (ledger, _) = ledger_with(NullTransfer::failing());
        let award = ledger
            .award_verification(&wallet("v1"), &audit(), 1)
            .await
            .unwrap();
        assert!(matches!(award.settlement, Settlement::Failed(_)));
        assert_eq!(award.reward.status, RewardStatus::Confirmed);
        assert_eq!(award.reward.signature, None);
        assert_eq!(ledger.balance(&wallet("v1")).unwrap().qol_tokens, qol("7.5"));
    }

    #[test]
    fn quality_bonus_is_credited() {
        let (ledger, transfer) = ledger_with(NullTransfer::new());
        let reward = ledger
            .award_quality_bonus(&wallet("user-123"), &audit(), &[4])
            .unwrap()
            .unwrap();
        assert_eq!(reward.kind, RewardKind::QualityBonus);
        assert_eq!(reward.amount, qol("15"));
        let b = ledger.balance(&wallet("user-123")).unwrap();
        assert_eq!(b.qol_tokens, qol("15"));
        assert_eq!(b.total_earned, qol("15"));
        assert!(transfer.sent().is_empty());

        assert_eq!(
            ledger
                .award_quality_bonus(&wallet("user-123"), &audit(), &[])
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn history_and_leaderboard() {
        let (ledger, _) = ledger_with(NullTransfer::new());
        let alice = wallet("alice");
        let bob = wallet("bob");
        ledger.award_submission(&alice, &audit()).await.unwrap();
        ledger.award_verification(&bob, &audit(), 1).await.unwrap();
        ledger.award_quality_bonus(&alice, &audit(), &[5]).unwrap();
        ledger.balance(&wallet("carol")).unwrap();

        let kinds: Vec<_> = ledger
            .history(&alice)
            .unwrap()
            .into_iter()
            .map(|r| r.kind)
            .collect();
        assert_eq!(kinds, vec![RewardKind::Submission, RewardKind::QualityBonus]);

        let board = ledger.leaderboard(None).unwrap();
        let order: Vec<_> = board.iter().map(|b| b.wallet.as_str()).collect();
        assert_eq!(order, vec!["alice", "bob", "carol"]);
        assert_eq!(board[0].total_earned, qol("25"));

        assert_eq!(ledger.leaderboard(Some(1)).unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_credits_are_not_lost() {
        let (ledger, _) = ledger_with(NullTransfer::new());
        let ledger = Arc::new(ledger);
        let mut handles = Vec::new();
        for i in 0..MAX_CAS_ATTEMPTS {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .award_quality_bonus(
                        &WalletAddress::new("shared"),
                        &AuditId::new(format!("AUDIT-{i}")),
                        &[5],
                    )
                    .unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        let b = ledger.balance(&wallet("shared")).unwrap();
        assert_eq!(b.total_earned, qol("15").mul_bps(MAX_CAS_ATTEMPTS * 10_000));
    }
}
