//! The QoL service: user actions in, ledger updates and events out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use qol_rewards::{Award, RewardLedger, Settlement, SettlementSummary};
use qol_scoring::{metric_spec, LocationSource, ScoreReport, ScoringError};
use qol_store::{Audit, AuditStore, BalanceStore, Reward, RewardStore, StoreError, UserBalance};
use qol_transfer::{TokenTransfer, TreasuryRef};
use qol_types::{AuditId, Clock, GeoPoint, WalletAddress};
use qol_verification::{Geolocator, QuorumTracker, VerificationError, VerificationOutcome};
use qol_wallet::WalletProvider;

use crate::{AuditLocks, EventBus, ServiceConfig, ServiceError, ServiceEvent, ServiceMetrics};

/// Attempts at committing a verified audit before giving up.
const AUDIT_COMMIT_ATTEMPTS: u32 = 4;

const MIN_RATING: u8 = 1;
const MAX_RATING: u8 = 5;

/// A user's audit as entered in the submission form.
#[derive(Clone, Debug, PartialEq)]
pub struct AuditSubmission {
    pub location_id: String,
    pub category_id: String,
    pub metric_id: String,
    /// Rating on the 1-5 scale.
    pub rating: u8,
    /// Reference to the uploaded photo. Required.
    pub photo: Option<String>,
    /// Where the photo was taken; defaults to the location's coordinates.
    pub position: Option<GeoPoint>,
}

impl AuditSubmission {
    pub fn new(
        location_id: impl Into<String>,
        category_id: impl Into<String>,
        metric_id: impl Into<String>,
        rating: u8,
        photo: impl Into<String>,
    ) -> Self {
        Self {
            location_id: location_id.into(),
            category_id: category_id.into(),
            metric_id: metric_id.into(),
            rating,
            photo: Some(photo.into()),
            position: None,
        }
    }

    pub fn at(mut self, position: GeoPoint) -> Self {
        self.position = Some(position);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionReceipt {
    pub audit: Audit,
    pub award: Award,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VerificationReceipt {
    /// The audit as committed after this verification.
    pub audit: Audit,
    pub outcome: VerificationOutcome,
    pub award: Award,
    /// Paid to the submitter when this verification closed the quorum.
    pub quality_bonus: Option<Reward>,
}

/// Orchestrates submission, verification, rewards and scoring.
pub struct QolService<S, T, L> {
    store: Arc<S>,
    ledger: RewardLedger<S, T>,
    locations: L,
    tracker: QuorumTracker,
    clock: Arc<dyn Clock>,
    locks: AuditLocks,
    metrics: ServiceMetrics,
    events: EventBus,
    audit_seq: AtomicU64,
}

impl<S, T, L> QolService<S, T, L>
where
    S: AuditStore + BalanceStore + RewardStore,
    T: TokenTransfer,
    L: LocationSource,
{
    pub fn new(
        config: &ServiceConfig,
        store: Arc<S>,
        transfer: Arc<T>,
        locations: L,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let ledger = RewardLedger::new(
            store.clone(),
            transfer,
            clock.clone(),
            TreasuryRef::new(config.treasury.clone()),
            config.rewards.clone(),
        );
        Self {
            store,
            ledger,
            locations,
            tracker: QuorumTracker::from_params(&config.rewards),
            clock,
            locks: AuditLocks::new(),
            metrics: ServiceMetrics::new(),
            events: EventBus::new(),
            audit_seq: AtomicU64::new(1),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&ServiceEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    pub fn ledger(&self) -> &RewardLedger<S, T> {
        &self.ledger
    }

    pub fn tracker(&self) -> &QuorumTracker {
        &self.tracker
    }

    pub fn audit_locks(&self) -> &AuditLocks {
        &self.locks
    }

    /// The wallet currently connected through `wallet`, used as actor identity.
    pub fn connected_actor(&self, wallet: &dyn WalletProvider) -> Result<WalletAddress, ServiceError> {
        Ok(wallet.require_address()?)
    }

    // ── Submission ──────────────────────────────────────────────────────

    /// Record a new audit and pay the submission reward.
    ///
    /// The audit is stored before any reward is issued; a failed transfer
    /// leaves the submission reward pending but the audit stands.
    pub async fn submit_audit(
        &self,
        submitter: &WalletAddress,
        submission: AuditSubmission,
    ) -> Result<SubmissionReceipt, ServiceError> {
        let photo = match submission.photo {
            Some(photo) if !photo.trim().is_empty() => photo,
            _ => {
                return Err(ServiceError::InvalidSubmission(
                    "a photo is required for geo-verification".into(),
                ))
            }
        };
        if !(MIN_RATING..=MAX_RATING).contains(&submission.rating) {
            return Err(ServiceError::InvalidSubmission(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}, got {}",
                submission.rating
            )));
        }
        let location = self
            .locations
            .location(&submission.location_id)
            .ok_or_else(|| ScoringError::UnknownLocation(submission.location_id.clone()))?;
        metric_spec(&submission.category_id, &submission.metric_id)?;

        let now = self.clock.now();
        let seq = self.audit_seq.fetch_add(1, Ordering::Relaxed);
        let audit = Audit {
            id: AuditId::generate(now, seq),
            location_id: submission.location_id,
            category_id: submission.category_id,
            metric_id: submission.metric_id,
            coordinates: submission.position.unwrap_or(location.coordinates),
            rating: submission.rating,
            photo,
            submitter: submitter.clone(),
            submitted_at: now,
            verifiers: Vec::new(),
            verification_count: 0,
            is_verified: false,
            version: 0,
        };
        self.store.insert_audit(&audit)?;
        let audit = self.store.get_audit(&audit.id)?;

        self.metrics.audits_submitted.inc();
        tracing::info!(
            audit = %audit.id,
            submitter = %submitter,
            location = %audit.location_id,
            metric = %audit.metric_id,
            rating = audit.rating,
            "audit submitted"
        );
        self.events.emit(&ServiceEvent::AuditSubmitted {
            audit: audit.id.clone(),
            submitter: submitter.clone(),
        });

        let award = self.ledger.award_submission(submitter, &audit.id).await?;
        self.publish_award(&award);
        self.refresh_pending_gauge()?;

        Ok(SubmissionReceipt { audit, award })
    }

    // ── Verification ────────────────────────────────────────────────────

    /// Verify an audit from the position reported by `geolocator`.
    pub async fn verify_audit_with(
        &self,
        verifier: &WalletAddress,
        audit_id: &AuditId,
        geolocator: &dyn Geolocator,
    ) -> Result<VerificationReceipt, ServiceError> {
        let position = match geolocator.current_position() {
            Ok(position) => position,
            Err(e) => return Err(self.reject(audit_id, verifier, e.into())),
        };
        self.verify_audit(verifier, audit_id, position).await
    }

    /// Verify an audit from `position`.
    ///
    /// Verifications of one audit are serialized. The audit is committed
    /// before anyone is paid, so a failing reward write never undoes an
    /// accepted verification. The quality bonus of a quorum-closing
    /// verification is issued even when the verifier's own reward fails;
    /// that failure is reported afterwards.
    pub async fn verify_audit(
        &self,
        verifier: &WalletAddress,
        audit_id: &AuditId,
        position: GeoPoint,
    ) -> Result<VerificationReceipt, ServiceError> {
        let guard = self.locks.lock(audit_id).await;
        let committed = self.commit_verification(verifier, audit_id, &position);
        drop(guard);
        self.locks.release(audit_id).await;
        let (audit, outcome) = committed?;

        self.metrics.verifications_accepted.inc();
        self.events.emit(&ServiceEvent::AuditVerified {
            audit: audit.id.clone(),
            verifier: verifier.clone(),
            verification_number: outcome.verification_number,
        });

        let award = self
            .ledger
            .award_verification(verifier, &audit.id, outcome.verification_number)
            .await;
        match &award {
            Ok(award) => self.publish_award(award),
            Err(e) => tracing::error!(
                audit = %audit.id,
                verifier = %verifier,
                error = %e,
                "verification accepted but its reward failed"
            ),
        }

        let quality_bonus = if outcome.reached_quorum {
            self.metrics.quorums_reached.inc();
            tracing::info!(audit = %audit.id, submitter = %audit.submitter, "audit reached quorum");
            self.events.emit(&ServiceEvent::QuorumReached {
                audit: audit.id.clone(),
                submitter: audit.submitter.clone(),
            });
            let bonus =
                self.ledger
                    .award_quality_bonus(&audit.submitter, &audit.id, &audit.ratings())?;
            if let Some(reward) = &bonus {
                self.publish_reward(reward);
            }
            bonus
        } else {
            None
        };
        self.refresh_pending_gauge()?;

        Ok(VerificationReceipt {
            audit,
            outcome,
            award: award?,
            quality_bonus,
        })
    }

    /// Apply the verification guards and compare-and-swap the audit.
    fn commit_verification(
        &self,
        verifier: &WalletAddress,
        audit_id: &AuditId,
        position: &GeoPoint,
    ) -> Result<(Audit, VerificationOutcome), ServiceError> {
        for attempt in 1..=AUDIT_COMMIT_ATTEMPTS {
            let mut audit = self.store.get_audit(audit_id)?;
            let expected = audit.version;
            let outcome = match self.tracker.apply(&mut audit, verifier, position) {
                Ok(outcome) => outcome,
                Err(e) => return Err(self.reject(audit_id, verifier, e)),
            };
            match self.store.update_audit(&audit, expected) {
                Ok(version) => {
                    audit.version = version;
                    return Ok((audit, outcome));
                }
                Err(StoreError::Conflict { .. }) => {
                    tracing::debug!(audit = %audit_id, attempt, "audit update conflicted, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(ServiceError::Contention(audit_id.to_string()))
    }

    fn reject(
        &self,
        audit_id: &AuditId,
        verifier: &WalletAddress,
        err: VerificationError,
    ) -> ServiceError {
        if !matches!(err, VerificationError::Store(_)) {
            self.metrics.verifications_rejected.inc();
            tracing::warn!(audit = %audit_id, verifier = %verifier, reason = err.reason(), "verification rejected: {err}");
            self.events.emit(&ServiceEvent::VerificationRejected {
                audit: audit_id.clone(),
                verifier: verifier.clone(),
                reason: err.reason(),
            });
        }
        err.into()
    }

    /// Audits `viewer` can verify: unverified, not theirs, not yet verified by them.
    pub fn pending_audits_for(&self, viewer: &WalletAddress) -> Result<Vec<Audit>, ServiceError> {
        Ok(self.tracker.queue_for(self.store.iter_unverified()?, viewer))
    }

    pub fn audit(&self, id: &AuditId) -> Result<Audit, ServiceError> {
        Ok(self.store.get_audit(id)?)
    }

    // ── Ledger views ────────────────────────────────────────────────────

    pub fn balance(&self, wallet: &WalletAddress) -> Result<UserBalance, ServiceError> {
        Ok(self.ledger.balance(wallet)?)
    }

    pub fn reward_history(&self, wallet: &WalletAddress) -> Result<Vec<Reward>, ServiceError> {
        Ok(self.ledger.history(wallet)?)
    }

    pub fn leaderboard(&self, limit: Option<usize>) -> Result<Vec<UserBalance>, ServiceError> {
        Ok(self.ledger.leaderboard(limit)?)
    }

    /// Retry settlement of every pending reward of `wallet`.
    pub async fn settle_pending(
        &self,
        wallet: &WalletAddress,
    ) -> Result<SettlementSummary, ServiceError> {
        let summary = self.ledger.settle_pending(wallet).await?;
        for reward in &summary.settled {
            if let Some(signature) = &reward.signature {
                self.events.emit(&ServiceEvent::RewardSettled {
                    reward: reward.id.clone(),
                    wallet: reward.wallet.clone(),
                    signature: signature.clone(),
                });
            }
        }
        for (id, error) in &summary.failed {
            self.metrics.transfer_failures.inc();
            self.events.emit(&ServiceEvent::TransferFailed {
                reward: id.clone(),
                wallet: wallet.clone(),
                error: error.to_string(),
            });
        }
        self.refresh_pending_gauge()?;
        Ok(summary)
    }

    // ── Scores ──────────────────────────────────────────────────────────

    /// Score reports for every known location.
    pub fn location_scores(&self) -> Vec<ScoreReport> {
        self.locations
            .locations()
            .iter()
            .map(ScoreReport::for_location)
            .collect()
    }

    pub fn location_score(&self, location_id: &str) -> Result<ScoreReport, ServiceError> {
        let location = self
            .locations
            .location(location_id)
            .ok_or_else(|| ScoringError::UnknownLocation(location_id.to_string()))?;
        Ok(ScoreReport::for_location(&location))
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn publish_award(&self, award: &Award) {
        self.publish_reward(&award.reward);
        match &award.settlement {
            Settlement::Settled { signature } => self.events.emit(&ServiceEvent::RewardSettled {
                reward: award.reward.id.clone(),
                wallet: award.reward.wallet.clone(),
                signature: signature.clone(),
            }),
            Settlement::Failed(error) => {
                self.metrics.transfer_failures.inc();
                self.events.emit(&ServiceEvent::TransferFailed {
                    reward: award.reward.id.clone(),
                    wallet: award.reward.wallet.clone(),
                    error: error.to_string(),
                });
            }
            Settlement::NotAttempted => {}
        }
    }

    fn publish_reward(&self, reward: &Reward) {
        self.metrics.rewards_issued.inc();
        self.events.emit(&ServiceEvent::RewardIssued {
            reward: reward.id.clone(),
            wallet: reward.wallet.clone(),
            kind: reward.kind,
            amount: reward.amount,
        });
    }

    fn refresh_pending_gauge(&self) -> Result<(), ServiceError> {
        let pending = self.ledger.pending_reward_count()?;
        self.metrics
            .pending_rewards
            .set(i64::try_from(pending).unwrap_or(i64::MAX));
        Ok(())
    }
}
