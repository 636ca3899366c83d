//! Events emitted by the service for subscribers.

use qol_store::RewardKind;
use qol_types::{AuditId, QolAmount, RewardId, WalletAddress};

/// Service-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq)]
pub enum ServiceEvent {
    AuditSubmitted {
        audit: AuditId,
        submitter: WalletAddress,
    },
    /// A verification passed every guard and was recorded.
    AuditVerified {
        audit: AuditId,
        verifier: WalletAddress,
        verification_number: u32,
    },
    /// The audit collected its final verification. Emitted once per audit.
    QuorumReached {
        audit: AuditId,
        submitter: WalletAddress,
    },
    RewardIssued {
        reward: RewardId,
        wallet: WalletAddress,
        kind: RewardKind,
        amount: QolAmount,
    },
    RewardSettled {
        reward: RewardId,
        wallet: WalletAddress,
        signature: String,
    },
    TransferFailed {
        reward: RewardId,
        wallet: WalletAddress,
        error: String,
    },
    VerificationRejected {
        audit: AuditId,
        verifier: WalletAddress,
        reason: &'static str,
    },
}

type Listener = Box<dyn Fn(&ServiceEvent) + Send + Sync>;

/// Synchronous fan-out event bus for service events.
///
/// Listeners are invoked inline on the emitting task; keep handlers fast.
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &ServiceEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
