//! Simulated treasury transfer.

use crate::{TokenTransfer, TransferError, TransferReceipt, TreasuryRef};
use qol_types::{Clock, QolAmount, WalletAddress};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Always-succeeding transfer that returns a synthetic `simulated_<millis>` signature.
///
/// A per-instance counter is appended when two transfers land in the same
/// millisecond, so signatures stay unique.
pub struct SimulatedTransfer {
    clock: Arc<dyn Clock>,
    sent: AtomicU64,
    last_millis: AtomicU64,
}

impl SimulatedTransfer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            sent: AtomicU64::new(0),
            last_millis: AtomicU64::new(0),
        }
    }

    /// Number of transfers performed so far.
    pub fn transfers_sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    fn next_signature(&self) -> String {
        let millis = self.clock.now_millis();
        let previous = self.last_millis.swap(millis, Ordering::Relaxed);
        let seq = self.sent.fetch_add(1, Ordering::Relaxed);
        if previous == millis {
            format!("simulated_{millis}_{seq}")
        } else {
            format!("simulated_{millis}")
        }
    }
}

impl fmt::Debug for SimulatedTransfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedTransfer")
            .field("sent", &self.transfers_sent())
            .finish()
    }
}

impl TokenTransfer for SimulatedTransfer {
    async fn send_tokens(
        &self,
        recipient: &WalletAddress,
        amount: QolAmount,
        treasury: &TreasuryRef,
    ) -> Result<TransferReceipt, TransferError> {
        let signature = self.next_signature();
        tracing::info!(
            backend = self.name(),
            recipient = %recipient,
            amount = %amount,
            treasury = %treasury,
            signature = %signature,
            "simulated token transfer"
        );
        Ok(TransferReceipt { signature })
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
