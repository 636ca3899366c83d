//! Nullable token transfer: record payouts without settling them.

use qol_transfer::{TokenTransfer, TransferError, TransferReceipt, TreasuryRef};
use qol_types::{QolAmount, WalletAddress};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A transfer call as observed by [`NullTransfer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentTransfer {
    pub recipient: WalletAddress,
    pub amount: QolAmount,
    pub treasury: TreasuryRef,
    pub succeeded: bool,
}

#[derive(Debug, Default)]
struct State {
    /// Outcomes to hand out before falling back to the default.
    script: VecDeque<Result<(), TransferError>>,
    fail_by_default: bool,
    sent: Vec<SentTransfer>,
}

/// A test transfer backend with scripted outcomes.
///
/// Succeeds with signatures `null_sig_1`, `null_sig_2`, ... unless told to fail.
#[derive(Debug, Default)]
pub struct NullTransfer {
    state: Mutex<State>,
}

impl NullTransfer {
    /// A backend where every transfer succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend where every transfer fails with a network error.
    pub fn failing() -> Self {
        let transfer = Self::default();
        transfer.set_fail_by_default(true);
        transfer
    }

    pub fn set_fail_by_default(&self, fail: bool) {
        self.with_state(|s| s.fail_by_default = fail);
    }

    /// Queue a one-shot outcome for the next call.
    pub fn push_outcome(&self, outcome: Result<(), TransferError>) {
        self.with_state(|s| s.script.push_back(outcome));
    }

    /// Every call so far, in order.
    pub fn sent(&self) -> Vec<SentTransfer> {
        self.with_state(|s| s.sent.clone())
    }

    pub fn successful_count(&self) -> usize {
        self.with_state(|s| s.sent.iter().filter(|t| t.succeeded).count())
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    fn record(
        &self,
        recipient: &WalletAddress,
        amount: QolAmount,
        treasury: &TreasuryRef,
    ) -> Result<TransferReceipt, TransferError> {
        self.with_state(|s| {
            let outcome = s.script.pop_front().unwrap_or(if s.fail_by_default {
                Err(TransferError::Network("null transfer configured to fail".into()))
            } else {
                Ok(())
            });
            s.sent.push(SentTransfer {
                recipient: recipient.clone(),
                amount,
                treasury: treasury.clone(),
                succeeded: outcome.is_ok(),
            });
            let n = s.sent.len();
            outcome.map(|()| TransferReceipt {
                signature: format!("null_sig_{n}"),
            })
        })
    }
}

impl TokenTransfer for NullTransfer {
    async fn send_tokens(
        &self,
        recipient: &WalletAddress,
        amount: QolAmount,
        treasury: &TreasuryRef,
    ) -> Result<TransferReceipt, TransferError> {
        self.record(recipient, amount, treasury)
    }

    fn name(&self) -> &str {
        "null"
    }
}
