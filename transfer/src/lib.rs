//! Token payout boundary.
//!
//! Rewards are paid from a treasury account through a [`TokenTransfer`]
//! implementation. The ledger treats the transfer as an injected collaborator:
//! it must stay consistent whether the call succeeds or fails.
//!
//! Only [`SimulatedTransfer`] ships today. Real settlement (deriving the
//! recipient's token account, building and signing a transfer instruction,
//! broadcasting it) is not implemented.

pub mod error;
pub mod simulated;

pub use error::TransferError;
pub use simulated::SimulatedTransfer;

use qol_types::{QolAmount, WalletAddress};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// Reference to the treasury account rewards are paid from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreasuryRef(String);

impl TreasuryRef {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TreasuryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Proof that a payout settled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub signature: String,
}

/// Pays `amount` of QOL from `treasury` to `recipient`.
pub trait TokenTransfer: Send + Sync {
    fn send_tokens(
        &self,
        recipient: &WalletAddress,
        amount: QolAmount,
        treasury: &TreasuryRef,
    ) -> impl Future<Output = Result<TransferReceipt, TransferError>> + Send;

    /// Human-readable name of this transfer backend.
    fn name(&self) -> &str;
}
