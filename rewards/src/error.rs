use qol_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RewardError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("balance of {wallet} still contended after {attempts} attempts")]
    Contention { wallet: String, attempts: u32 },

    #[error("balance of {wallet} would become inconsistent: {reason}")]
    Inconsistent { wallet: String, reason: String },
}
