//! Abstract storage traits for the QoL index.
//!
//! Every storage backend (the in-memory store today, a database later) implements
//! these traits. Business logic depends only on the traits.
//!
//! Mutable records (audits and balances) carry a `version` counter. Updates are
//! compare-and-swap on that counter so concurrent writers cannot silently lose
//! each other's changes.

pub mod audit;
pub mod balance;
pub mod error;
pub mod reward;

pub use audit::{Audit, AuditStore};
pub use balance::{BalanceStore, UserBalance};
pub use error::StoreError;
pub use reward::{Reward, RewardKind, RewardStatus, RewardStore};
