//! Fundamental types for the QoL index.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! wallet addresses, token amounts, timestamps, coordinates, identifiers, and reward
//! parameters.

pub mod address;
pub mod amount;
pub mod error;
pub mod geo;
pub mod ids;
pub mod params;
pub mod time;

pub use address::WalletAddress;
pub use amount::QolAmount;
pub use error::QolError;
pub use geo::GeoPoint;
pub use ids::{AuditId, RewardId};
pub use params::{QualityTier, RewardParams};
pub use time::{Clock, SystemClock, Timestamp};
