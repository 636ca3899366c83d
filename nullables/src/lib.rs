//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! All external dependencies (clock, storage, token transfer, wallet, geolocation) are
//! abstracted behind traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod geolocation;
pub mod store;
pub mod transfer;
pub mod wallet;

pub use clock::NullClock;
pub use geolocation::NullGeolocator;
pub use store::FaultyStore;
pub use transfer::{NullTransfer, SentTransfer};
pub use wallet::NullWallet;
