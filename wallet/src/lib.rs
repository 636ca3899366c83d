//! Wallet capability boundary.
//!
//! The core only needs a stable wallet address as actor identity. Browser
//! extensions, hardware wallets and adapters live behind [`WalletProvider`].

pub mod error;
pub mod listeners;

pub use error::WalletError;
pub use listeners::ListenerSet;

use qol_types::WalletAddress;
use serde::{Deserialize, Serialize};

/// Notifications emitted by a wallet provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WalletEvent {
    Connected { address: WalletAddress },
    /// The user switched accounts inside the wallet.
    Changed {
        previous: WalletAddress,
        current: WalletAddress,
    },
    Disconnected { address: WalletAddress },
}

impl WalletEvent {
    /// Address the actor is identified by after this event, if any.
    pub fn active_address(&self) -> Option<&WalletAddress> {
        match self {
            WalletEvent::Connected { address } => Some(address),
            WalletEvent::Changed { current, .. } => Some(current),
            WalletEvent::Disconnected { .. } => None,
        }
    }
}

pub type WalletListener = Box<dyn Fn(&WalletEvent) + Send + Sync>;

pub trait WalletProvider: Send + Sync {
    /// Connect and return the active address.
    fn connect(&self) -> Result<WalletAddress, WalletError>;

    fn disconnect(&self);

    /// Currently connected address, `None` when disconnected.
    fn address(&self) -> Option<WalletAddress>;

    fn subscribe(&self, listener: WalletListener);

    /// The connected address, or [`WalletError::NotConnected`].
    fn require_address(&self) -> Result<WalletAddress, WalletError> {
        self.address().ok_or(WalletError::NotConnected)
    }
}
