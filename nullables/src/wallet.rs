//! Nullable wallet: a provider whose account switches are driven by the test.

use qol_types::WalletAddress;
use qol_wallet::{ListenerSet, WalletError, WalletEvent, WalletListener, WalletProvider};
use std::sync::Mutex;

/// A test wallet that connects to a preset address.
#[derive(Debug)]
pub struct NullWallet {
    account: Mutex<WalletAddress>,
    connected: Mutex<Option<WalletAddress>>,
    reject_connect: bool,
    listeners: ListenerSet,
}

impl NullWallet {
    pub fn new(address: WalletAddress) -> Self {
        Self {
            account: Mutex::new(address),
            connected: Mutex::new(None),
            reject_connect: false,
            listeners: ListenerSet::new(),
        }
    }

    /// A wallet whose user declines every connection request.
    pub fn rejecting(address: WalletAddress) -> Self {
        Self {
            reject_connect: true,
            ..Self::new(address)
        }
    }

    /// Simulate the user switching accounts inside the wallet.
    pub fn switch_account(&self, next: WalletAddress) {
        *lock(&self.account) = next.clone();
        let previous = lock(&self.connected).replace(next.clone());
        if let Some(previous) = previous {
            self.listeners.emit(&WalletEvent::Changed {
                previous,
                current: next,
            });
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl WalletProvider for NullWallet {
    fn connect(&self) -> Result<WalletAddress, WalletError> {
        if self.reject_connect {
            return Err(WalletError::Rejected);
        }
        let address = lock(&self.account).clone();
        *lock(&self.connected) = Some(address.clone());
        self.listeners.emit(&WalletEvent::Connected {
            address: address.clone(),
        });
        Ok(address)
    }

    fn disconnect(&self) {
        let previous = lock(&self.connected).take();
        if let Some(address) = previous {
            self.listeners.emit(&WalletEvent::Disconnected { address });
        }
    }

    fn address(&self) -> Option<WalletAddress> {
        lock(&self.connected).clone()
    }

    fn subscribe(&self, listener: WalletListener) {
        self.listeners.add(listener);
    }
}
