//! Listener registry shared by wallet provider implementations.

use crate::{WalletEvent, WalletListener};
use std::sync::RwLock;

/// Synchronous fan-out of [`WalletEvent`]s to subscribed listeners.
#[derive(Default)]
pub struct ListenerSet {
    listeners: RwLock<Vec<WalletListener>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: WalletListener) {
        match self.listeners.write() {
            Ok(mut guard) => guard.push(listener),
            Err(poisoned) => poisoned.into_inner().push(listener),
        }
    }

    pub fn emit(&self, event: &WalletEvent) {
        tracing::debug!(?event, "wallet event");
        let guard = match self.listeners.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for listener in guard.iter() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qol_types::WalletAddress;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn emits_to_every_listener() {
        let set = ListenerSet::new();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let hits = hits.clone();
            set.add(Box::new(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            }));
        }
        set.emit(&WalletEvent::Connected {
            address: WalletAddress::new("wallet-a"),
        });
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn active_address_follows_event() {
        let a = WalletAddress::new("wallet-a");
        let b = WalletAddress::new("wallet-b");
        let changed = WalletEvent::Changed {
            previous: a.clone(),
            current: b.clone(),
        };
        assert_eq!(changed.active_address(), Some(&b));
        assert_eq!(
            WalletEvent::Disconnected { address: a }.active_address(),
            None
        );
    }
}
