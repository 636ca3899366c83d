//! Per-audit async locks.
//!
//! Verifications on the same audit are serialized; verifications on
//! different audits proceed concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use qol_types::AuditId;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct AuditLocks {
    locks: Mutex<HashMap<AuditId, Arc<Mutex<()>>>>,
}

impl AuditLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `audit`. The lock is released when the
    /// returned guard drops.
    pub async fn lock(&self, audit: &AuditId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(audit.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Number of audits with a lock entry.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }

    /// Forget `audit`'s lock entry unless someone still holds or waits on it.
    ///
    /// Call after dropping the guard so the last verifier out removes it.
    pub async fn release(&self, audit: &AuditId) {
        let mut locks = self.locks.lock().await;
        if locks.get(audit).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(audit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn same_audit_is_serialized() {
        let locks = Arc::new(AuditLocks::new());
        let inside = Arc::new(AtomicU64::new(0));
        let max_inside = Arc::new(AtomicU64::new(0));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let locks = locks.clone();
            let inside = inside.clone();
            let max_inside = max_inside.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.lock(&AuditId::new("AUDIT-1")).await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_inside.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_audits_do_not_block() {
        let locks = AuditLocks::new();
        let _a = locks.lock(&AuditId::new("AUDIT-A")).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.lock(&AuditId::new("AUDIT-B")))
            .await;
        assert!(b.is_ok());
        assert_eq!(locks.tracked().await, 2);
    }

    #[tokio::test]
    async fn release_keeps_entries_in_use() {
        let locks = AuditLocks::new();
        let idle = AuditId::new("AUDIT-1");
        let busy = AuditId::new("AUDIT-2");
        drop(locks.lock(&idle).await);
        let held = locks.lock(&busy).await;

        locks.release(&idle).await;
        locks.release(&busy).await;
        assert_eq!(locks.tracked().await, 1);

        drop(held);
        locks.release(&busy).await;
        assert_eq!(locks.tracked().await, 0);
    }
}
