//! Per-identity serialization
//!
//! Moderation of one identity (lookup, ledger call, commit) must not
//! interleave with another moderation of the same identity. Different
//! identities proceed in parallel.

use l2e_core::WalletAddress;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockTable = HashMap<WalletAddress, Arc<AsyncMutex<()>>>;

/// Lock table keyed by canonical identity
///
/// Entries are created on demand and removed when the last holder
/// releases with no waiter queued. Entries left behind by a waiter that
/// was cancelled after the holder released are swept on the next
/// acquire or release.
#[derive(Debug, Default, Clone)]
pub struct IdentityLocks {
    table: Arc<Mutex<LockTable>>,
}

/// Held while moderating one identity
#[derive(Debug)]
pub struct IdentityGuard {
    identity: WalletAddress,
    table: Arc<Mutex<LockTable>>,
    guard: OwnedMutexGuard<()>,
}

impl IdentityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `identity`
    pub async fn acquire(&self, identity: &WalletAddress) -> IdentityGuard {
        let entry = {
            let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
            sweep_idle(&mut table);
            table
                .entry(identity.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        IdentityGuard {
            identity: identity.clone(),
            table: self.table.clone(),
            guard: entry.lock_owned().await,
        }
    }

    /// Number of identities with a holder or waiter
    pub fn active(&self) -> usize {
        self.table.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Drop for IdentityGuard {
    fn drop(&mut self) {
        let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
        // One reference in the table, one in this guard: nobody is waiting
        let idle = table
            .get(&self.identity)
            .map(|entry| {
                Arc::ptr_eq(entry, OwnedMutexGuard::mutex(&self.guard))
                    && Arc::strong_count(entry) == 2
            })
            .unwrap_or(false);
        if idle {
            table.remove(&self.identity);
        }
        sweep_idle(&mut table);
    }
}

/// Drop entries only the table references (no holder, no waiter)
fn sweep_idle(table: &mut LockTable) {
    table.retain(|_, entry| Arc::strong_count(entry) > 1);
}
