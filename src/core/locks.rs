//! Per-item write serialization.
//!
//! The item row is the only shared mutable resource in the ledger, so writes are
//! serialized per item: one async mutex per item id, handed out from a registry.
//! Movements against different items never contend, and reads never take a lock.
//! Acquisition is bounded; a writer that cannot get the lock in time fails with
//! [`Error::Busy`] and may be retried by the caller, since no partial state exists.

use crate::errors::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-item write locks. Cheap to clone; clones share the registry.
#[derive(Clone, Debug, Default)]
pub struct ItemLocks {
    inner: Arc<StdMutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl ItemLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the write lock for `item_id`, waiting at most `timeout`.
    ///
    /// The returned guard serializes the whole validate-and-apply section for
    /// that item; dropping it releases the lock.
    pub async fn acquire(&self, item_id: i64, timeout: Duration) -> Result<OwnedMutexGuard<()>> {
        let lock = self.lock_for(item_id);
        tokio::time::timeout(timeout, lock.lock_owned())
            .await
            .map_err(|_| Error::Busy { item_id })
    }

    fn lock_for(&self, item_id: i64) -> Arc<Mutex<()>> {
        // Registry access is a short critical section; the std mutex is never
        // held across an await point.
        let mut map = match self.inner.lock() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(map.entry(item_id).or_default())
    }
}
