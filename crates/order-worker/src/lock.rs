//! # Lock Manager
//!
//! Per-order mutual exclusion on top of the shared key-value store. The existence of
//! `lock:{order_id}` *is* the lock; nothing else is kept by the holder.
//!
//! - [`LockManager::try_acquire`] never waits. A `false` means someone else holds the key
//!   and the caller must skip.
//! - [`LockManager::release`] deletes unconditionally. There is no ownership token, so a
//!   holder whose TTL already lapsed can delete a successor's lock.

use kv_actor::{SharedStore, StoreError};
use std::time::Duration;
use tracing::{debug, instrument};

const LOCKED: &str = "locked";

/// Store key guarding `order_id`.
pub fn lock_key(order_id: &str) -> String {
    format!("lock:{order_id}")
}

#[derive(Clone)]
pub struct LockManager {
    store: SharedStore,
}

impl LockManager {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Creates `key` with a TTL iff it is absent. Returns `true` when this call created it.
    #[instrument(skip(self))]
    pub async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        let acquired = self.store.set_if_absent(key, LOCKED, ttl).await?;
        debug!(acquired, "Lock attempt");
        Ok(acquired)
    }

    #[instrument(skip(self))]
    pub async fn release(&self, key: &str) -> Result<(), StoreError> {
        let existed = self.store.delete(key).await?;
        debug!(existed, "Lock released");
        Ok(())
    }
}
