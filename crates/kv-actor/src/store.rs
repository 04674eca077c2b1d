//! # KeyValueStore Trait
//!
//! The contract every backend implements: an atomic conditional create with expiry,
//! plain reads and writes, and an unconditional delete. Domain code only ever sees
//! `Arc<dyn KeyValueStore>`, so the in-memory actor, Redis and the test mocks are
//! interchangeable.
use crate::error::StoreError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Shared handle to a key-value backend.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Minimal key-value contract used for locks, the failure ledger and order storage.
///
/// # Example
///
/// ```rust
/// use kv_actor::{KeyValueStore, KvActor};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = KvActor::new(16);
///     tokio::spawn(actor.run());
///
///     let first = client.set_if_absent("lock:o1", "locked", Duration::from_secs(60)).await.unwrap();
///     let second = client.set_if_absent("lock:o1", "locked", Duration::from_secs(60)).await.unwrap();
///     assert!(first);
///     assert!(!second);
/// }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Creates `key` with `value` and expiry `ttl` iff it does not exist.
    ///
    /// Returns `true` iff this call created the key.
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError>;

    /// Reads the current value of `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `value` under `key` without expiry, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Returns `true` iff the key existed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;
}
