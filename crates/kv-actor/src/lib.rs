//! # KV Actor
//!
//! Pluggable key-value backends for coordinating worker processes. The crate offers a
//! single async contract, [`KeyValueStore`], and three ways to satisfy it:
//!
//! 1. **[`KvActor`] + [`KvClient`]** - an in-memory map owned by a Tokio task. Requests
//!    arrive over an mpsc channel and are handled one at a time, so conditional create
//!    is atomic without any locking. Used for single-process runs and as the shared fake
//!    in tests.
//! 2. **[`RedisStore`]** - the networked backend used when several worker replicas must
//!    see the same locks and ledger entries.
//! 3. **[`mock::MockStore`]** - scripted replies for unit tests and outage simulation.
//!
//! ## Concurrency Model
//!
//! - The actor runs in its own Tokio task and owns the map exclusively.
//! - Clients are cheap clones of an mpsc sender; any number of tasks may share them.
//! - Keys may carry an expiry, measured on the tokio clock. Expired keys are dropped when
//!   touched and by a periodic sweep.
//!
//! ## Example
//!
//! ```rust
//! use kv_actor::{KeyValueStore, KvActor, SharedStore};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = KvActor::new(32);
//!     tokio::spawn(actor.run());
//!
//!     let store: SharedStore = Arc::new(client);
//!     assert!(store.set_if_absent("lock:o1", "locked", Duration::from_secs(60)).await.unwrap());
//!     assert!(store.delete("lock:o1").await.unwrap());
//! }
//! ```

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod mock;
pub mod redis_store;
pub mod store;

pub use actor::KvActor;
pub use client::KvClient;
pub use error::StoreError;
pub use message::{KvRequest, Response};
pub use redis_store::RedisStore;
pub use store::{KeyValueStore, SharedStore};
