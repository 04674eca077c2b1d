//! # System Lifecycle
//!
//! Wiring and teardown of the worker.
//!
//! [`WorkerSystem::start`] builds everything leaves first:
//!
//! 1. **Store backend** - spawns the in-memory [`KvActor`](kv_actor::KvActor) or connects
//!    to Redis. Locks, ledger records and orders all live here.
//! 2. **HTTP and clients** - one `reqwest` client shared by the customer and product
//!    clients, both under the configured [`BackoffPolicy`](crate::clients::BackoffPolicy).
//! 3. **Pipeline** - lock manager, gateway, ledger and repository.
//! 4. **Consumer** - the pipeline behind a bounded number of in-flight deliveries.
//!
//! [`WorkerSystem::shutdown`] reverses this: dropping the consumer drops every store
//! client, the actor sees its channel close and exits, and the handle is awaited.
//!
//! [`setup_tracing`] installs the `tracing` subscriber and is called once by the binary.

pub mod tracing;
pub mod worker_system;

pub use self::tracing::setup_tracing;
pub use worker_system::{SystemError, WorkerSystem};
