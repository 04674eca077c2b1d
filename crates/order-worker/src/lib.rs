//! # Order Worker
//!
//! Idempotent order enrichment on top of an at-least-once message stream. Each order
//! message is locked, checked for duplicates, enriched with customer and product data,
//! persisted once, and on failure recorded in a failure ledger instead of being
//! re-delivered.
//!
//! ## Core Components
//!
//! - **[lock]**: per-order mutual exclusion via conditional create with a TTL.
//! - **[clients]**: customer and product lookups with retry, backoff and not-found
//!   classification, bundled in [`EnrichmentGateway`](clients::EnrichmentGateway).
//! - **[ledger]**: `failed-order:{id}` records of retry count and last error.
//! - **[pipeline]**: the per-message state machine tying the above together.
//! - **[consumer]**: decodes deliveries, bounds concurrency, acknowledges everything.
//! - **[lifecycle]**: wiring from [`WorkerConfig`](config::WorkerConfig), shutdown, tracing.
//!
//! All shared state (locks, ledger records, orders) lives in a
//! [`KeyValueStore`](kv_actor::KeyValueStore) backend, so tests swap in the in-memory
//! actor or the mock store.

pub mod clients;
pub mod config;
pub mod consumer;
pub mod ledger;
pub mod lifecycle;
pub mod lock;
pub mod model;
pub mod pipeline;
pub mod repository;
