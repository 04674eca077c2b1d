//! # Observability & Tracing
//!
//! Log lines carry the order being processed as a span field, so one order can be
//! followed from lock to ledger:
//!
//! ```text
//! INFO process{order_id="o1"}: Order persisted products=2
//! WARN process{order_id="o2"}: Order is locked by another worker, skipping
//! ERROR process{order_id="o3"}: Non-retryable failure, dead-lettering order error=Customer not found with ID: c9
//! ```
//!
//! ```bash
//! RUST_LOG=info cargo run            # outcomes only
//! RUST_LOG=order_worker=debug cargo run   # every state transition and HTTP attempt
//! ```
use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
