//! # Order Pipeline
//!
//! Processes one [`OrderMessage`] from lock to ledger. Every step is a suspension point;
//! only the product lookups run concurrently.
//!
//! ```text
//! LockAttempt ──held/unreachable──▶ Skipped
//!      │ acquired
//!      ▼
//! DuplicateCheck ─▶ CustomerFetch ─▶ ProductFetch ─▶ Assemble ─▶ Persist ─▶ Persisted
//!      │                 │                │                         │
//!      └─────────────────┴────────────────┴─────────────────────────┘
//!                                 │ any failure
//!                                 ▼
//!                         Classify-and-Record ─▶ Failed
//! ```
//!
//! Once the lock is taken it is released on every path, after the ledger update.
//!
//! ## Failure classification
//!
//! | Error | Ledger action |
//! |-------|---------------|
//! | not found, inactive customer, duplicate | `store(0, message)` |
//! | external service, persistence | bump count; `store(count, message)` below the ceiling |
//!
//! [`process`](OrderPipeline::process) never returns an error: whatever happens is reduced
//! to log lines, an optional ledger write and a [`ProcessOutcome`].

mod error;
mod outcome;

pub use error::ProcessingError;
pub use outcome::{FailureDisposition, ProcessOutcome, SkipReason};

use crate::clients::EnrichmentGateway;
use crate::ledger::{FailureLedger, LedgerError};
use crate::lock::{lock_key, LockManager};
use crate::model::{Order, OrderMessage};
use crate::repository::SharedRepository;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Tunables of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub lock_ttl: Duration,
    /// Retry count at which a retryable failure is abandoned.
    pub retry_ceiling: u32,
    /// Delete a stale failure record once the order is persisted.
    pub clear_ledger_on_success: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            lock_ttl: Duration::from_secs(60),
            retry_ceiling: 3,
            clear_ledger_on_success: false,
        }
    }
}

#[derive(Clone)]
pub struct OrderPipeline {
    locks: LockManager,
    gateway: EnrichmentGateway,
    ledger: FailureLedger,
    repository: SharedRepository,
    settings: PipelineSettings,
}

impl OrderPipeline {
    pub fn new(
        locks: LockManager,
        gateway: EnrichmentGateway,
        ledger: FailureLedger,
        repository: SharedRepository,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            locks,
            gateway,
            ledger,
            repository,
            settings,
        }
    }

    #[instrument(skip(self, message), fields(order_id = %message.order_id))]
    pub async fn process(&self, message: &OrderMessage) -> ProcessOutcome {
        let key = lock_key(&message.order_id);
        match self.locks.try_acquire(&key, self.settings.lock_ttl).await {
            Ok(true) => debug!("Lock acquired"),
            Ok(false) => {
                warn!("Order is locked by another worker, skipping");
                return ProcessOutcome::Skipped(SkipReason::LockHeld);
            }
            Err(e) => {
                warn!(error = %e, "Could not determine lock state, skipping");
                return ProcessOutcome::Skipped(SkipReason::LockUnavailable);
            }
        }

        let outcome = match self.enrich_and_persist(message).await {
            Ok(order) => {
                info!(products = order.products.len(), "Order persisted");
                if self.settings.clear_ledger_on_success {
                    self.clear_ledger(&message.order_id).await;
                }
                ProcessOutcome::Persisted
            }
            Err(e) => ProcessOutcome::Failed(self.record_failure(&message.order_id, &e).await),
        };

        if let Err(e) = self.locks.release(&key).await {
            warn!(error = %e, "Failed to release lock");
        }
        outcome
    }

    async fn enrich_and_persist(&self, message: &OrderMessage) -> Result<Order, ProcessingError> {
        if self.repository.find_by_id(&message.order_id).await?.is_some() {
            return Err(ProcessingError::OrderAlreadyExists(message.order_id.clone()));
        }

        let customer = self.gateway.fetch_customer(&message.customer_id).await?;
        if !customer.is_active() {
            debug!(status = %customer.status, "Customer is not active");
            return Err(ProcessingError::InactiveCustomer(message.customer_id.clone()));
        }

        let products = self.gateway.fetch_products(&message.product_ids).await?;
        let order = Order::assemble(message, products);
        self.repository.save(&order).await?;
        Ok(order)
    }

    async fn record_failure(&self, order_id: &str, failure: &ProcessingError) -> FailureDisposition {
        let recorded = if failure.is_retryable() {
            self.record_retry(order_id, failure).await
        } else {
            error!(error = %failure, "Non-retryable failure, dead-lettering order");
            self.ledger
                .store(order_id, &failure.to_string(), 0)
                .await
                .map(|_| FailureDisposition::DeadLettered)
        };

        recorded.unwrap_or_else(|e| {
            error!(error = %e, failure = %failure, "Failed to update failure ledger");
            FailureDisposition::LedgerUnavailable
        })
    }

    async fn record_retry(
        &self,
        order_id: &str,
        failure: &ProcessingError,
    ) -> Result<FailureDisposition, LedgerError> {
        let retry_count = self.ledger.increment(order_id).await?.unwrap_or(1);
        if retry_count >= self.settings.retry_ceiling {
            error!(retry_count, error = %failure, "Retry ceiling reached, abandoning order");
            return Ok(FailureDisposition::RetriesExhausted(retry_count));
        }

        self.ledger
            .store(order_id, &failure.to_string(), retry_count)
            .await?;
        warn!(retry_count, error = %failure, "Retryable failure recorded");
        Ok(FailureDisposition::RetryRecorded(retry_count))
    }

    async fn clear_ledger(&self, order_id: &str) {
        match self.ledger.remove(order_id).await {
            Ok(true) => debug!("Stale failure record cleared"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Failed to clear failure record"),
        }
    }
}
