//! # Failure Ledger
//!
//! Durable per-order record of how often processing failed and what the last failure
//! said. Stored as one string under `failed-order:{order_id}`:
//!
//! ```text
//! failed-order:o1  =>  "2|Error while retrieving customer c1: status 503"
//! ```
//!
//! Non-retryable failures are written once with count `0` (dead letter). Retryable
//! failures read, bump and write the count; the read and the write are separate store
//! calls, so two concurrent increments of the same order can lose one.

mod error;
mod record;

pub use error::LedgerError;
pub use record::FailureRecord;

use kv_actor::SharedStore;
use tracing::{debug, instrument};

/// Store key holding the failure record of `order_id`.
pub fn ledger_key(order_id: &str) -> String {
    format!("failed-order:{order_id}")
}

#[derive(Clone)]
pub struct FailureLedger {
    store: SharedStore,
}

impl FailureLedger {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Overwrites the record of `order_id`.
    #[instrument(skip(self, payload))]
    pub async fn store(
        &self,
        order_id: &str,
        payload: &str,
        retry_count: u32,
    ) -> Result<(), LedgerError> {
        let record = FailureRecord::new(order_id, retry_count, payload);
        self.store
            .set(&ledger_key(order_id), &record.encode())
            .await?;
        debug!("Failure recorded");
        Ok(())
    }

    /// Bumps the retry count and keeps the payload.
    ///
    /// Returns the new count, or `None` without writing anything when no record exists.
    #[instrument(skip(self))]
    pub async fn increment(&self, order_id: &str) -> Result<Option<u32>, LedgerError> {
        let Some(mut record) = self.read(order_id).await? else {
            return Ok(None);
        };
        record.retry_count = record.retry_count.saturating_add(1);
        self.store
            .set(&ledger_key(order_id), &record.encode())
            .await?;
        debug!(retry_count = record.retry_count, "Retry count incremented");
        Ok(Some(record.retry_count))
    }

    pub async fn read(&self, order_id: &str) -> Result<Option<FailureRecord>, LedgerError> {
        let key = ledger_key(order_id);
        match self.store.get(&key).await? {
            Some(value) => FailureRecord::decode(order_id, &key, &value).map(Some),
            None => Ok(None),
        }
    }

    /// Deletes the record. Returns whether one existed.
    #[instrument(skip(self))]
    pub async fn remove(&self, order_id: &str) -> Result<bool, LedgerError> {
        Ok(self.store.delete(&ledger_key(order_id)).await?)
    }
}
