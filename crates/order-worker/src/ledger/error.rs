use kv_actor::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    /// The stored value is not `{retryCount}|{payload}`.
    #[error("Malformed ledger value under {key}: {value:?}")]
    Malformed { key: String, value: String },

    #[error("Ledger store error: {0}")]
    Store(#[from] StoreError),
}
