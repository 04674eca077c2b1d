//! # Store Errors
//!
//! This module defines the error type shared by every [`KeyValueStore`](crate::KeyValueStore)
//! backend. Callers treat every variant as transient: the store could not answer, so
//! the state of the key is unknown.

/// Errors that can occur while talking to a key-value backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Store actor closed")]
    ActorClosed,
    #[error("Store actor dropped response channel")]
    ActorDropped,
    #[error("Store backend error: {0}")]
    Backend(String),
}
