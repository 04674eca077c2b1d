//! # Store Messages
//!
//! This module defines the request type exchanged between a [`KvClient`](crate::KvClient)
//! and the [`KvActor`](crate::KvActor) that owns the map.

use crate::error::StoreError;
use std::time::Duration;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store actor.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Internal message type sent to the actor to request operations.
///
/// Each variant maps to one [`KeyValueStore`](crate::KeyValueStore) primitive. Because
/// the actor handles one request at a time, `SetIfAbsent` is a single atomic step:
/// no other request can observe the key between the existence check and the insert.
#[derive(Debug)]
pub enum KvRequest {
    SetIfAbsent {
        key: String,
        value: String,
        ttl: Duration,
        respond_to: Response<bool>,
    },
    Get {
        key: String,
        respond_to: Response<Option<String>>,
    },
    Set {
        key: String,
        value: String,
        respond_to: Response<()>,
    },
    Delete {
        key: String,
        respond_to: Response<bool>,
    },
}

impl KvRequest {
    /// The key this request targets.
    pub fn key(&self) -> &str {
        match self {
            KvRequest::SetIfAbsent { key, .. }
            | KvRequest::Get { key, .. }
            | KvRequest::Set { key, .. }
            | KvRequest::Delete { key, .. } => key,
        }
    }

    /// Short operation name, used in log fields and mock diagnostics.
    pub fn op(&self) -> &'static str {
        match self {
            KvRequest::SetIfAbsent { .. } => "set_if_absent",
            KvRequest::Get { .. } => "get",
            KvRequest::Set { .. } => "set",
            KvRequest::Delete { .. } => "delete",
        }
    }
}
