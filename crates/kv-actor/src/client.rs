//! # Store Client
//!
//! This module defines the client half of the in-memory store.

use crate::error::StoreError;
use crate::message::{KvRequest, Response};
use crate::store::KeyValueStore;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{instrument, trace};

/// ## KvClient
///
/// The `KvClient` forwards store operations over a Tokio mpsc channel to a
/// [`KvActor`](crate::KvActor) and returns results via oneshot channels.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Backend-agnostic callers** – implements [`KeyValueStore`], so domain code never
///   knows it is talking to an actor.
#[derive(Clone)]
pub struct KvClient {
    sender: mpsc::Sender<KvRequest>,
}

impl KvClient {
    pub fn new(sender: mpsc::Sender<KvRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> KvRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }
}

#[async_trait]
impl KeyValueStore for KvClient {
    #[instrument(skip(self, value))]
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        trace!("Sending request");
        self.request(|respond_to| KvRequest::SetIfAbsent {
            key: key.to_string(),
            value: value.to_string(),
            ttl,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        trace!("Sending request");
        self.request(|respond_to| KvRequest::Get {
            key: key.to_string(),
            respond_to,
        })
        .await
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        trace!("Sending request");
        self.request(|respond_to| KvRequest::Set {
            key: key.to_string(),
            value: value.to_string(),
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        trace!("Sending request");
        self.request(|respond_to| KvRequest::Delete {
            key: key.to_string(),
            respond_to,
        })
        .await
    }
}
