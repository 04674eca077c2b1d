//! # Order Repository
//!
//! Find-by-id and save-by-id on assembled orders. The pipeline only depends on the
//! [`OrderRepository`] trait; [`StoreOrderRepository`] keeps orders as JSON in the
//! shared key-value backend under `order:{order_id}`.

use crate::model::Order;
use async_trait::async_trait;
use kv_actor::{SharedStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RepositoryError {
    #[error("Persistence store error: {0}")]
    Store(#[from] StoreError),

    #[error("Order encoding error: {0}")]
    Encoding(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encoding(e.to_string())
    }
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, order_id: &str) -> Result<Option<Order>, RepositoryError>;

    async fn save(&self, order: &Order) -> Result<(), RepositoryError>;
}

pub type SharedRepository = Arc<dyn OrderRepository>;

/// Store key holding the persisted order `order_id`.
pub fn order_key(order_id: &str) -> String {
    format!("order:{order_id}")
}

#[derive(Clone)]
pub struct StoreOrderRepository {
    store: SharedStore,
}

impl StoreOrderRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OrderRepository for StoreOrderRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, order_id: &str) -> Result<Option<Order>, RepositoryError> {
        match self.store.get(&order_key(order_id)).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    async fn save(&self, order: &Order) -> Result<(), RepositoryError> {
        let json = serde_json::to_string(order)?;
        self.store.set(&order_key(&order.order_id), &json).await?;
        debug!("Order saved");
        Ok(())
    }
}
