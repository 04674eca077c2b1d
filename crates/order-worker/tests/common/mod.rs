#![allow(dead_code)]

use async_trait::async_trait;
use kv_actor::{KvActor, SharedStore};
use order_worker::clients::{
    BackoffPolicy, CustomerClient, EnrichmentGateway, ProductClient, StubHttp,
};
use order_worker::ledger::FailureLedger;
use order_worker::lock::LockManager;
use order_worker::model::Order;
use order_worker::pipeline::{OrderPipeline, PipelineSettings};
use order_worker::repository::{OrderRepository, RepositoryError, StoreOrderRepository};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const CUSTOMERS: &str = "http://svc/customers";
pub const PRODUCTS: &str = "http://svc/products";

pub fn customer_url(id: &str) -> String {
    format!("{CUSTOMERS}/{id}")
}

pub fn product_url(id: &str) -> String {
    format!("{PRODUCTS}/{id}")
}

/// Spawns an in-memory store shared by every pipeline of a test.
pub fn shared_store() -> SharedStore {
    let (actor, client) = KvActor::new(256);
    tokio::spawn(actor.run());
    Arc::new(client)
}

/// Registers an active customer and products priced 10, 20, ...
pub fn stub_catalog(http: &StubHttp, customer_id: &str, product_ids: &[&str]) {
    http.respond(
        &customer_url(customer_id),
        200,
        &format!(r#"{{"id":"{customer_id}","name":"Ana","email":"ana@example.com","status":"ACTIVE"}}"#),
    );
    for (i, id) in product_ids.iter().enumerate() {
        http.respond(
            &product_url(id),
            200,
            &format!(r#"{{"id":"{id}","name":"Item {id}","price":{}}}"#, (i + 1) * 10),
        );
    }
}

pub fn fast_backoff() -> BackoffPolicy {
    BackoffPolicy {
        max_attempts: 2,
        initial_interval: Duration::from_millis(5),
        multiplier: 2.0,
        jitter: 0.5,
    }
}

pub fn pipeline(
    store: SharedStore,
    http: Arc<StubHttp>,
    repository: Arc<dyn OrderRepository>,
) -> OrderPipeline {
    let gateway = EnrichmentGateway::new(
        CustomerClient::new(CUSTOMERS, http.clone(), fast_backoff()),
        ProductClient::new(PRODUCTS, http, fast_backoff()),
    );
    OrderPipeline::new(
        LockManager::new(store.clone()),
        gateway,
        FailureLedger::new(store),
        repository,
        PipelineSettings::default(),
    )
}

/// Store-backed repository that counts saves and can fail or stall them.
pub struct RecordingRepository {
    inner: StoreOrderRepository,
    saves: AtomicU32,
    failures_left: AtomicU32,
    save_delay: Duration,
}

impl RecordingRepository {
    pub fn new(store: SharedStore) -> Self {
        Self {
            inner: StoreOrderRepository::new(store),
            saves: AtomicU32::new(0),
            failures_left: AtomicU32::new(0),
            save_delay: Duration::ZERO,
        }
    }

    /// The next `count` saves fail with a store error.
    pub fn failing(self, count: u32) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = delay;
        self
    }

    pub fn saves(&self) -> u32 {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderRepository for RecordingRepository {
    async fn find_by_id(&self, order_id: &str) -> Result<Option<Order>, RepositoryError> {
        self.inner.find_by_id(order_id).await
    }

    async fn save(&self, order: &Order) -> Result<(), RepositoryError> {
        if !self.save_delay.is_zero() {
            tokio::time::sleep(self.save_delay).await;
        }
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(RepositoryError::Store(kv_actor::StoreError::Backend(
                "connection reset".into(),
            )));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(order).await
    }
}
