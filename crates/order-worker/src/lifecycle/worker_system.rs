use crate::clients::{
    CustomerClient, EnrichmentGateway, HttpGet, ProductClient, ReqwestHttp, TransportError,
};
use crate::config::{StoreBackend, WorkerConfig};
use crate::consumer::OrderConsumer;
use crate::ledger::FailureLedger;
use crate::lock::LockManager;
use crate::pipeline::OrderPipeline;
use crate::repository::StoreOrderRepository;
use kv_actor::{KvActor, RedisStore, SharedStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

const STORE_BUFFER: usize = 256;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] TransportError),

    #[error("Key-value store setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// The running worker: backend, clients, pipeline and consumer wired together.
///
/// # Example
///
/// ```ignore
/// let system = WorkerSystem::start(WorkerConfig::from_env()?).await?;
/// system.consumer.run(deliveries).await;
/// system.shutdown().await?;
/// ```
pub struct WorkerSystem {
    /// Entry point for deliveries from the message stream
    pub consumer: OrderConsumer,

    /// Backend holding locks, ledger records and orders
    pub store: SharedStore,

    /// Backend tasks owned by the system (the in-memory actor)
    handles: Vec<JoinHandle<()>>,
}

impl WorkerSystem {
    /// Connects or spawns the store backend and wires every component on top of it.
    pub async fn start(config: WorkerConfig) -> Result<Self, SystemError> {
        let mut handles = vec![];
        let store: SharedStore = match config.store_backend {
            StoreBackend::Memory => {
                let (actor, client) = KvActor::new(STORE_BUFFER);
                handles.push(tokio::spawn(actor.run()));
                Arc::new(client)
            }
            StoreBackend::Redis => Arc::new(RedisStore::connect(&config.redis_url).await?),
        };

        let http: Arc<dyn HttpGet> = Arc::new(ReqwestHttp::new(config.http_timeout())?);
        let policy = config.backoff_policy();
        let gateway = EnrichmentGateway::new(
            CustomerClient::new(&config.customer_base_url, http.clone(), policy.clone()),
            ProductClient::new(&config.product_base_url, http, policy),
        );

        let pipeline = OrderPipeline::new(
            LockManager::new(store.clone()),
            gateway,
            FailureLedger::new(store.clone()),
            Arc::new(StoreOrderRepository::new(store.clone())),
            config.pipeline_settings(),
        );

        info!(backend = ?config.store_backend, "Worker system started");
        Ok(Self {
            consumer: OrderConsumer::new(pipeline, config.max_in_flight),
            store,
            handles,
        })
    }

    /// Drops every store client, then waits for the backend tasks to exit.
    ///
    /// Clones of [`consumer`](Self::consumer) or [`store`](Self::store) handed out
    /// earlier must be dropped first, or the in-memory actor never sees its channel close.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down worker system...");
        drop(self.consumer);
        drop(self.store);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Backend task failed");
                return Err(SystemError::Task(e.to_string()));
            }
        }

        info!("Worker system shutdown complete.");
        Ok(())
    }
}
