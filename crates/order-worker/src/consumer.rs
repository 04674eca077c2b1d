//! # Order Consumer
//!
//! Stands between the message stream and the pipeline. Every delivery is acknowledged,
//! whatever happened to it: recovery goes through the failure ledger, never through
//! re-delivery, so one bad message can not block the ones behind it.

use crate::model::OrderMessage;
use crate::pipeline::{OrderPipeline, ProcessOutcome};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// How a delivery was handled. Both variants are acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Processed(ProcessOutcome),
    /// The payload is not an order message.
    Rejected,
}

#[derive(Clone)]
pub struct OrderConsumer {
    pipeline: Arc<OrderPipeline>,
    max_in_flight: usize,
}

impl OrderConsumer {
    pub fn new(pipeline: OrderPipeline, max_in_flight: usize) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Decodes and processes one raw delivery.
    pub async fn handle(&self, payload: &str) -> Delivery {
        let message: OrderMessage = match serde_json::from_str(payload) {
            Ok(message) => message,
            Err(e) => {
                error!(error = %e, "Undecodable order message, acknowledging");
                return Delivery::Rejected;
            }
        };
        let outcome = self.pipeline.process(&message).await;
        debug!(order_id = %message.order_id, ?outcome, "Delivery acknowledged");
        Delivery::Processed(outcome)
    }

    /// Consumes deliveries until the channel closes, then waits for in-flight work.
    ///
    /// At most `max_in_flight` deliveries are processed at the same time. Returns the
    /// number of deliveries handled.
    pub async fn run(&self, mut deliveries: mpsc::Receiver<String>) -> usize {
        let permits = Arc::new(Semaphore::new(self.max_in_flight));
        let mut tasks = JoinSet::new();
        let mut handled = 0;

        info!(max_in_flight = self.max_in_flight, "Consumer started");
        while let Some(payload) = deliveries.recv().await {
            let Ok(permit) = permits.clone().acquire_owned().await else {
                break;
            };
            let consumer = self.clone();
            tasks.spawn(async move {
                let delivery = consumer.handle(&payload).await;
                drop(permit);
                delivery
            });
            handled += 1;

            // Reap finished tasks so the set does not grow with the stream.
            while let Some(joined) = tasks.try_join_next() {
                log_join(joined);
            }
        }

        debug!(in_flight = tasks.len(), "Stream closed, draining");
        while let Some(joined) = tasks.join_next().await {
            log_join(joined);
        }
        info!(handled, "Consumer stopped");
        handled
    }
}

fn log_join(joined: Result<Delivery, tokio::task::JoinError>) {
    if let Err(e) = joined {
        warn!(error = %e, "Delivery task failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{BackoffPolicy, CustomerClient, EnrichmentGateway, ProductClient, StubHttp};
    use crate::ledger::FailureLedger;
    use crate::lock::LockManager;
    use crate::pipeline::PipelineSettings;
    use crate::repository::StoreOrderRepository;
    use kv_actor::{KeyValueStore, KvActor, SharedStore};
    use std::time::Duration;

    fn consumer(http: Arc<StubHttp>, store: SharedStore, max_in_flight: usize) -> OrderConsumer {
        let policy = BackoffPolicy {
            max_attempts: 0,
            ..BackoffPolicy::default()
        };
        let pipeline = OrderPipeline::new(
            LockManager::new(store.clone()),
            EnrichmentGateway::new(
                CustomerClient::new("http://svc/customers", http.clone(), policy.clone()),
                ProductClient::new("http://svc/products", http, policy),
            ),
            FailureLedger::new(store.clone()),
            Arc::new(StoreOrderRepository::new(store)),
            PipelineSettings::default(),
        );
        OrderConsumer::new(pipeline, max_in_flight)
    }

    fn store() -> SharedStore {
        let (actor, client) = KvActor::new(64);
        tokio::spawn(actor.run());
        Arc::new(client)
    }

    #[tokio::test]
    async fn test_bad_payload_is_rejected_not_processed() {
        let http = Arc::new(StubHttp::new());
        let consumer = consumer(http.clone(), store(), 4);

        assert_eq!(consumer.handle("not json").await, Delivery::Rejected);
        assert_eq!(consumer.handle(r#"{"orderId":"o1"}"#).await, Delivery::Rejected);
        assert_eq!(http.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_run_drains_every_delivery() {
        let http = Arc::new(StubHttp::with_latency(Duration::from_millis(5)));
        let store = store();
        for i in 0..10 {
            http.respond(
                &format!("http://svc/customers/c{i}"),
                200,
                &format!(r#"{{"id":"c{i}","status":"ACTIVE"}}"#),
            );
        }
        let consumer = consumer(http, store.clone(), 3);

        let (sender, receiver) = mpsc::channel(4);
        let feeder = tokio::spawn(async move {
            for i in 0..10 {
                let payload = format!(r#"{{"orderId":"o{i}","customerId":"c{i}","products":[]}}"#);
                sender.send(payload).await.unwrap();
            }
            sender.send("garbage".to_string()).await.unwrap();
        });

        assert_eq!(consumer.run(receiver).await, 11);
        feeder.await.unwrap();

        for i in 0..10 {
            assert!(store.get(&format!("order:o{i}")).await.unwrap().is_some());
        }
    }
}
