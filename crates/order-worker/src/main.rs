//! # Order Worker
//!
//! Reads newline-delimited JSON order messages from stdin and runs each through the
//! pipeline:
//!
//! ```bash
//! echo '{"orderId":"o1","customerId":"c1","products":["p1","p2"]}' \
//!     | RUST_LOG=info ORDER_WORKER_CUSTOMER_BASE_URL=http://crm/customers cargo run
//! ```
//!
//! Configuration comes from `ORDER_WORKER_*` variables, see [`WorkerConfig`].

use order_worker::config::WorkerConfig;
use order_worker::lifecycle::{setup_tracing, WorkerSystem};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = WorkerConfig::from_env().map_err(|e| e.to_string())?;
    info!(
        backend = ?config.store_backend,
        customer_base_url = %config.customer_base_url,
        product_base_url = %config.product_base_url,
        "Starting order worker"
    );

    let system = WorkerSystem::start(config)
        .await
        .map_err(|e| e.to_string())?;

    let (sender, receiver) = mpsc::channel(64);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => {
                    if sender.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "Failed to read stdin");
                    break;
                }
            }
        }
    });

    let handled = system.consumer.run(receiver).await;
    if let Err(e) = reader.await {
        error!(error = %e, "Stdin reader failed");
    }

    system.shutdown().await.map_err(|e| e.to_string())?;
    info!(handled, "Order worker stopped");
    Ok(())
}
