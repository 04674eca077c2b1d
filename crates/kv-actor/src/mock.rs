//! # Mock Store & Testing Guide
//!
//! `MockStore` hands out a real [`KvClient`] whose requests are answered from a queue of
//! scripted expectations instead of a map. It lets you test code *around* the store
//! (lock handling, ledger parsing, failure classification) deterministically, and makes
//! outage simulation trivial.
//!
//! ## When to use Mocks vs the Real Actor
//!
//! | Feature | MockStore | KvActor |
//! |---------|-----------|---------|
//! | **State** | None (scripted replies) | Real map with TTL |
//! | **Error Injection** | Easy (`return_err`) | Impossible |
//! | **Call verification** | Order and keys checked | Only via final state |
//! | **Use Case** | Unit tests of one component | Shared fake for end-to-end tests |
//!
//! ## Scripted replies
//!
//! ```rust
//! use kv_actor::mock::MockStore;
//! use kv_actor::{KeyValueStore, StoreError};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockStore::new();
//!     mock.expect_set_if_absent("lock:o1").return_ok(false);
//!     mock.expect_get("failed-order:o1")
//!         .return_err(StoreError::Backend("connection refused".into()));
//!
//!     let store = mock.client();
//!     assert!(!store.set_if_absent("lock:o1", "locked", Duration::from_secs(60)).await.unwrap());
//!     assert!(store.get("failed-order:o1").await.is_err());
//!
//!     mock.verify();
//! }
//! ```
//!
//! ## Holding a request open
//!
//! Use [`create_mock_store`] when a test needs to decide *when* a request is answered,
//! e.g. to force two callers to interleave in a specific order.

use crate::client::KvClient;
use crate::error::StoreError;
use crate::message::KvRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected request to the mock store.
#[derive(Debug)]
pub enum Expectation {
    SetIfAbsent {
        key: String,
        response: Result<bool, StoreError>,
    },
    Get {
        key: String,
        response: Result<Option<String>, StoreError>,
    },
    Set {
        key: String,
        response: Result<(), StoreError>,
    },
    Delete {
        key: String,
        response: Result<bool, StoreError>,
    },
}

type Queue = Arc<Mutex<VecDeque<Expectation>>>;

/// A mock store with expectation tracking for fluent testing.
///
/// Requests are matched in order. A request whose operation or key differs from the
/// next expectation is answered with [`StoreError::Backend`] and recorded; [`verify`](Self::verify)
/// panics on any recorded mismatch or unconsumed expectation.
pub struct MockStore {
    client: KvClient,
    expectations: Queue,
    mismatches: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    /// Creates a new mock store with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<KvRequest>(100);
        let expectations: Queue = Arc::new(Mutex::new(VecDeque::new()));
        let mismatches = Arc::new(Mutex::new(Vec::new()));
        let expectations_clone = expectations.clone();
        let mismatches_clone = mismatches.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();
                if let Err(reason) = answer(request, expectation) {
                    mismatches_clone.lock().unwrap().push(reason);
                }
            }
        });

        Self {
            client: KvClient::new(sender),
            expectations,
            mismatches,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> KvClient {
        self.client.clone()
    }

    pub fn expect_set_if_absent(&mut self, key: &str) -> ExpectationBuilder<bool> {
        self.builder(key, |key, response| Expectation::SetIfAbsent { key, response })
    }

    pub fn expect_get(&mut self, key: &str) -> ExpectationBuilder<Option<String>> {
        self.builder(key, |key, response| Expectation::Get { key, response })
    }

    pub fn expect_set(&mut self, key: &str) -> ExpectationBuilder<()> {
        self.builder(key, |key, response| Expectation::Set { key, response })
    }

    pub fn expect_delete(&mut self, key: &str) -> ExpectationBuilder<bool> {
        self.builder(key, |key, response| Expectation::Delete { key, response })
    }

    fn builder<T>(
        &self,
        key: &str,
        wrap: fn(String, Result<T, StoreError>) -> Expectation,
    ) -> ExpectationBuilder<T> {
        ExpectationBuilder {
            key: key.to_string(),
            wrap,
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met, in order, with matching keys.
    pub fn verify(&self) {
        let mismatches = self.mismatches.lock().unwrap();
        if !mismatches.is_empty() {
            panic!("Unexpected store requests: {:?}", *mismatches);
        }
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining: {:?}",
                exps.len(),
                *exps
            );
        }
    }
}

/// Builder returned by the `expect_*` methods of [`MockStore`].
pub struct ExpectationBuilder<T> {
    key: String,
    wrap: fn(String, Result<T, StoreError>) -> Expectation,
    expectations: Queue,
}

impl<T> ExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, StoreError>) {
        let expectation = (self.wrap)(self.key, response);
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

fn answer(request: KvRequest, expectation: Option<Expectation>) -> Result<(), String> {
    let received = format!("{} {}", request.op(), request.key());
    match (request, expectation) {
        (
            KvRequest::SetIfAbsent {
                key, respond_to, ..
            },
            Some(Expectation::SetIfAbsent {
                key: expected,
                response,
            }),
        ) if key == expected => {
            let _ = respond_to.send(response);
            Ok(())
        }
        (
            KvRequest::Get { key, respond_to },
            Some(Expectation::Get {
                key: expected,
                response,
            }),
        ) if key == expected => {
            let _ = respond_to.send(response);
            Ok(())
        }
        (
            KvRequest::Set {
                key, respond_to, ..
            },
            Some(Expectation::Set {
                key: expected,
                response,
            }),
        ) if key == expected => {
            let _ = respond_to.send(response);
            Ok(())
        }
        (
            KvRequest::Delete { key, respond_to },
            Some(Expectation::Delete {
                key: expected,
                response,
            }),
        ) if key == expected => {
            let _ = respond_to.send(response);
            Ok(())
        }
        (request, expectation) => {
            let reason = format!("received `{received}`, expected {expectation:?}");
            reject(request, &reason);
            Err(reason)
        }
    }
}

fn reject(request: KvRequest, reason: &str) {
    let error = StoreError::Backend(format!("mock mismatch: {reason}"));
    match request {
        KvRequest::SetIfAbsent { respond_to, .. } => {
            let _ = respond_to.send(Err(error));
        }
        KvRequest::Get { respond_to, .. } => {
            let _ = respond_to.send(Err(error));
        }
        KvRequest::Set { respond_to, .. } => {
            let _ = respond_to.send(Err(error));
        }
        KvRequest::Delete { respond_to, .. } => {
            let _ = respond_to.send(Err(error));
        }
    }
}

// =============================================================================
// MANUAL HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// Nothing answers on its own: the test pulls requests with [`expect_set_if_absent`]
/// (or `receiver.recv()`) and replies whenever it chooses.
pub fn create_mock_store(buffer_size: usize) -> (KvClient, mpsc::Receiver<KvRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (KvClient::new(sender), receiver)
}

/// Helper to verify that the next message is a SetIfAbsent request.
pub async fn expect_set_if_absent(
    receiver: &mut mpsc::Receiver<KvRequest>,
) -> Option<(String, oneshot::Sender<Result<bool, StoreError>>)> {
    match receiver.recv().await {
        Some(KvRequest::SetIfAbsent {
            key, respond_to, ..
        }) => Some((key, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValueStore;
    use std::time::Duration;

    #[tokio::test]
    async fn test_manual_mock_holds_request_open() {
        let (client, mut receiver) = create_mock_store(10);

        let acquire = tokio::spawn(async move {
            client
                .set_if_absent("lock:o1", "locked", Duration::from_secs(60))
                .await
        });

        let (key, responder) = expect_set_if_absent(&mut receiver)
            .await
            .expect("Expected SetIfAbsent request");
        assert_eq!(key, "lock:o1");
        responder.send(Ok(true)).unwrap();

        assert_eq!(acquire.await.unwrap(), Ok(true));
    }

    #[tokio::test]
    async fn test_mock_store_with_expectations() {
        let mut mock = MockStore::new();
        mock.expect_set("failed-order:o1").return_ok(());
        mock.expect_get("failed-order:o1")
            .return_ok(Some("0|boom".to_string()));
        mock.expect_delete("failed-order:o1").return_ok(true);

        let store = mock.client();
        store.set("failed-order:o1", "0|boom").await.unwrap();
        assert_eq!(
            store.get("failed-order:o1").await.unwrap().as_deref(),
            Some("0|boom")
        );
        assert!(store.delete("failed-order:o1").await.unwrap());

        mock.verify();
    }

    #[tokio::test]
    async fn test_mismatched_key_is_rejected() {
        let mut mock = MockStore::new();
        mock.expect_get("failed-order:o1").return_ok(None);

        let result = mock.client().get("failed-order:o2").await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_reports_unmet_expectations() {
        let mut mock = MockStore::new();
        mock.expect_delete("lock:o1").return_ok(true);
        mock.verify();
    }
}
