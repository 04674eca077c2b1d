//! # Stub HTTP Backend
//!
//! An in-memory [`HttpGet`] for tests: replies are routed by exact URL and every
//! request is counted, so tests can assert both the result of an enrichment call and
//! how many times the external service was hit.
//!
//! ```rust
//! use order_worker::clients::{HttpGet, HttpResponse, StubHttp};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http = StubHttp::new();
//!     http.respond("http://svc/customers/c1", 200, r#"{"id":"c1","status":"ACTIVE"}"#);
//!     http.respond_sequence(
//!         "http://svc/products/p1",
//!         vec![Ok(HttpResponse::new(503, "")), Ok(HttpResponse::new(200, "{}"))],
//!     );
//!
//!     assert_eq!(http.get("http://svc/customers/c1").await.unwrap().status, 200);
//!     assert_eq!(http.get("http://svc/products/p1").await.unwrap().status, 503);
//!     assert_eq!(http.calls_to("http://svc/products/p1"), 1);
//! }
//! ```

use crate::clients::http::{HttpGet, HttpResponse, TransportError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

type Reply = Result<HttpResponse, TransportError>;

#[derive(Default)]
struct Route {
    script: VecDeque<Reply>,
    fallback: Option<Reply>,
}

#[derive(Default)]
pub struct StubHttp {
    routes: Mutex<HashMap<String, Route>>,
    calls: Mutex<Vec<String>>,
    latency: Option<Duration>,
}

impl StubHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every reply is delayed by `latency` on the tokio clock.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Answers `url` with `status` and `body` whenever no scripted reply is pending.
    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .fallback = Some(Ok(HttpResponse::new(status, body)));
    }

    /// Queues one-shot replies for `url`, consumed before the fallback.
    pub fn respond_sequence(&self, url: &str, replies: Vec<Reply>) {
        self.routes
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .script
            .extend(replies);
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpGet for StubHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());
        let reply = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(url) {
                Some(route) => route
                    .script
                    .pop_front()
                    .or_else(|| route.fallback.clone()),
                None => None,
            }
        };
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        reply.unwrap_or_else(|| Err(TransportError(format!("no route for {url}"))))
    }
}
