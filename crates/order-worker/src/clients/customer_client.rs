//! # Customer Client
//!
//! Fetches customers from `GET {customer_base_url}/{id}`.
use crate::clients::backoff::BackoffPolicy;
use crate::clients::endpoint::Endpoint;
use crate::clients::error::EnrichmentError;
use crate::clients::http::HttpGet;
use crate::model::Customer;
use std::sync::Arc;
use tracing::{instrument, warn};

#[derive(Clone)]
pub struct CustomerClient {
    endpoint: Endpoint,
}

impl CustomerClient {
    pub fn new(base_url: impl Into<String>, http: Arc<dyn HttpGet>, policy: BackoffPolicy) -> Self {
        Self {
            endpoint: Endpoint::new("customer", base_url, http, policy),
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, customer_id: &str) -> Result<Customer, EnrichmentError> {
        self.endpoint
            .fetch(customer_id, EnrichmentError::CustomerNotFound)
            .await
            .inspect_err(|e| warn!(error = %e, "Customer fetch failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::http::{HttpResponse, TransportError};
    use crate::clients::stub::StubHttp;
    use crate::model::CustomerStatus;
    use std::time::Duration;

    const URL: &str = "http://customers/c1";
    const ACTIVE: &str = r#"{"id":"c1","name":"Ana","email":"ana@example.com","status":"ACTIVE"}"#;

    fn policy() -> BackoffPolicy {
        BackoffPolicy {
            max_attempts: 3,
            initial_interval: Duration::from_millis(10),
            multiplier: 2.0,
            jitter: 0.5,
        }
    }

    fn client(http: &Arc<StubHttp>) -> CustomerClient {
        CustomerClient::new("http://customers/", http.clone(), policy())
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_success() {
        let http = Arc::new(StubHttp::new());
        http.respond(URL, 200, ACTIVE);

        let customer = client(&http).fetch("c1").await.unwrap();
        assert_eq!(customer.status, CustomerStatus::Active);
        assert_eq!(http.calls_to(URL), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_called_once() {
        let http = Arc::new(StubHttp::new());
        http.respond(URL, 404, "");

        let err = client(&http).fetch("c1").await.unwrap_err();
        assert_eq!(err, EnrichmentError::CustomerNotFound("c1".into()));
        assert_eq!(err.to_string(), "Customer not found with ID: c1");
        assert_eq!(http.total_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_recover() {
        let http = Arc::new(StubHttp::new());
        http.respond_sequence(
            URL,
            vec![
                Err(TransportError("connection reset".into())),
                Ok(HttpResponse::new(503, "")),
            ],
        );
        http.respond(URL, 200, ACTIVE);

        assert!(client(&http).fetch("c1").await.is_ok());
        assert_eq!(http.calls_to(URL), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_surface_last_error() {
        let http = Arc::new(StubHttp::new());
        http.respond(URL, 500, "");

        let err = client(&http).fetch("c1").await.unwrap_err();
        assert_eq!(
            err,
            EnrichmentError::ExternalService(
                "Error while retrieving customer c1: status 500".into()
            )
        );
        assert_eq!(http.calls_to(URL), 4, "first call plus 3 retries");
    }

    #[tokio::test(start_paused = true)]
    async fn test_undecodable_body_is_retried() {
        let http = Arc::new(StubHttp::new());
        http.respond_sequence(URL, vec![Ok(HttpResponse::new(200, "<html>"))]);
        http.respond(URL, 200, ACTIVE);

        assert!(client(&http).fetch("c1").await.is_ok());
        assert_eq!(http.calls_to(URL), 2);
    }
}
