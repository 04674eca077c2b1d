//! # REST Endpoint
//!
//! Shared "GET `{base}/{id}` and decode JSON" logic behind the customer and product
//! clients. Each response is classified once:
//!
//! | Response | Result | Retried |
//! |----------|--------|---------|
//! | 2xx, JSON decodes | `Ok(T)` | - |
//! | 404 | not-found variant | never |
//! | other status | `ExternalService` | yes |
//! | 2xx, bad body | `ExternalService` | yes |
//! | transport error | `ExternalService` | yes |

use crate::clients::backoff::BackoffPolicy;
use crate::clients::error::EnrichmentError;
use crate::clients::http::HttpGet;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

const NOT_FOUND: u16 = 404;

/// One resource collection on an external service.
#[derive(Clone)]
pub struct Endpoint {
    kind: &'static str,
    base_url: String,
    http: Arc<dyn HttpGet>,
    policy: BackoffPolicy,
}

impl Endpoint {
    pub fn new(
        kind: &'static str,
        base_url: impl Into<String>,
        http: Arc<dyn HttpGet>,
        policy: BackoffPolicy,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            kind,
            base_url,
            http,
            policy,
        }
    }

    pub fn url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Fetches `id`, retrying everything except not-found under the backoff policy.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        id: &str,
        not_found: fn(String) -> EnrichmentError,
    ) -> Result<T, EnrichmentError> {
        self.policy
            .retry(
                |attempt| self.fetch_once::<T>(id, attempt, not_found),
                |e: &EnrichmentError| !e.is_not_found(),
            )
            .await
    }

    async fn fetch_once<T: DeserializeOwned>(
        &self,
        id: &str,
        attempt: u32,
        not_found: fn(String) -> EnrichmentError,
    ) -> Result<T, EnrichmentError> {
        let url = self.url(id);
        debug!(kind = self.kind, %url, attempt, "GET");

        let response = self
            .http
            .get(&url)
            .await
            .map_err(|e| self.service_error(id, e))?;

        if response.status == NOT_FOUND {
            return Err(not_found(id.to_string()));
        }
        if !response.is_success() {
            return Err(self.service_error(id, format!("status {}", response.status)));
        }
        serde_json::from_str(&response.body)
            .map_err(|e| self.service_error(id, format!("invalid response body: {e}")))
    }

    fn service_error(&self, id: &str, detail: impl std::fmt::Display) -> EnrichmentError {
        EnrichmentError::ExternalService(format!(
            "Error while retrieving {} {}: {}",
            self.kind, id, detail
        ))
    }
}
