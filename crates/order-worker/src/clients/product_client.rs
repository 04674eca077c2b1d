//! # Product Client
//!
//! Fetches products from `GET {product_base_url}/{id}`.
use crate::clients::backoff::BackoffPolicy;
use crate::clients::endpoint::Endpoint;
use crate::clients::error::EnrichmentError;
use crate::clients::http::HttpGet;
use crate::model::Product;
use std::sync::Arc;
use tracing::{instrument, warn};

#[derive(Clone)]
pub struct ProductClient {
    endpoint: Endpoint,
}

impl ProductClient {
    pub fn new(base_url: impl Into<String>, http: Arc<dyn HttpGet>, policy: BackoffPolicy) -> Self {
        Self {
            endpoint: Endpoint::new("product", base_url, http, policy),
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, product_id: &str) -> Result<Product, EnrichmentError> {
        self.endpoint
            .fetch(product_id, EnrichmentError::ProductNotFound)
            .await
            .inspect_err(|e| warn!(error = %e, "Product fetch failed"))
    }
}
