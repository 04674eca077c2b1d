//! Error types for the enrichment clients.

use thiserror::Error;

/// Terminal outcome of one enrichment call after retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnrichmentError {
    /// The customer service answered 404.
    #[error("Customer not found with ID: {0}")]
    CustomerNotFound(String),

    /// The product service answered 404.
    #[error("Product not found with ID: {0}")]
    ProductNotFound(String),

    /// Transport failure, non-404 status or undecodable body, after the retry budget.
    #[error("{0}")]
    ExternalService(String),
}

impl EnrichmentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CustomerNotFound(_) | Self::ProductNotFound(_))
    }
}
