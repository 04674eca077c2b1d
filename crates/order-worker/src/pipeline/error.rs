//! Error types for order processing.

use crate::clients::EnrichmentError;
use crate::repository::RepositoryError;
use thiserror::Error;

/// Why one processing attempt of an order failed.
///
/// The display text is what ends up as the ledger payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessingError {
    #[error("Customer not found with ID: {0}")]
    CustomerNotFound(String),

    #[error("Product not found with ID: {0}")]
    ProductNotFound(String),

    /// The customer exists but its status is not `ACTIVE`.
    #[error("Inactive customer with ID: {0}")]
    InactiveCustomer(String),

    /// Another attempt already persisted this order.
    #[error("Order already exists with ID: {0}")]
    OrderAlreadyExists(String),

    /// A customer or product service stayed unavailable for the whole retry budget.
    #[error("{0}")]
    ExternalService(String),

    /// The order store failed to look up or save the order.
    #[error("{0}")]
    Persistence(String),
}

impl ProcessingError {
    /// Whether another attempt could succeed with the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService(_) | Self::Persistence(_))
    }
}

impl From<EnrichmentError> for ProcessingError {
    fn from(e: EnrichmentError) -> Self {
        match e {
            EnrichmentError::CustomerNotFound(id) => Self::CustomerNotFound(id),
            EnrichmentError::ProductNotFound(id) => Self::ProductNotFound(id),
            EnrichmentError::ExternalService(detail) => Self::ExternalService(detail),
        }
    }
}

impl From<RepositoryError> for ProcessingError {
    fn from(e: RepositoryError) -> Self {
        Self::Persistence(e.to_string())
    }
}
