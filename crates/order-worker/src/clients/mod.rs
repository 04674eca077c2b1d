//! # Enrichment Clients
//!
//! Typed wrappers around the customer and product services. Every call goes through the
//! same [`HttpGet`] seam, the same response classification and the same
//! [`BackoffPolicy`]; [`EnrichmentGateway`] bundles them for the pipeline.

pub mod backoff;
pub mod customer_client;
pub mod endpoint;
pub mod error;
pub mod gateway;
pub mod http;
pub mod product_client;
pub mod stub;

pub use backoff::BackoffPolicy;
pub use customer_client::CustomerClient;
pub use error::EnrichmentError;
pub use gateway::EnrichmentGateway;
pub use http::{HttpGet, HttpResponse, ReqwestHttp, TransportError};
pub use product_client::ProductClient;
pub use stub::StubHttp;
