//! # Enrichment Gateway
//!
//! Single entry point the pipeline uses to look up the customer and the products of an
//! order. Product lookups for one order run concurrently and join before returning.
use crate::clients::customer_client::CustomerClient;
use crate::clients::error::EnrichmentError;
use crate::clients::product_client::ProductClient;
use crate::model::{Customer, Product};
use futures::future::try_join_all;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct EnrichmentGateway {
    customers: CustomerClient,
    products: ProductClient,
}

impl EnrichmentGateway {
    pub fn new(customers: CustomerClient, products: ProductClient) -> Self {
        Self {
            customers,
            products,
        }
    }

    pub async fn fetch_customer(&self, customer_id: &str) -> Result<Customer, EnrichmentError> {
        self.customers.fetch(customer_id).await
    }

    pub async fn fetch_product(&self, product_id: &str) -> Result<Product, EnrichmentError> {
        self.products.fetch(product_id).await
    }

    /// Fetches every id concurrently. Results keep the order of `product_ids`.
    ///
    /// The first failure is returned as soon as it happens; sibling fetches still in
    /// flight are dropped.
    #[instrument(skip(self), fields(count = product_ids.len()))]
    pub async fn fetch_products(
        &self,
        product_ids: &[String],
    ) -> Result<Vec<Product>, EnrichmentError> {
        let products =
            try_join_all(product_ids.iter().map(|id| self.fetch_product(id))).await?;
        debug!("All products fetched");
        Ok(products)
    }
}
