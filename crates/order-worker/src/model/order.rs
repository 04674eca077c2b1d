use crate::model::{OrderMessage, Product};
use serde::{Deserialize, Serialize};

/// The durable output of the pipeline.
///
/// Created at most once per `order_id` and never updated by this worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    pub products: Vec<Product>,
}

impl Order {
    /// Assembles an order from its message and the fetched products.
    ///
    /// `products` must already be in the order of `message.product_ids`.
    pub fn assemble(message: &OrderMessage, products: Vec<Product>) -> Self {
        Self {
            order_id: message.order_id.clone(),
            customer_id: message.customer_id.clone(),
            products,
        }
    }
}
