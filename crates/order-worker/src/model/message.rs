use serde::{Deserialize, Serialize};

/// An order event as delivered on the stream.
///
/// Ephemeral: built once per inbound message and never persisted directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMessage {
    pub order_id: String,
    pub customer_id: String,
    /// Product ids in the order they must appear on the assembled order.
    #[serde(rename = "products", default)]
    pub product_ids: Vec<String>,
}

impl OrderMessage {
    pub fn new(
        order_id: impl Into<String>,
        customer_id: impl Into<String>,
        product_ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            customer_id: customer_id.into(),
            product_ids: product_ids.into_iter().map(Into::into).collect(),
        }
    }
}
