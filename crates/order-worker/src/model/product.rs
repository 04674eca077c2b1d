use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product as returned by `GET {productBaseURL}/{id}`.
///
/// Extra fields in the service response are ignored. Fetched fresh on every attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}
