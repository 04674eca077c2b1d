use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Lifecycle status reported by the customer service.
///
/// Only [`CustomerStatus::Active`] customers may place orders. Values the worker does not
/// know are kept verbatim in `Other` so they can be logged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Suspended,
    #[default]
    Unknown,
    Other(String),
}

impl From<String> for CustomerStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ACTIVE" => Self::Active,
            "INACTIVE" => Self::Inactive,
            "SUSPENDED" => Self::Suspended,
            "" => Self::Unknown,
            _ => Self::Other(raw),
        }
    }
}

impl From<CustomerStatus> for String {
    fn from(status: CustomerStatus) -> Self {
        status.to_string()
    }
}

impl Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Inactive => write!(f, "INACTIVE"),
            Self::Suspended => write!(f, "SUSPENDED"),
            Self::Unknown => Ok(()),
            Self::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// A customer as returned by `GET {customerBaseURL}/{id}`.
///
/// Fetched fresh on every processing attempt; never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: CustomerStatus,
}

impl Customer {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        status: CustomerStatus,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            status,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CustomerStatus::Active
    }
}
