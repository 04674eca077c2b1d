//! Pure data structures: the inbound message, the enrichment payloads and the persisted order.

pub mod customer;
pub mod message;
pub mod order;
pub mod product;

pub use customer::*;
pub use message::*;
pub use order::*;
pub use product::*;
