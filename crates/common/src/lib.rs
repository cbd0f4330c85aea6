//! Shared identifier newtypes used across the fabrication commission service.

pub mod types;

pub use types::{CategoryId, OrderId, ProductId, RequesterId};
