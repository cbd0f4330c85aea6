//! Relational stores for the fabrication commission service.
//!
//! Each store is a trait with single-row `insert` / `update_by_id` /
//! `get_by_id` operations; `update_by_id` is a field-level partial update
//! with all-or-nothing semantics for the row. Concurrent writers to the same
//! row race with last-writer-wins — no version tokens, by contract. An
//! in-memory twin exists for every PostgreSQL implementation.

pub mod category;
pub mod error;
pub mod memory;
pub mod order;
pub mod postgres;
pub mod product;
pub mod requester;

pub use category::CategoryRepository;
pub use error::{RepositoryError, Result};
pub use memory::{
    InMemoryCategoryRepository, InMemoryOrderRepository, InMemoryProductRepository,
    InMemoryRequesterRepository,
};
pub use order::{OrderRepository, OrderUpdate, StatusFilter};
pub use postgres::{
    PostgresCategoryRepository, PostgresOrderRepository, PostgresProductRepository,
    PostgresRequesterRepository,
};
pub use product::{ProductRepository, ProductUpdate};
pub use requester::RequesterRepository;
