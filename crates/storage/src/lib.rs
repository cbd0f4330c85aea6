//! Object storage gateway.
//!
//! Binary objects (order and product images) are addressed by caller-chosen
//! path strings. The gateway enforces no path structure beyond
//! uniqueness-on-non-overwrite. Two implementations are provided: an
//! in-memory gateway for tests and a PostgreSQL-backed gateway that keeps
//! object bytes in a bytea table and issues time-limited signed read URLs
//! from a token table.

pub mod error;
pub mod gateway;
pub mod memory;
pub mod postgres;

pub use error::{Result, StorageError};
pub use gateway::StorageGateway;
pub use memory::InMemoryStorageGateway;
pub use postgres::PostgresStorageGateway;
