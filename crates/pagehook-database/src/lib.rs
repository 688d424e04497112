//! # pagehook-database
//!
//! Row-store collaborators for Pagehook plugins: an in-memory store for
//! development and tests, and a PostgreSQL-backed store for deployments.
//! Both implement the narrow `RowStore` trait from `pagehook-core`; the
//! framework core never touches either.

pub mod connection;
pub mod memory;
pub mod postgres;

pub use connection::connect_pool;
pub use memory::MemoryRowStore;
pub use postgres::PgRowStore;
