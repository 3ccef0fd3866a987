//! Database layer - connection pool, migrations and the PostgreSQL store
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections by default)
//! - List and fetch operations JOIN the referenced entities - no N+1 queries
//! - Uniqueness and foreign keys enforced by DB constraints
//! - Transactions for multi-step operations

pub mod error;
pub mod migrations;
pub mod pool;
pub mod store;

pub use error::DbError;
pub use pool::{connect, connect_and_migrate, PoolSettings};
pub use store::PgStore;

pub use sqlx::PgPool;
