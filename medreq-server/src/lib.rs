//! medreq-server: HTTP server for patient medication requests
//!
//! - `db`: PostgreSQL implementation of [`medreq_core::MedicationStore`],
//!   schema migrations and pool setup
//! - `http`: axum router, error mapping and route handlers

pub mod db;
pub mod http;
pub mod state;

pub use db::{connect_and_migrate, PgStore, PoolSettings};
pub use http::{build_router, run_server, ApiError, ServerConfig};
pub use state::AppState;
