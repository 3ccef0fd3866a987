//! PostgreSQL connection setup
//!
//! [`connect_and_migrate`] is the entry point for the binary: it opens the
//! pool and brings the medication request schema up to date before any
//! handler can run against it.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{migrations, DbError};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Pool limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// How long a handler waits for a free connection before failing with 500
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

impl PoolSettings {
    pub fn with_max_connections(max_connections: u32) -> Self {
        Self {
            max_connections: max_connections.max(1),
            ..Self::default()
        }
    }
}

/// Open a pool without touching the schema.
pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<PgPool, DbError> {
    tracing::debug!(
        max_connections = settings.max_connections,
        acquire_timeout_ms = settings.acquire_timeout.as_millis() as u64,
        "connecting to database"
    );
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Open a pool and create any missing tables.
pub async fn connect_and_migrate(
    database_url: &str,
    settings: &PoolSettings,
) -> Result<PgPool, DbError> {
    let pool = connect(database_url, settings).await?;
    migrations::run(&pool).await?;
    Ok(pool)
}
