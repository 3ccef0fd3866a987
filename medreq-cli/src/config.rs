//! Database configuration shared by the subcommands
//!
//! The URL is resolved from `--database-url`, then `DATABASE_URL` (which
//! `main` may have loaded from a `.env` file).

use anyhow::{Context, Result};
use clap::Args;

use medreq_server::db::{connect_and_migrate, pool::DEFAULT_MAX_CONNECTIONS, PgPool, PoolSettings};

/// Connection options
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DatabaseArgs {
    /// Connect and bring the schema up to date.
    ///
    /// Returns `None` when no database URL is configured.
    pub async fn connect(&self) -> Result<Option<PgPool>> {
        let Some(url) = self.database_url.as_deref() else {
            return Ok(None);
        };

        let settings = PoolSettings::with_max_connections(self.max_connections);
        let pool = connect_and_migrate(url, &settings)
            .await
            .context("Failed to connect to the database and apply migrations")?;
        Ok(Some(pool))
    }

    /// Like [`connect`](Self::connect), but a database is mandatory.
    pub async fn require(&self) -> Result<PgPool> {
        self.connect().await?.context(
            "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or a .env file",
        )
    }
}
