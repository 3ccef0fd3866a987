//! HTTP server command
//!
//! Serves the medication request API from PostgreSQL, or from an in-memory
//! store when no database is configured. `--seed` loads patients, clinicians
//! and medications before the listener starts.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use medreq_core::{MedicationStore, MemoryStore, SeedData};
use medreq_server::{run_server, AppState, PgStore, ServerConfig};

use crate::config::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// JSON file of patients, clinicians and medications to insert at startup
    #[arg(long, value_name = "FILE")]
    pub seed: Option<PathBuf>,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Read and decode a seed document
pub fn read_seed(path: &Path) -> Result<SeedData> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    SeedData::from_json(&text)
        .with_context(|| format!("Invalid seed file {}", path.display()))
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    // Decode before connecting so a bad file fails fast
    let seed = args.seed.as_deref().map(read_seed).transpose()?;

    let store: Arc<dyn MedicationStore> = match args.database.connect().await? {
        Some(pool) => {
            tracing::info!("Using PostgreSQL store");
            Arc::new(PgStore::new(pool))
        }
        None => {
            if seed.is_none() {
                tracing::warn!(
                    "DATABASE_URL not set and no --seed given, serving from an empty in-memory store"
                );
            } else {
                tracing::warn!(
                    "DATABASE_URL not set, serving from an in-memory store (data is lost on exit)"
                );
            }
            Arc::new(MemoryStore::new())
        }
    };

    if let Some(seed) = seed {
        let summary = seed
            .load_into(store.as_ref())
            .await
            .context("Failed to load seed data")?;
        tracing::info!(
            patients = summary.patients,
            clinicians = summary.clinicians,
            medications = summary.medications,
            "Seed data loaded"
        );
    }

    tracing::info!("Starting medreq server on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Blocks until shutdown
    run_server(AppState::shared(store), config)
        .await
        .context("Server error")?;

    Ok(())
}
