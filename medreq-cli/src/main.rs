//! medreq CLI - patient medication request service
//!
//! - `serve`: run the HTTP API (PostgreSQL, or in-memory without DATABASE_URL)
//! - `migrate`: create the database schema
//! - `register`: insert patients, clinicians and medications

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "medreq",
    author,
    version,
    about = "Record-keeping service for patient medication requests"
)]
struct Cli {
    /// Default to debug-level logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create or update the database schema
    Migrate(commands::migrate::MigrateArgs),
    /// Register patients, clinicians and medications
    Register(commands::register::RegisterArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(err) = tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }) {
        eprintln!("warning: logging disabled: {:#}", err);
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
        Commands::Register(args) => commands::run_register(args).await?,
    }

    Ok(())
}
