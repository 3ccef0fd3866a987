//! Schema migration command

use anyhow::Result;
use clap::Parser;

use crate::config::DatabaseArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Create any missing tables and indexes
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    // Connecting runs the migrations
    args.database.require().await?;
    println!("Schema is up to date");
    Ok(())
}
