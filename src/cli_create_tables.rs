//! Warehouse provisioning tool
//!
//! Drops and recreates the Sparkify star schema tables. Run this before the
//! first load; the loader itself never creates or drops tables.

use anyhow::{Context, Result};
use clap::Parser;
use sparkify_etl::config::DEFAULT_DB_PATH;
use sparkify_etl::Warehouse;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "create-tables")]
#[command(about = "Drop and recreate the Sparkify warehouse tables")]
struct Args {
    /// Path to the SQLite warehouse database. Created if missing.
    #[arg(long, env = "SPARKIFY_DB", default_value = DEFAULT_DB_PATH)]
    db_path: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.db_path.exists() {
        warn!(
            "Database already exists, all warehouse data in {} will be dropped",
            args.db_path.display()
        );
    }

    let warehouse = Warehouse::provision(&args.db_path)
        .with_context(|| format!("Failed to provision {}", args.db_path.display()))?;

    for (table, count) in warehouse.table_counts()? {
        info!("  {} ({} rows)", table, count);
    }
    warehouse.close()?;

    info!("Warehouse ready at {}", args.db_path.display());
    Ok(())
}
