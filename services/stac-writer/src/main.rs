//! STAC writer service.
//!
//! Converts CBERS-4/4A and AMAZONIA-1 metadata documents into STAC items and
//! keeps the static catalog tree in the STAC bucket up to date.

mod config;
mod pipeline;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use config::WriterConfig;
use pipeline::{convert_local, StacWriter};

#[derive(Parser, Debug)]
#[command(name = "stac-writer")]
#[command(about = "Publish CBERS/AMAZONIA scenes as a static STAC catalog")]
struct Args {
    /// Mission tables YAML (defaults to the compiled-in tables)
    #[arg(long, global = true, env = "MISSION_TABLES")]
    tables: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build and publish the item for one scene, then refresh its catalog chain
    Item {
        /// Key of any file of the scene in the metadata bucket
        #[arg(long)]
        key: String,
    },
    /// Rebuild a single catalog node, e.g. `CBERS4/MUX/083`
    Node {
        #[arg(long)]
        prefix: String,
    },
    /// Rebuild the root and mission catalogs from the mission tables
    Root,
    /// Convert a local metadata file to an item JSON file
    Local {
        #[arg(long)]
        xml: PathBuf,

        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let config = WriterConfig::from_env(args.tables.as_deref())?;
    info!(
        metadata_bucket = %config.buckets.metadata,
        stac_bucket = %config.buckets.stac,
        missions = config.tables.missions.len(),
        "Loaded configuration"
    );

    match args.command {
        Command::Item { key } => {
            let writer = StacWriter::from_config(&config)?;
            let outcome = writer.write_item(&key).await?;
            info!(
                item_key = %outcome.item_key,
                item_written = outcome.item_written,
                nodes = ?outcome.nodes_written,
                "Done"
            );
        }
        Command::Node { prefix } => {
            let writer = StacWriter::from_config(&config)?;
            let written = writer.rebuild_prefix(&prefix).await?;
            info!(prefix = %prefix, written = written, "Done");
        }
        Command::Root => {
            let writer = StacWriter::from_config(&config)?;
            let written = writer.rebuild_root().await?;
            info!(written = ?written, "Done");
        }
        Command::Local { xml, out } => {
            let path = convert_local(&xml, &out, &config.tables, &config.buckets)?;
            info!(path = %path.display(), "Done");
        }
    }

    Ok(())
}
