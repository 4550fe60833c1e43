//! `kumite` — record karate tournament results from the command line.
//!
//! Reads `kumite.toml` (or the path given with `--config`) and `KUMITE_*`
//! environment variables, opens the SQLite store, and runs one subcommand.
//!
//! # Usage
//!
//! ```text
//! kumite athlete add Sandra Sánchez
//! kumite tournament add "Karate1 Paris" --date 2024-01-27
//! kumite match record --tournament 1 --ao 1 --aka 2 --ao-tally kizami=2,sweep=1
//! kumite --json match list --tournament 1
//! ```

mod commands;
mod render;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use commands::Command;
use kumite_catalog::Catalog;
use kumite_store_sqlite::SqliteStore;
use render::Printer;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kumite", author, version, about = "Karate tournament results recorder")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "kumite.toml", global = true)]
  config: PathBuf,

  /// Print results as JSON.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs on stderr, results on stdout.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  let catalog = Catalog::new(Arc::new(store));
  commands::run(&catalog, cli.command, Printer { json: cli.json }).await
}
