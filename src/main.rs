mod app;
mod cache;
mod collection;
mod commands;
mod config;
mod error;
mod event;
mod logging;
mod record;
mod remote;
mod sync;
mod ui;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stockroom")]
#[command(about = "A terminal storefront and inventory manager")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/stockroom/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Collection to open on start
  #[arg(long, value_enum)]
  collection: Option<collection::Collection>,

  /// Log file (default: $XDG_DATA_HOME/stockroom/stockroom.log)
  #[arg(long)]
  log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // Held until exit so buffered log lines get flushed
  let log_path = args
    .log_file
    .or_else(logging::default_log_path)
    .ok_or_else(|| eyre!("Could not determine a log file location, pass --log-file"))?;
  let _log_guard = logging::init(&log_path)?;

  let initial = args.collection.unwrap_or(config.default_collection);

  // Initialize and run the app
  let mut app = app::App::new(config, initial)?;
  app.run().await?;

  Ok(())
}
