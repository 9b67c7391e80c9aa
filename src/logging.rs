//! File logging. The terminal belongs to the UI, so nothing goes to stderr.

use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "stockroom=info";

/// Default log file: $XDG_DATA_HOME/stockroom/stockroom.log
pub fn default_log_path() -> Option<PathBuf> {
  dirs::data_dir().map(|d| d.join("stockroom").join("stockroom.log"))
}

/// Install the global subscriber writing to `path`.
///
/// `RUST_LOG` overrides the default filter. Keep the returned guard alive
/// until exit or buffered lines are lost.
pub fn init(path: &Path) -> Result<WorkerGuard> {
  let dir = path
    .parent()
    .ok_or_else(|| eyre!("Invalid log file path: {}", path.display()))?;
  let file_name = path
    .file_name()
    .ok_or_else(|| eyre!("Invalid log file path: {}", path.display()))?;
  std::fs::create_dir_all(dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::never(dir, file_name);
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
    .with(
      tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false),
    )
    .try_init()
    .map_err(|e| eyre!("Failed to install logger: {}", e))?;

  Ok(guard)
}
