use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::collection::Collection;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub service: ServiceConfig,
  #[serde(default)]
  pub default_collection: Collection,
  /// Custom title for header (defaults to the service host)
  pub title: Option<String>,
  #[serde(default)]
  pub sync: SyncConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
  /// GraphQL endpoint
  pub url: String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
  15
}

/// Pagination, rate limiting and offline store tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
  pub page_size: usize,
  /// Idle time before search text is sent
  pub debounce_ms: u64,
  /// Minimum spacing between list requests
  pub throttle_ms: u64,
  /// Number of recently visited pages kept in memory
  pub page_window: usize,
  /// Rows kept in the offline store per collection
  pub offline_capacity: usize,
  /// Mirror rows to disk for offline fallback
  pub offline: bool,
}

impl Default for SyncConfig {
  fn default() -> Self {
    Self {
      page_size: 10,
      debounce_ms: 400,
      throttle_ms: 1000,
      page_window: 10,
      offline_capacity: 1000,
      offline: true,
    }
  }
}

impl SyncConfig {
  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }

  pub fn throttle(&self) -> Duration {
    Duration::from_millis(self.throttle_ms)
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./stockroom.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/stockroom/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/stockroom/config.yaml\n\
                 with at least `service: {{ url: https://.../graphql }}`."
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("stockroom.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("stockroom").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    if config.sync.page_size == 0 {
      return Err(eyre!("sync.page_size must be at least 1"));
    }
    Ok(config)
  }

  /// Get the service API token from the environment, if any.
  ///
  /// Checks STOCKROOM_API_TOKEN.
  pub fn get_api_token() -> Option<String> {
    std::env::var("STOCKROOM_API_TOKEN")
      .ok()
      .filter(|t| !t.trim().is_empty())
  }
}
