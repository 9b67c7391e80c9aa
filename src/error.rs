//! Error types for the sync layer.
//!
//! Application setup (config, terminal) stays on `color_eyre::Result`; the
//! sync core needs to tell error kinds apart, so it has its own enum.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
  /// Remote read failed or was rejected
  #[error("Failed to load data: {0}")]
  Network(String),

  /// Create/update/delete rejected by the service
  #[error("Failed to save changes: {0}")]
  Mutation(String),

  /// A required form field is empty
  #[error("{label} is required")]
  Validation { field: String, label: String },

  /// Offline store failure (logged, never shown)
  #[error("Offline store error: {0}")]
  Storage(String),
}

impl SyncError {
  /// Whether this error should be reported to the user.
  pub fn is_user_facing(&self) -> bool {
    !matches!(self, SyncError::Storage(_))
  }
}

impl From<rusqlite::Error> for SyncError {
  fn from(e: rusqlite::Error) -> Self {
    SyncError::Storage(e.to_string())
  }
}

impl From<serde_json::Error> for SyncError {
  fn from(e: serde_json::Error) -> Self {
    SyncError::Storage(e.to_string())
  }
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;
