//! Offline store backends.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::traits::OfflineStore;
use crate::error::{SyncError, SyncResult};
use crate::record::Record;

/// Store that keeps nothing. Used when offline mode is disabled.
pub struct NoopStorage;

impl OfflineStore for NoopStorage {
  fn put_all(&self, _collection: &str, _records: &[Record]) -> SyncResult<()> {
    Ok(()) // Discard
  }

  fn get_all(&self, _collection: &str) -> SyncResult<Vec<Record>> {
    Ok(Vec::new())
  }

  fn get_one(&self, _collection: &str, _id: &str) -> SyncResult<Option<Record>> {
    Ok(None)
  }

  fn update_one(&self, _collection: &str, _record: &Record) -> SyncResult<()> {
    Ok(())
  }

  fn delete_one(&self, _collection: &str, _id: &str) -> SyncResult<()> {
    Ok(())
  }

  fn evict_oldest(&self, _collection: &str, _max_count: usize) -> SyncResult<usize> {
    Ok(0)
  }

  fn count(&self, _collection: &str) -> SyncResult<usize> {
    Ok(0)
  }
}

/// SQLite-backed offline store.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

/// `seq` gives insertion order and survives upserts.
const OFFLINE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS offline_records (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    record_id TEXT NOT NULL,
    data BLOB NOT NULL,
    cached_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (collection, record_id)
);

CREATE INDEX IF NOT EXISTS idx_offline_records_order
    ON offline_records(collection, seq);
"#;

impl SqliteStorage {
  /// Open the store at the default location.
  pub fn open() -> Result<Self> {
    Self::open_at(&Self::default_path()?)
  }

  /// Open or create the store at `path`.
  pub fn open_at(path: &Path) -> Result<Self> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create offline store directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open offline store at {}: {}", path.display(), e))?;
    Self::with_connection(conn)
  }

  /// Store that lives only as long as the process.
  #[cfg(test)]
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory offline store: {}", e))?;
    Self::with_connection(conn)
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    conn
      .execute_batch(OFFLINE_SCHEMA)
      .map_err(|e| eyre!("Failed to run offline store migrations: {}", e))?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("stockroom").join("offline.db"))
  }

  fn lock(&self) -> SyncResult<MutexGuard<'_, Connection>> {
    self
      .conn
      .lock()
      .map_err(|e| SyncError::Storage(format!("Lock poisoned: {}", e)))
  }
}

fn decode(data: &[u8]) -> SyncResult<Record> {
  Ok(serde_json::from_slice(data)?)
}

impl OfflineStore for SqliteStorage {
  fn put_all(&self, collection: &str, records: &[Record]) -> SyncResult<()> {
    let mut conn = self.lock()?;
    let tx = conn.transaction()?;
    {
      let mut stmt = tx.prepare(
        "INSERT INTO offline_records (collection, record_id, data)
         VALUES (?, ?, ?)
         ON CONFLICT (collection, record_id)
         DO UPDATE SET data = excluded.data, cached_at = datetime('now')",
      )?;
      for record in records {
        let data = serde_json::to_vec(record)?;
        stmt.execute(params![collection, record.id, data])?;
      }
    }
    tx.commit()?;
    Ok(())
  }

  fn get_all(&self, collection: &str) -> SyncResult<Vec<Record>> {
    let conn = self.lock()?;
    let mut stmt =
      conn.prepare("SELECT data FROM offline_records WHERE collection = ? ORDER BY seq")?;
    let rows = stmt
      .query_map(params![collection], |row| row.get::<_, Vec<u8>>(0))?
      .collect::<Result<Vec<_>, _>>()?;
    rows.iter().map(|data| decode(data)).collect()
  }

  fn get_one(&self, collection: &str, id: &str) -> SyncResult<Option<Record>> {
    let conn = self.lock()?;
    let data: Option<Vec<u8>> = conn
      .query_row(
        "SELECT data FROM offline_records WHERE collection = ? AND record_id = ?",
        params![collection, id],
        |row| row.get(0),
      )
      .optional()?;
    data.map(|d| decode(&d)).transpose()
  }

  fn update_one(&self, collection: &str, record: &Record) -> SyncResult<()> {
    let conn = self.lock()?;
    let data = serde_json::to_vec(record)?;
    conn.execute(
      "UPDATE offline_records SET data = ?, cached_at = datetime('now')
       WHERE collection = ? AND record_id = ?",
      params![data, collection, record.id],
    )?;
    Ok(())
  }

  fn delete_one(&self, collection: &str, id: &str) -> SyncResult<()> {
    let conn = self.lock()?;
    conn.execute(
      "DELETE FROM offline_records WHERE collection = ? AND record_id = ?",
      params![collection, id],
    )?;
    Ok(())
  }

  fn evict_oldest(&self, collection: &str, max_count: usize) -> SyncResult<usize> {
    let conn = self.lock()?;
    let count: i64 = conn.query_row(
      "SELECT COUNT(*) FROM offline_records WHERE collection = ?",
      params![collection],
      |row| row.get(0),
    )?;
    let excess = (count as usize).saturating_sub(max_count);
    if excess == 0 {
      return Ok(0);
    }
    let removed = conn.execute(
      "DELETE FROM offline_records WHERE seq IN (
         SELECT seq FROM offline_records WHERE collection = ? ORDER BY seq LIMIT ?
       )",
      params![collection, excess as i64],
    )?;
    Ok(removed)
  }

  fn count(&self, collection: &str) -> SyncResult<usize> {
    let conn = self.lock()?;
    let count: i64 = conn.query_row(
      "SELECT COUNT(*) FROM offline_records WHERE collection = ?",
      params![collection],
      |row| row.get(0),
    )?;
    Ok(count as usize)
  }

  fn read_page(&self, collection: &str, page: usize, limit: usize) -> SyncResult<Vec<Record>> {
    let conn = self.lock()?;
    let mut stmt = conn.prepare(
      "SELECT data FROM offline_records WHERE collection = ?
       ORDER BY seq LIMIT ? OFFSET ?",
    )?;
    let rows = stmt
      .query_map(
        params![collection, limit as i64, (page * limit) as i64],
        |row| row.get::<_, Vec<u8>>(0),
      )?
      .collect::<Result<Vec<_>, _>>()?;
    rows.iter().map(|data| decode(data)).collect()
  }
}
