//! Offline store contract.

use crate::error::SyncResult;
use crate::record::{Attributes, Record};

/// Persistent, capacity-bounded mirror of records, keyed by record id and
/// scoped per collection.
///
/// Records keep the position of their first insertion; re-mirroring an
/// existing id replaces its data in place.
pub trait OfflineStore: Send + Sync {
  /// Upsert records.
  fn put_all(&self, collection: &str, records: &[Record]) -> SyncResult<()>;

  /// All records in insertion order.
  fn get_all(&self, collection: &str) -> SyncResult<Vec<Record>>;

  fn get_one(&self, collection: &str, id: &str) -> SyncResult<Option<Record>>;

  /// Replace a stored record. Missing records are ignored.
  fn update_one(&self, collection: &str, record: &Record) -> SyncResult<()>;

  fn delete_one(&self, collection: &str, id: &str) -> SyncResult<()>;

  /// Delete the oldest records until at most `max_count` remain.
  /// Returns the number removed.
  fn evict_oldest(&self, collection: &str, max_count: usize) -> SyncResult<usize>;

  fn count(&self, collection: &str) -> SyncResult<usize>;

  /// Slice `[page * limit, page * limit + limit)` of all records.
  fn read_page(&self, collection: &str, page: usize, limit: usize) -> SyncResult<Vec<Record>> {
    Ok(
      self
        .get_all(collection)?
        .into_iter()
        .skip(page * limit)
        .take(limit)
        .collect(),
    )
  }

  fn mirror(&self, collection: &str, records: &[Record]) -> SyncResult<()> {
    self.put_all(collection, records)
  }

  fn purge_beyond(&self, collection: &str, capacity: usize) -> SyncResult<usize> {
    self.evict_oldest(collection, capacity)
  }

  fn remove(&self, collection: &str, id: &str) -> SyncResult<()> {
    self.delete_one(collection, id)
  }

  /// Merge fields into one stored record.
  fn patch(&self, collection: &str, id: &str, partial: &Attributes) -> SyncResult<()> {
    if let Some(mut record) = self.get_one(collection, id)? {
      record.merge(partial);
      self.update_one(collection, &record)?;
    }
    Ok(())
  }
}
