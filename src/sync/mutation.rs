//! Create/update/delete against the service, reconciled into local state.
//!
//! Local state only changes after the service confirms. A failed call
//! returns the error and leaves the page cache and offline store as they
//! were, so there is nothing to roll back.
//!
//! The remote half ([`MutationApplier::send`]) runs on a spawned task; the
//! local half ([`MutationApplier::reconcile`]) runs on the loop that owns the
//! cache, against whatever cache is current when the confirmation lands.

use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::OfflineStore;
use crate::collection::Collection;
use crate::error::SyncResult;
use crate::record::{Attributes, Record};
use crate::remote::RemoteDataService;

use super::page_cache::PageCache;

/// What the user asked for. Kept after a failure so a retry re-issues the
/// exact same request.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationIntent {
  Create { input: Attributes },
  Update { id: String, input: Attributes },
  Delete { id: String },
}

impl MutationIntent {
  pub fn describe(&self) -> String {
    match self {
      MutationIntent::Create { .. } => "create".to_string(),
      MutationIntent::Update { id, .. } => format!("update {}", id),
      MutationIntent::Delete { id } => format!("delete {}", id),
    }
  }
}

/// Confirmed result of a mutation
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
  Created(Record),
  /// `previous_id` differs from `record.id` when the id field was edited
  Updated { previous_id: String, record: Record },
  Deleted(String),
}

#[derive(Clone)]
pub struct MutationApplier {
  collection: Collection,
  remote: Arc<dyn RemoteDataService>,
  store: Arc<dyn OfflineStore>,
  offline_capacity: usize,
}

impl MutationApplier {
  pub fn new(
    collection: Collection,
    remote: Arc<dyn RemoteDataService>,
    store: Arc<dyn OfflineStore>,
    offline_capacity: usize,
  ) -> Self {
    Self {
      collection,
      remote,
      store,
      offline_capacity,
    }
  }

  /// Issue the intent to the service. Touches no local state.
  pub async fn send(&self, intent: &MutationIntent) -> SyncResult<MutationOutcome> {
    let name = self.collection.name();
    match intent {
      MutationIntent::Create { input } => {
        let record = self.remote.create(self.collection, input).await?;
        info!(collection = name, id = %record.id, "record created");
        Ok(MutationOutcome::Created(record))
      }
      MutationIntent::Update { id, input } => {
        let mut record = self.remote.update(self.collection, id, input).await?;
        info!(collection = name, id = %id, "record updated");

        // The service may echo only some fields; the input fills the rest
        let mut attributes = input.clone();
        attributes.extend(std::mem::take(&mut record.attributes));
        record.attributes = attributes;
        Ok(MutationOutcome::Updated {
          previous_id: id.clone(),
          record,
        })
      }
      MutationIntent::Delete { id } => {
        let deleted = self.remote.delete(self.collection, id).await?;
        info!(collection = name, id = %deleted, "record deleted");
        Ok(MutationOutcome::Deleted(deleted))
      }
    }
  }

  /// Fold a confirmed outcome into the cache and the offline store.
  ///
  /// A new row shifts every page's offset, so a create drops all cached
  /// pages and leaves a synthetic page 0 headed by the new record until the
  /// refetch lands.
  #[must_use]
  pub fn reconcile(&self, cache: &PageCache, outcome: &MutationOutcome, page_size: usize) -> PageCache {
    let name = self.collection.name();
    match outcome {
      MutationOutcome::Created(record) => {
        log_store("mirror", self.store.mirror(name, std::slice::from_ref(record)));
        log_store("purge", self.store.purge_beyond(name, self.offline_capacity));

        let mut first_page = vec![record.clone()];
        if let Some(rows) = cache.get_page(0) {
          first_page.extend(rows.iter().filter(|r| r.id != record.id).cloned());
        }
        first_page.truncate(page_size.max(1));
        cache.clear().put_page(0, first_page)
      }
      MutationOutcome::Updated {
        previous_id,
        record,
      } => {
        if record.id == *previous_id {
          log_store("patch", self.store.patch(name, previous_id, &record.attributes));
          cache.patch_record(previous_id, &record.attributes)
        } else {
          // Parties are keyed by phone, so editing the phone moves the row
          log_store("remove", self.store.remove(name, previous_id));
          log_store("mirror", self.store.mirror(name, std::slice::from_ref(record)));
          cache.apply_update(previous_id, record)
        }
      }
      MutationOutcome::Deleted(id) => {
        log_store("remove", self.store.remove(name, id));
        cache.remove_record(id)
      }
    }
  }
}

/// Offline store failures are logged, never surfaced.
pub(crate) fn log_store<T>(op: &str, result: SyncResult<T>) {
  if let Err(e) = result {
    warn!(op, error = %e, "offline store write failed");
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::SqliteStorage;
  use crate::error::SyncError;
  use crate::record::attributes_from_pairs;
  use crate::sync::testing::{customer, FakeService};

  /// Send, then reconcile against `cache`, the way the coordinator does
  /// across two events.
  async fn apply(
    applier: &MutationApplier,
    cache: &PageCache,
    intent: &MutationIntent,
    page_size: usize,
  ) -> SyncResult<(PageCache, MutationOutcome)> {
    let outcome = applier.send(intent).await?;
    Ok((applier.reconcile(cache, &outcome, page_size), outcome))
  }

  fn setup(n: usize) -> (Arc<FakeService>, Arc<SqliteStorage>, MutationApplier, PageCache) {
    let service = Arc::new(FakeService::with_customers(n));
    let store = Arc::new(SqliteStorage::open_in_memory().unwrap());
    let records = service.all_rows();
    store.mirror("customers", &records).unwrap();

    let applier = MutationApplier::new(
      Collection::Customers,
      service.clone(),
      store.clone(),
      1000,
    );
    let cache = PageCache::default()
      .put_page(0, records[0..10].to_vec())
      .put_page(1, records[10..20].to_vec())
      .put_page(2, records[20..].to_vec());
    (service, store, applier, cache)
  }

  fn create(phone: &str) -> MutationIntent {
    MutationIntent::Create {
      input: attributes_from_pairs([("name", "New"), ("phone", phone), ("status", "Pending")]),
    }
  }

  #[tokio::test]
  async fn test_create_resets_to_synthetic_first_page() {
    let (_service, store, applier, cache) = setup(25);

    let (cache, outcome) = apply(&applier, &cache, &create("0300-9999999"), 10).await.unwrap();
    let MutationOutcome::Created(record) = outcome else {
      panic!("expected a create outcome");
    };
    assert_eq!(record.id, "0300-9999999");
    assert_eq!(cache.pages(), vec![0]);
    let first = cache.get_page(0).unwrap();
    assert_eq!(first[0].id, "0300-9999999");
    assert_eq!(first[1].id, customer(0).id);
    assert_eq!(first.len(), 10);
    assert!(store.get_one("customers", "0300-9999999").unwrap().is_some());
  }

  #[tokio::test]
  async fn test_create_failure_changes_nothing() {
    let (service, store, applier, cache) = setup(25);
    service.fail_mutations(true);

    let err = apply(&applier, &cache, &create("1"), 10).await.unwrap_err();
    assert!(matches!(err, SyncError::Mutation(_)));
    assert_eq!(store.count("customers").unwrap(), 25);
    assert_eq!(cache.pages(), vec![0, 1, 2]);
  }

  #[tokio::test]
  async fn test_create_purges_store_beyond_capacity() {
    let (service, store, _, cache) = setup(25);
    let applier = MutationApplier::new(Collection::Customers, service, store.clone(), 20);
    apply(&applier, &cache, &create("X"), 10).await.unwrap();
    assert_eq!(store.count("customers").unwrap(), 20);
    assert!(store.get_one("customers", "X").unwrap().is_some());
  }

  #[tokio::test]
  async fn test_update_patches_cache_and_store() {
    let (_service, store, applier, cache) = setup(25);
    let target = customer(14).id;
    let intent = MutationIntent::Update {
      id: target.clone(),
      input: attributes_from_pairs([("status", "Received")]),
    };

    let (cache, _) = apply(&applier, &cache, &intent, 10).await.unwrap();
    let (page, record) = cache.find_record(&target).unwrap();
    assert_eq!(page, 1);
    assert_eq!(record.text("status"), "Received");
    assert_eq!(record.text("name"), "Customer 14");

    let stored = store.get_one("customers", &target).unwrap().unwrap();
    assert_eq!(stored.text("status"), "Received");
  }

  #[tokio::test]
  async fn test_update_with_new_id_moves_store_row() {
    let (_service, store, applier, cache) = setup(25);
    let target = customer(2).id;
    let intent = MutationIntent::Update {
      id: target.clone(),
      input: attributes_from_pairs([("phone", "0311-0000000")]),
    };

    let (cache, _) = apply(&applier, &cache, &intent, 10).await.unwrap();
    assert!(cache.find_record(&target).is_none());
    assert!(cache.find_record("0311-0000000").is_some());
    assert!(store.get_one("customers", &target).unwrap().is_none());
    assert!(store.get_one("customers", "0311-0000000").unwrap().is_some());
  }

  #[tokio::test]
  async fn test_update_failure_changes_nothing() {
    let (service, store, applier, cache) = setup(25);
    service.fail_mutations(true);
    let target = customer(3).id;
    let intent = MutationIntent::Update {
      id: target.clone(),
      input: attributes_from_pairs([("status", "Received")]),
    };

    assert!(apply(&applier, &cache, &intent, 10).await.is_err());
    let stored = store.get_one("customers", &target).unwrap().unwrap();
    assert_eq!(stored.text("status"), customer(3).text("status"));
  }

  #[tokio::test]
  async fn test_delete_removes_everywhere() {
    let (_service, store, applier, cache) = setup(25);
    let target = customer(7).id;
    let intent = MutationIntent::Delete { id: target.clone() };

    let (cache, outcome) = apply(&applier, &cache, &intent, 10).await.unwrap();
    assert_eq!(outcome, MutationOutcome::Deleted(target.clone()));
    assert!(cache.find_record(&target).is_none());
    assert_eq!(cache.get_page(0).unwrap().len(), 9);
    let offline = store.read_page("customers", 0, 10).unwrap();
    assert!(offline.iter().all(|r| r.id != target));
  }

  #[tokio::test]
  async fn test_delete_failure_keeps_row() {
    let (service, store, applier, cache) = setup(25);
    service.fail_mutations(true);
    let target = customer(7).id;
    let intent = MutationIntent::Delete { id: target.clone() };

    assert!(apply(&applier, &cache, &intent, 10).await.is_err());
    assert!(cache.find_record(&target).is_some());
    assert!(store.get_one("customers", &target).unwrap().is_some());
  }

  #[test]
  fn test_describe() {
    assert_eq!(create("1").describe(), "create");
    let delete = MutationIntent::Delete { id: "42".into() };
    assert_eq!(delete.describe(), "delete 42");
  }
}
