//! In-memory service double for sync tests.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::time::Instant;

use crate::collection::Collection;
use crate::error::{SyncError, SyncResult};
use crate::record::{attributes_from_pairs, Attributes, Record};
use crate::remote::{PageResponse, RemoteDataService};

use super::QuerySpec;

pub fn customer(i: usize) -> Record {
  let phone = format!("0300-{:07}", i);
  let status = if i % 2 == 0 { "Pending" } else { "Received" };
  Record::new(
    phone.clone(),
    attributes_from_pairs([
      ("name", format!("Customer {}", i)),
      ("phone", phone),
      ("status", status.to_string()),
    ]),
  )
}

/// Customer rows held in memory. Records every query it serves.
#[derive(Default)]
pub struct FakeService {
  rows: Mutex<Vec<Record>>,
  queries: Mutex<Vec<(Instant, QuerySpec)>>,
  fail_queries: AtomicBool,
  fail_mutations: AtomicBool,
  mutations: AtomicUsize,
}

impl FakeService {
  pub fn with_customers(n: usize) -> Self {
    Self {
      rows: Mutex::new((0..n).map(customer).collect()),
      ..Default::default()
    }
  }

  pub fn all_rows(&self) -> Vec<Record> {
    self.rows.lock().unwrap().clone()
  }

  pub fn fail_queries(&self, fail: bool) {
    self.fail_queries.store(fail, Ordering::SeqCst);
  }

  pub fn fail_mutations(&self, fail: bool) {
    self.fail_mutations.store(fail, Ordering::SeqCst);
  }

  pub fn queries(&self) -> Vec<QuerySpec> {
    self.queries.lock().unwrap().iter().map(|(_, s)| s.clone()).collect()
  }

  pub fn query_times(&self) -> Vec<Instant> {
    self.queries.lock().unwrap().iter().map(|(t, _)| *t).collect()
  }

  pub fn mutation_count(&self) -> usize {
    self.mutations.load(Ordering::SeqCst)
  }

  fn check_mutation(&self) -> SyncResult<()> {
    self.mutations.fetch_add(1, Ordering::SeqCst);
    if self.fail_mutations.load(Ordering::SeqCst) {
      return Err(SyncError::Mutation("service unavailable".to_string()));
    }
    Ok(())
  }
}

#[async_trait]
impl RemoteDataService for FakeService {
  async fn query_page(&self, _collection: Collection, spec: &QuerySpec) -> SyncResult<PageResponse> {
    self.queries.lock().unwrap().push((Instant::now(), spec.clone()));
    if self.fail_queries.load(Ordering::SeqCst) {
      return Err(SyncError::Network("connection refused".to_string()));
    }

    let matching: Vec<Record> = self
      .rows
      .lock()
      .unwrap()
      .iter()
      .filter(|r| spec.search.is_empty() || r.text("name").contains(&spec.search))
      .filter(|r| spec.status.as_ref().map_or(true, |s| r.text("status") == *s))
      .cloned()
      .collect();
    let total = matching.len() as u64;
    let rows = matching
      .into_iter()
      .skip(spec.page * spec.limit)
      .take(spec.limit)
      .collect();
    Ok(PageResponse { rows, total })
  }

  async fn create(&self, _collection: Collection, input: &Attributes) -> SyncResult<Record> {
    self.check_mutation()?;
    let record = Record::from_wire(Value::Object(input.clone()), "phone")
      .ok_or_else(|| SyncError::Mutation("phone missing".to_string()))?;
    self.rows.lock().unwrap().insert(0, record.clone());
    Ok(record)
  }

  async fn update(&self, _collection: Collection, id: &str, input: &Attributes) -> SyncResult<Record> {
    self.check_mutation()?;
    let mut rows = self.rows.lock().unwrap();
    let row = rows
      .iter_mut()
      .find(|r| r.id == id)
      .ok_or_else(|| SyncError::Mutation(format!("{} not found", id)))?;
    row.merge(input);
    row.id = row.text("phone");
    Ok(row.clone())
  }

  async fn delete(&self, _collection: Collection, id: &str) -> SyncResult<String> {
    self.check_mutation()?;
    self.rows.lock().unwrap().retain(|r| r.id != id);
    Ok(id.to_string())
  }
}
