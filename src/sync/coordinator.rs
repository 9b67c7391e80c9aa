//! One list view's sync loop.
//!
//! A `QueryCoordinator` owns the inputs, page cache, limiter timers and
//! network state of a single collection view. Timers and remote calls run
//! on spawned tasks and report back as [`SyncEvent`]s over the channel the
//! coordinator was built with; the owner feeds them back through
//! [`QueryCoordinator::handle`] on its own loop.

use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::cache::OfflineStore;
use crate::collection::{Collection, ColumnDef};
use crate::config::SyncConfig;
use crate::error::SyncResult;
use crate::record::{Attributes, Record};
use crate::remote::{PageResponse, RemoteDataService};

use super::limiter::{Debouncer, Throttle};
use super::mutation::{log_store, MutationApplier, MutationIntent, MutationOutcome};
use super::network_state::{FetchStatus, NetworkStateTracker};
use super::page_cache::PageCache;
use super::query_spec::{ColumnFilterModel, PaginationModel, QueryInputs, QuerySpec};

/// Work reported back to a coordinator
#[derive(Debug)]
pub enum SyncEvent {
  /// Search input went idle
  SearchSettled { collection: Collection, text: String },
  /// Throttle released a query
  Dispatch { collection: Collection, spec: QuerySpec },
  /// A page query returned
  Fetched {
    collection: Collection,
    seq: u64,
    spec: QuerySpec,
    result: SyncResult<PageResponse>,
  },
  /// The service answered a mutation
  Mutated {
    collection: Collection,
    ticket: u64,
    intent: MutationIntent,
    result: SyncResult<MutationOutcome>,
  },
}

impl SyncEvent {
  pub fn collection(&self) -> Collection {
    match self {
      SyncEvent::SearchSettled { collection, .. }
      | SyncEvent::Dispatch { collection, .. }
      | SyncEvent::Fetched { collection, .. }
      | SyncEvent::Mutated { collection, .. } => *collection,
    }
  }
}

/// Result of one mutation, tagged with the ticket its send returned
#[derive(Debug)]
pub struct MutationSettled {
  pub ticket: u64,
  pub result: SyncResult<MutationOutcome>,
}

/// What a notice's retry action re-issues
#[derive(Debug, Clone, PartialEq)]
pub enum Retry {
  Query(QuerySpec),
  Mutation(MutationIntent),
}

/// Dismissible message shown above the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
  pub message: String,
  pub retry: Option<Retry>,
}

pub struct QueryCoordinator {
  collection: Collection,
  inputs: QueryInputs,
  /// Raw search text as typed, ahead of the debounce
  search_text: String,
  cache: PageCache,
  /// Rows on screen. May come from the cache, the service or the offline store.
  rows: Vec<Record>,
  total: u64,
  tracker: NetworkStateTracker,
  notice: Option<Notice>,
  remote: Arc<dyn RemoteDataService>,
  store: Arc<dyn OfflineStore>,
  applier: MutationApplier,
  offline_capacity: usize,
  debouncer: Debouncer<String>,
  throttle: Throttle<QuerySpec>,
  tx: UnboundedSender<SyncEvent>,
  next_seq: u64,
  applied_seq: u64,
  next_ticket: u64,
  last_dispatched: Option<QuerySpec>,
  failed_mutation: Option<MutationIntent>,
  pending_mutations: usize,
}

impl QueryCoordinator {
  pub fn new(
    collection: Collection,
    config: &SyncConfig,
    remote: Arc<dyn RemoteDataService>,
    store: Arc<dyn OfflineStore>,
    tx: UnboundedSender<SyncEvent>,
  ) -> Self {
    let debouncer = {
      let tx = tx.clone();
      Debouncer::new(config.debounce(), move |text| {
        let _ = tx.send(SyncEvent::SearchSettled { collection, text });
      })
    };
    let throttle = {
      let tx = tx.clone();
      Throttle::new(config.throttle(), move |spec| {
        let _ = tx.send(SyncEvent::Dispatch { collection, spec });
      })
    };
    let applier = MutationApplier::new(
      collection,
      Arc::clone(&remote),
      Arc::clone(&store),
      config.offline_capacity,
    );

    Self {
      collection,
      inputs: QueryInputs::new(collection, config.page_size),
      search_text: String::new(),
      cache: PageCache::new(config.page_window),
      rows: Vec::new(),
      total: 0,
      tracker: NetworkStateTracker::new(),
      notice: None,
      remote,
      store,
      applier,
      offline_capacity: config.offline_capacity,
      debouncer,
      throttle,
      tx,
      next_seq: 0,
      applied_seq: 0,
      next_ticket: 0,
      last_dispatched: None,
      failed_mutation: None,
      pending_mutations: 0,
    }
  }

  /// Initial load.
  pub fn start(&mut self) {
    self.request();
  }

  /// Apply an event addressed to this coordinator. Returns the result of a
  /// finished mutation so the caller can close or keep its form.
  pub fn handle(&mut self, event: SyncEvent) -> Option<MutationSettled> {
    if event.collection() != self.collection {
      return None;
    }
    match event {
      SyncEvent::SearchSettled { text, .. } => {
        self.apply_search(text);
        None
      }
      SyncEvent::Dispatch { spec, .. } => {
        self.dispatch(spec);
        None
      }
      SyncEvent::Fetched {
        seq, spec, result, ..
      } => {
        self.apply_fetch(seq, spec, result);
        None
      }
      SyncEvent::Mutated {
        ticket,
        intent,
        result,
        ..
      } => Some(MutationSettled {
        ticket,
        result: self.apply_mutation(intent, result),
      }),
    }
  }

  // Input callbacks

  pub fn on_search_change(&mut self, text: &str) {
    self.search_text = text.to_string();
    self.debouncer.schedule(text.to_string());
  }

  pub fn on_filter_change(&mut self, label: &str) {
    if self.inputs.status_label == label {
      return;
    }
    self.inputs.status_label = label.to_string();
    self.reset_query();
    self.request();
  }

  pub fn on_date_range_change(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
    if self.inputs.start_date == start && self.inputs.end_date == end {
      return;
    }
    self.inputs.start_date = start;
    self.inputs.end_date = end;
    self.reset_query();
    self.request();
  }

  pub fn on_column_filter_change(&mut self, model: ColumnFilterModel) {
    if self.inputs.column_filters == model {
      return;
    }
    self.inputs.column_filters = model;
    self.reset_query();
    self.request();
  }

  pub fn on_page_change(&mut self, model: PaginationModel) {
    if self.inputs.pagination == model {
      return;
    }
    if model.page_size != self.inputs.pagination.page_size {
      // Cached pages were cut at the old size
      self.cache = self.cache.clear();
    }
    self.inputs.pagination = PaginationModel {
      page: model.page,
      page_size: model.page_size.max(1),
    };
    self.request();
  }

  /// Re-issue the last dispatched query.
  pub fn on_retry(&mut self) {
    self.notice = None;
    match self.last_dispatched.clone() {
      Some(spec) => self.throttle.schedule(spec),
      None => self.request(),
    }
  }

  // Mutation callbacks

  /// Validate and send a create. Validation errors never reach the service.
  /// Returns the ticket the result will carry.
  pub fn on_add(&mut self, data: Attributes) -> SyncResult<u64> {
    self.collection.validate(&data)?;
    Ok(self.mutate(MutationIntent::Create { input: data }))
  }

  /// Record to prefill the edit form with.
  pub fn on_edit(&self, id: &str) -> Option<Record> {
    self
      .rows
      .iter()
      .find(|r| r.id == id)
      .or_else(|| self.cache.find_record(id).map(|(_, r)| r))
      .cloned()
  }

  pub fn on_update(&mut self, id: &str, data: Attributes) -> SyncResult<u64> {
    self.collection.validate(&data)?;
    Ok(self.mutate(MutationIntent::Update {
      id: id.to_string(),
      input: data,
    }))
  }

  pub fn on_delete(&mut self, id: &str) -> u64 {
    self.mutate(MutationIntent::Delete { id: id.to_string() })
  }

  /// Re-issue the last failed mutation. Returns false if there is none.
  pub fn retry_mutation(&mut self) -> bool {
    match self.failed_mutation.take() {
      Some(intent) => {
        self.notice = None;
        self.mutate(intent);
        true
      }
      None => false,
    }
  }

  /// Run the retry bound to the current notice, if any. A failed query is
  /// re-sent as it was unless the filters have moved on since.
  pub fn retry_notice(&mut self) {
    match self.notice.as_ref().and_then(|n| n.retry.clone()) {
      Some(Retry::Query(spec)) => {
        self.notice = None;
        if spec.same_filters(&self.inputs.build()) {
          self.throttle.schedule(spec);
        } else {
          self.request();
        }
      }
      Some(Retry::Mutation(_)) => {
        self.retry_mutation();
      }
      None => {}
    }
  }

  pub fn dismiss_notice(&mut self) {
    self.notice = None;
  }

  // Internals

  fn apply_search(&mut self, text: String) {
    if self.inputs.search == text {
      return;
    }
    self.inputs.search = text;
    self.reset_query();
    self.request();
  }

  /// New filters invalidate every page offset.
  fn reset_query(&mut self) {
    self.inputs.pagination.page = 0;
    self.cache = self.cache.clear();
  }

  /// Show cached rows for the current page right away, then queue a fetch.
  fn request(&mut self) {
    let spec = self.inputs.build();
    if let Some(rows) = self.cache.get_page(spec.page) {
      self.rows = rows.clone();
      self.tracker.show_cached();
    }
    self.throttle.schedule(spec);
  }

  fn dispatch(&mut self, spec: QuerySpec) {
    self.next_seq += 1;
    let seq = self.next_seq;
    debug!(
      collection = self.collection.name(),
      seq,
      page = spec.page,
      search = %spec.search,
      cached_pages = self.cache.len(),
      "dispatching page query"
    );
    self.last_dispatched = Some(spec.clone());
    self.tracker.begin();

    let remote = Arc::clone(&self.remote);
    let tx = self.tx.clone();
    let collection = self.collection;
    tokio::spawn(async move {
      let result = remote.query_page(collection, &spec).await;
      let _ = tx.send(SyncEvent::Fetched {
        collection,
        seq,
        spec,
        result,
      });
    });
  }

  fn apply_fetch(&mut self, seq: u64, spec: QuerySpec, result: SyncResult<PageResponse>) {
    self.tracker.settle();
    if !spec.same_filters(&self.inputs.build()) {
      debug!(seq, "discarding response for outdated filters");
      return;
    }
    if seq < self.applied_seq {
      debug!(seq, applied = self.applied_seq, "discarding stale response");
      return;
    }
    self.applied_seq = seq;

    let name = self.collection.name();
    let current = spec.page == self.inputs.pagination.page;
    match result {
      Ok(page) => {
        log_store("mirror", self.store.mirror(name, &page.rows));
        log_store("purge", self.store.purge_beyond(name, self.offline_capacity));

        self.total = page.total;
        if current {
          self.rows = page.rows.clone();
        }
        self.cache = self.cache.put_page(spec.page, page.rows);
        self.tracker.succeed();
        if matches!(
          self.notice,
          Some(Notice {
            retry: Some(Retry::Query(_)),
            ..
          })
        ) {
          self.notice = None;
        }
      }
      Err(e) => {
        warn!(collection = name, page = spec.page, error = %e, "page query failed");
        let message = e.to_string();
        let fallback = current && self.show_fallback(&spec);
        self.tracker.fail(message.clone(), fallback);
        if e.is_user_facing() {
          self.notice = Some(Notice {
            message,
            retry: Some(Retry::Query(spec)),
          });
        }
      }
    }
  }

  /// Put the best rows available for a failed page on screen. Returns true
  /// if they came from the offline store.
  fn show_fallback(&mut self, spec: &QuerySpec) -> bool {
    if let Some(rows) = self.cache.get_page(spec.page) {
      self.rows = rows.clone();
      return false;
    }

    let name = self.collection.name();
    match self.store.read_page(name, spec.page, spec.limit) {
      Ok(rows) if !rows.is_empty() => {
        info!(collection = name, page = spec.page, rows = rows.len(), "serving offline rows");
        self.total = self
          .store
          .count(name)
          .map(|n| n as u64)
          .unwrap_or(rows.len() as u64);
        self.rows = rows;
        true
      }
      Ok(_) => {
        self.rows.clear();
        false
      }
      Err(e) => {
        warn!(collection = name, error = %e, "offline read failed");
        self.rows.clear();
        false
      }
    }
  }

  fn mutate(&mut self, intent: MutationIntent) -> u64 {
    self.next_ticket += 1;
    let ticket = self.next_ticket;
    debug!(collection = self.collection.name(), ticket, intent = %intent.describe(), "sending mutation");
    self.pending_mutations += 1;
    let applier = self.applier.clone();
    let tx = self.tx.clone();
    let collection = self.collection;
    tokio::spawn(async move {
      let result = applier.send(&intent).await;
      let _ = tx.send(SyncEvent::Mutated {
        collection,
        ticket,
        intent,
        result,
      });
    });
    ticket
  }

  fn apply_mutation(
    &mut self,
    intent: MutationIntent,
    result: SyncResult<MutationOutcome>,
  ) -> SyncResult<MutationOutcome> {
    self.pending_mutations = self.pending_mutations.saturating_sub(1);
    let outcome = match result {
      Ok(outcome) => outcome,
      Err(e) => {
        warn!(collection = self.collection.name(), intent = %intent.describe(), error = %e, "mutation failed");
        self.notice = Some(Notice {
          message: e.to_string(),
          retry: Some(Retry::Mutation(intent.clone())),
        });
        self.failed_mutation = Some(intent);
        return Err(e);
      }
    };

    let page_size = self.inputs.pagination.page_size;
    self.cache = self.applier.reconcile(&self.cache, &outcome, page_size);
    match &outcome {
      MutationOutcome::Created(_) => {
        self.inputs.pagination.page = 0;
        self.total += 1;
        if let Some(rows) = self.cache.get_page(0) {
          self.rows = rows.clone();
          self.tracker.show_cached();
        }
        self.throttle.schedule(self.inputs.build());
      }
      MutationOutcome::Updated {
        previous_id,
        record,
      } => {
        for row in self.rows.iter_mut().filter(|r| r.id == *previous_id) {
          row.merge(&record.attributes);
          row.id = record.id.clone();
        }
      }
      MutationOutcome::Deleted(id) => {
        if self.rows.iter().any(|r| r.id == *id) {
          self.rows.retain(|r| r.id != *id);
          self.total = self.total.saturating_sub(1);
        }
      }
    }

    if self.failed_mutation.as_ref() == Some(&intent) {
      self.failed_mutation = None;
    }
    if matches!(
      self.notice,
      Some(Notice {
        retry: Some(Retry::Mutation(_)),
        ..
      })
    ) {
      self.notice = None;
    }
    Ok(outcome)
  }

  // Accessors for rendering

  pub fn collection(&self) -> Collection {
    self.collection
  }

  pub fn rows(&self) -> &[Record] {
    &self.rows
  }

  pub fn columns(&self) -> &'static [ColumnDef] {
    self.collection.columns()
  }

  pub fn total(&self) -> u64 {
    self.total
  }

  pub fn page(&self) -> usize {
    self.inputs.pagination.page
  }

  pub fn page_size(&self) -> usize {
    self.inputs.pagination.page_size
  }

  /// Number of pages for the current total, at least 1.
  pub fn page_count(&self) -> usize {
    let size = self.page_size().max(1) as u64;
    (self.total.div_ceil(size) as usize).max(1)
  }

  pub fn status(&self) -> FetchStatus {
    self.tracker.status()
  }

  pub fn tracker(&self) -> &NetworkStateTracker {
    &self.tracker
  }

  pub fn notice(&self) -> Option<&Notice> {
    self.notice.as_ref()
  }

  pub fn search_text(&self) -> &str {
    &self.search_text
  }

  pub fn inputs(&self) -> &QueryInputs {
    &self.inputs
  }

  #[cfg(test)]
  pub fn cache(&self) -> &PageCache {
    &self.cache
  }

  pub fn is_mutating(&self) -> bool {
    self.pending_mutations > 0
  }
}
