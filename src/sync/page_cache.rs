//! Page-indexed row cache bounded by navigation recency.
//!
//! Eviction works on whole pages, not rows: only the last `capacity` pages a
//! user visited stay cached. Every operation returns a new cache value and
//! leaves the receiver untouched.

use im::OrdMap;
use std::collections::VecDeque;

use crate::record::{Attributes, Record};

/// Default number of pages kept in the access log.
pub const DEFAULT_PAGE_WINDOW: usize = 10;

/// Recency-ordered, deduplicated page indices. Most recent at the back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessLog {
  capacity: usize,
  pages: VecDeque<usize>,
}

impl AccessLog {
  pub fn new(capacity: usize) -> Self {
    Self {
      capacity: capacity.max(1),
      pages: VecDeque::new(),
    }
  }

  /// Mark a page most recently used, dropping the oldest past capacity.
  pub fn touch(&mut self, page: usize) {
    self.pages.retain(|p| *p != page);
    self.pages.push_back(page);
    while self.pages.len() > self.capacity {
      self.pages.pop_front();
    }
  }

  pub fn contains(&self, page: usize) -> bool {
    self.pages.contains(&page)
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }
}

#[cfg(test)]
impl AccessLog {
  pub fn len(&self) -> usize {
    self.pages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pages.is_empty()
  }

  /// Pages from least to most recently used.
  pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
    self.pages.iter().copied()
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageCache {
  pages: OrdMap<usize, Vec<Record>>,
  access: AccessLog,
}

impl Default for PageCache {
  fn default() -> Self {
    Self::new(DEFAULT_PAGE_WINDOW)
  }
}

impl PageCache {
  pub fn new(capacity: usize) -> Self {
    Self {
      pages: OrdMap::new(),
      access: AccessLog::new(capacity),
    }
  }

  pub fn get_page(&self, page: usize) -> Option<&Vec<Record>> {
    self.pages.get(&page)
  }

  /// Insert or replace a page, mark it most recent, then evict.
  #[must_use]
  pub fn put_page(&self, page: usize, rows: Vec<Record>) -> Self {
    let mut access = self.access.clone();
    access.touch(page);
    Self {
      pages: self.pages.update(page, rows),
      access,
    }
    .evict()
  }

  /// Remove every page that fell out of the access log.
  #[must_use]
  pub fn evict(&self) -> Self {
    let pages = self
      .pages
      .iter()
      .filter(|(page, _)| self.access.contains(**page))
      .map(|(page, rows)| (*page, rows.clone()))
      .collect();
    Self {
      pages,
      access: self.access.clone(),
    }
  }

  /// Drop all pages and forget the navigation history.
  #[must_use]
  pub fn clear(&self) -> Self {
    Self::new(self.access.capacity())
  }

  /// Find a record by id in any cached page.
  pub fn find_record(&self, id: &str) -> Option<(usize, &Record)> {
    self
      .pages
      .iter()
      .find_map(|(page, rows)| rows.iter().find(|r| r.id == id).map(|r| (*page, r)))
  }

  /// Merge `partial` into the record with this id, wherever it is cached.
  #[must_use]
  pub fn patch_record(&self, id: &str, partial: &Attributes) -> Self {
    self.map_owning_page(id, |rows| {
      for row in rows.iter_mut().filter(|r| r.id == id) {
        row.merge(partial);
      }
    })
  }

  /// Apply a confirmed update to the row with `id`, wherever it is cached.
  /// The row takes the record's attributes and id.
  #[must_use]
  pub fn apply_update(&self, id: &str, record: &Record) -> Self {
    self.map_owning_page(id, |rows| {
      for row in rows.iter_mut().filter(|r| r.id == id) {
        row.merge(&record.attributes);
        row.id = record.id.clone();
      }
    })
  }

  /// Remove the record with this id from every cached page.
  #[must_use]
  pub fn remove_record(&self, id: &str) -> Self {
    self.map_owning_page(id, |rows| rows.retain(|r| r.id != id))
  }

  fn map_owning_page<F>(&self, id: &str, mut f: F) -> Self
  where
    F: FnMut(&mut Vec<Record>),
  {
    let mut pages = self.pages.clone();
    for (page, rows) in self.pages.iter() {
      if rows.iter().any(|r| r.id == id) {
        let mut rows = rows.clone();
        f(&mut rows);
        pages = pages.update(*page, rows);
      }
    }
    Self {
      pages,
      access: self.access.clone(),
    }
  }

  /// Cached page indices in ascending order.
  pub fn pages(&self) -> Vec<usize> {
    self.pages.keys().copied().collect()
  }

  #[cfg(test)]
  pub fn access_log(&self) -> &AccessLog {
    &self.access
  }

  pub fn len(&self) -> usize {
    self.pages.len()
  }

  #[cfg(test)]
  pub fn is_empty(&self) -> bool {
    self.pages.is_empty()
  }
}
