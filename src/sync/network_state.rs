//! Fetch status for driving loading indicators.
//!
//! The in-flight phase and the error are tracked separately: a list can be
//! showing offline data with an error notice while a retry is in flight.

/// Status shown by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
  /// Nothing in flight, last fetch succeeded (or none happened yet)
  Idle,
  /// First fetch in flight, nothing to show yet
  InitialLoading,
  /// Fetch in flight while earlier rows stay visible
  BackgroundRefreshing,
  /// Last fetch failed
  Error,
}

impl FetchStatus {
  pub fn label(&self) -> &'static str {
    match self {
      FetchStatus::Idle => "idle",
      FetchStatus::InitialLoading => "loading",
      FetchStatus::BackgroundRefreshing => "refreshing",
      FetchStatus::Error => "error",
    }
  }
}

/// Where the rows on screen came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSource {
  #[default]
  None,
  /// Fresh response from the service
  Network,
  /// Page cache hit, a refresh may be pending
  Cache,
  /// Offline store, the service could not be reached
  Offline,
}

#[derive(Debug, Clone, Default)]
pub struct NetworkStateTracker {
  in_flight: usize,
  has_data: bool,
  error: Option<String>,
  source: DataSource,
}

impl NetworkStateTracker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn status(&self) -> FetchStatus {
    if self.in_flight > 0 {
      if self.has_data {
        FetchStatus::BackgroundRefreshing
      } else {
        FetchStatus::InitialLoading
      }
    } else if self.error.is_some() {
      FetchStatus::Error
    } else {
      FetchStatus::Idle
    }
  }

  /// A fetch was dispatched.
  pub fn begin(&mut self) {
    self.in_flight += 1;
  }

  /// A fetch came back, whether or not its result was applied.
  pub fn settle(&mut self) {
    self.in_flight = self.in_flight.saturating_sub(1);
  }

  /// Fresh rows were applied.
  pub fn succeed(&mut self) {
    self.has_data = true;
    self.error = None;
    self.source = DataSource::Network;
  }

  /// The last fetch failed. `fallback` tells whether offline rows are shown.
  pub fn fail(&mut self, message: impl Into<String>, fallback: bool) {
    self.error = Some(message.into());
    if fallback {
      self.has_data = true;
      self.source = DataSource::Offline;
    }
  }

  /// Cached rows were put on screen ahead of a refresh.
  pub fn show_cached(&mut self) {
    self.has_data = true;
    self.source = DataSource::Cache;
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn source(&self) -> DataSource {
    self.source
  }

  pub fn is_offline(&self) -> bool {
    self.source == DataSource::Offline
  }

  #[cfg(test)]
  pub fn has_data(&self) -> bool {
    self.has_data
  }

  #[cfg(test)]
  pub fn in_flight(&self) -> usize {
    self.in_flight
  }
}
