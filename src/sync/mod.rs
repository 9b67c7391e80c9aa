//! Paginated remote-data sync: query building, rate limiting, page caching,
//! offline fallback and mutation reconciliation for one list view.

mod coordinator;
pub mod limiter;
pub mod mutation;
pub mod network_state;
pub mod page_cache;
pub mod query_spec;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{QueryCoordinator, SyncEvent};
pub use network_state::{DataSource, FetchStatus};
pub use query_spec::{ColumnFilterModel, PaginationModel, QuerySpec};
