//! Remote storefront service.

pub mod api_types;
mod client;

use async_trait::async_trait;

use crate::collection::Collection;
use crate::error::SyncResult;
use crate::record::{Attributes, Record};
use crate::sync::QuerySpec;

pub use client::GraphqlClient;

/// One page of rows plus the total row count for pagination controls.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
  pub rows: Vec<Record>,
  pub total: u64,
}

/// Paginated read and mutation endpoints.
///
/// Reads fail with `SyncError::Network`, writes with `SyncError::Mutation`.
#[async_trait]
pub trait RemoteDataService: Send + Sync {
  async fn query_page(&self, collection: Collection, spec: &QuerySpec) -> SyncResult<PageResponse>;

  async fn create(&self, collection: Collection, input: &Attributes) -> SyncResult<Record>;

  async fn update(&self, collection: Collection, id: &str, input: &Attributes)
    -> SyncResult<Record>;

  /// Returns the id of the deleted record.
  async fn delete(&self, collection: Collection, id: &str) -> SyncResult<String>;
}
