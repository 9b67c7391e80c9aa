//! Offline fallback store.
//!
//! A persistent mirror of every row the service has returned, used only to
//! synthesize a page when a live fetch fails:
//! - Upserts keyed by record id, scoped per collection
//! - Insertion order is preserved so offline pages are stable
//! - Capacity-bounded: the oldest rows go first

mod storage;
mod traits;

pub use storage::{NoopStorage, SqliteStorage};
pub use traits::OfflineStore;
