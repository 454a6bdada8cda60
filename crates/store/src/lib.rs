//! `podbase-store` — versioned document storage and conflict-retry execution.
//!
//! Writers never lock: every write carries an expected prior version, the
//! store rejects stale writes with a distinguished conflict error, and the
//! retry executor resolves those conflicts by reload-and-retry.

pub mod document;
pub mod in_memory;
pub mod retry;

pub use document::{StoreError, Versioned, VersionedStore};
pub use in_memory::InMemoryStore;
pub use retry::{run_with_conflict_retry, RetryError, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
