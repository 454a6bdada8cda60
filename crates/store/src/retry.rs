//! Conflict-retry executor: bounded reload-and-retry around optimistic writes.

use thiserror::Error;
use tracing::{debug, warn};

use crate::document::StoreError;

/// Default attempt budget for a conflicted write.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Retry policy for a mutate-then-persist operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(max_attempts: usize) -> Self {
        Self { max_attempts }
    }
}

/// Terminal outcome of a conflicted write.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetryError {
    /// A reload found the document deleted. Never silently treated as
    /// success; callers with idempotent semantics (delete) map this
    /// themselves.
    #[error("document vanished during conflict retry")]
    NotFound,

    /// The attempt budget was spent without a successful persist. The only
    /// path by which a version conflict becomes visible to the caller.
    #[error("conflict retries exhausted after {attempts} attempts")]
    Exhausted { attempts: usize },

    /// A non-conflict store failure, propagated unchanged.
    #[error(transparent)]
    Store(StoreError),
}

/// Execute `attempt` against in-memory state, reloading on version conflict.
///
/// `attempt(&state)` is a fresh read-mutate-write cycle over documents the
/// caller has already loaded into `state`. When the store rejects the persist
/// with [`StoreError::Conflict`], `reload()` re-fetches every named document
/// by identity — `Ok(Some(state))` with refreshed contents, or `Ok(None)`
/// when a document has vanished — and the attempt is re-invoked with the
/// fresh state. Any other store error ends the operation immediately.
///
/// No delay is inserted between attempts; the only bound is
/// `policy.max_attempts`.
pub fn run_with_conflict_retry<S, T>(
    policy: RetryPolicy,
    mut state: S,
    mut reload: impl FnMut() -> Result<Option<S>, StoreError>,
    mut attempt: impl FnMut(&S) -> Result<T, StoreError>,
) -> Result<T, RetryError> {
    for attempt_no in 1..=policy.max_attempts {
        match attempt(&state) {
            Ok(value) => return Ok(value),
            Err(StoreError::Conflict { expected, actual }) => {
                debug!(
                    attempt = attempt_no,
                    max_attempts = policy.max_attempts,
                    ?expected,
                    actual,
                    "version conflict, reloading"
                );

                if attempt_no == policy.max_attempts {
                    break;
                }

                match reload().map_err(RetryError::Store)? {
                    Some(fresh) => state = fresh,
                    None => return Err(RetryError::NotFound),
                }
            }
            Err(other) => return Err(RetryError::Store(other)),
        }
    }

    warn!(
        attempts = policy.max_attempts,
        "conflict retries exhausted"
    );
    Err(RetryError::Exhausted {
        attempts: policy.max_attempts,
    })
}
