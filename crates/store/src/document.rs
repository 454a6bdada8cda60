//! Versioned key-value document store contract.

use std::sync::Arc;

use thiserror::Error;

use podbase_core::ExpectedVersion;

/// A document together with its store-assigned version token.
///
/// Versions are per-key, monotonically increasing, and start at 1 for the
/// first successful write. The version lives in this envelope, never inside
/// the document itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}

impl<T> Versioned<T> {
    pub fn new(value: T, version: u64) -> Self {
        Self { value, version }
    }
}

/// Document store operation error.
///
/// `Conflict` is the transient, retryable case: the document's stored version
/// no longer matches what the writer last read. It is absorbed by the retry
/// executor and only becomes caller-visible once the retry budget is spent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("version conflict (expected: {expected:?}, actual: {actual})")]
    Conflict {
        expected: ExpectedVersion,
        actual: u64,
    },

    #[error("document not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for podbase_core::DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { expected, actual } => podbase_core::DomainError::conflict(
                format!("version conflict (expected: {expected:?}, actual: {actual})"),
            ),
            StoreError::NotFound => podbase_core::DomainError::NotFound,
            StoreError::Storage(msg) => podbase_core::DomainError::internal(msg),
        }
    }
}

/// Versioned key-value document store.
///
/// ## Write semantics
///
/// `put()` checks the expected version against the current stored version
/// (an absent document counts as version 0, so `Exact(0)` is the
/// create-if-absent form), then replaces the document wholesale and assigns
/// `current + 1`. `delete()` performs the same check before removal.
///
/// ## Implementation requirements
///
/// Implementations must:
/// - enforce the optimistic version check atomically with the write
/// - assign versions monotonically per key (no gaps, no reuse)
/// - allow readers to run concurrently with writers
pub trait VersionedStore<K, V>: Send + Sync {
    /// Load a document by identity, with its current version.
    fn get(&self, key: &K) -> Result<Option<Versioned<V>>, StoreError>;

    /// Replace (or create) a document, enforcing the expected prior version.
    fn put(&self, key: &K, expected: ExpectedVersion, value: V)
        -> Result<Versioned<V>, StoreError>;

    /// Delete a document, enforcing the expected prior version.
    fn delete(&self, key: &K, expected: ExpectedVersion) -> Result<(), StoreError>;

    /// List every stored document. Order is unspecified.
    ///
    /// Exists for secondary lookups (e.g. an owner+slug scan); backends with
    /// real indexes may serve those differently.
    fn scan(&self) -> Result<Vec<(K, Versioned<V>)>, StoreError>;
}

impl<S, K, V> VersionedStore<K, V> for Arc<S>
where
    S: VersionedStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Result<Option<Versioned<V>>, StoreError> {
        (**self).get(key)
    }

    fn put(
        &self,
        key: &K,
        expected: ExpectedVersion,
        value: V,
    ) -> Result<Versioned<V>, StoreError> {
        (**self).put(key, expected, value)
    }

    fn delete(&self, key: &K, expected: ExpectedVersion) -> Result<(), StoreError> {
        (**self).delete(key, expected)
    }

    fn scan(&self) -> Result<Vec<(K, Versioned<V>)>, StoreError> {
        (**self).scan()
    }
}
