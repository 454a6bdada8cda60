//! In-memory versioned document store.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use podbase_core::ExpectedVersion;

use crate::document::{StoreError, Versioned, VersionedStore};

/// In-memory versioned store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryStore<K, V> {
    documents: RwLock<HashMap<K, Versioned<V>>>,
}

impl<K, V> InMemoryStore<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> VersionedStore<K, V> for InMemoryStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Result<Option<Versioned<V>>, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        Ok(documents.get(key).cloned())
    }

    fn put(
        &self,
        key: &K,
        expected: ExpectedVersion,
        value: V,
    ) -> Result<Versioned<V>, StoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        let current = documents.get(key).map(|d| d.version).unwrap_or(0);
        if !expected.matches(current) {
            return Err(StoreError::Conflict {
                expected,
                actual: current,
            });
        }

        let stored = Versioned::new(value, current + 1);
        documents.insert(key.clone(), stored.clone());
        Ok(stored)
    }

    fn delete(&self, key: &K, expected: ExpectedVersion) -> Result<(), StoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        let current = match documents.get(key) {
            Some(d) => d.version,
            None => return Err(StoreError::NotFound),
        };

        if !expected.matches(current) {
            return Err(StoreError::Conflict {
                expected,
                actual: current,
            });
        }

        documents.remove(key);
        Ok(())
    }

    fn scan(&self) -> Result<Vec<(K, Versioned<V>)>, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        Ok(documents
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
