//! Concurrent-writer behavior of the list store.
//!
//! Uses a store wrapper that injects a competing write ahead of each persist
//! to force version conflicts deterministically, plus a real multi-threaded
//! race over the in-memory store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use podbase_core::{DomainError, ExpectedVersion, ListId, PodcastId, UserId};
use podbase_directory::InMemoryDirectory;
use podbase_lists::{ListStore, PodcastList, PodcastRef};
use podbase_store::{InMemoryStore, RetryPolicy, StoreError, Versioned, VersionedStore};

/// Store wrapper that, before each of the first `remaining` puts/deletes,
/// lets a competing writer bump the document version so the caller's
/// expected version is stale.
struct ContendedStore {
    inner: InMemoryStore<ListId, PodcastList>,
    remaining: AtomicUsize,
    persist_attempts: AtomicUsize,
}

impl ContendedStore {
    fn new(conflicts: usize) -> Self {
        Self {
            inner: InMemoryStore::new(),
            remaining: AtomicUsize::new(conflicts),
            persist_attempts: AtomicUsize::new(0),
        }
    }

    fn contend(&self, key: &ListId) {
        if self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            if let Ok(Some(current)) = self.inner.get(key) {
                let mut competing = current.value.clone();
                competing.podcasts = vec![PodcastId::new()];
                self.inner
                    .put(key, ExpectedVersion::Exact(current.version), competing)
                    .expect("competing write must succeed");
            }
        }
    }
}

impl VersionedStore<ListId, PodcastList> for ContendedStore {
    fn get(&self, key: &ListId) -> Result<Option<Versioned<PodcastList>>, StoreError> {
        self.inner.get(key)
    }

    fn put(
        &self,
        key: &ListId,
        expected: ExpectedVersion,
        value: PodcastList,
    ) -> Result<Versioned<PodcastList>, StoreError> {
        self.persist_attempts.fetch_add(1, Ordering::SeqCst);
        self.contend(key);
        self.inner.put(key, expected, value)
    }

    fn delete(&self, key: &ListId, expected: ExpectedVersion) -> Result<(), StoreError> {
        self.persist_attempts.fetch_add(1, Ordering::SeqCst);
        self.contend(key);
        self.inner.delete(key, expected)
    }

    fn scan(&self) -> Result<Vec<(ListId, Versioned<PodcastList>)>, StoreError> {
        self.inner.scan()
    }
}

/// Store wrapper where, while armed, the next persist loses to a competing
/// delete: the document is removed and the caller sees a stale-version
/// conflict, so the retrying writer's reload finds nothing.
struct VanishingStore {
    inner: InMemoryStore<ListId, PodcastList>,
    armed: AtomicBool,
}

impl VanishingStore {
    fn new() -> Self {
        Self {
            inner: InMemoryStore::new(),
            armed: AtomicBool::new(false),
        }
    }

    fn vanish(&self, key: &ListId, expected: ExpectedVersion) -> Result<(), StoreError> {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.inner
                .delete(key, ExpectedVersion::Any)
                .expect("competing delete must succeed");
            return Err(StoreError::Conflict { expected, actual: 0 });
        }
        Ok(())
    }
}

impl VersionedStore<ListId, PodcastList> for VanishingStore {
    fn get(&self, key: &ListId) -> Result<Option<Versioned<PodcastList>>, StoreError> {
        self.inner.get(key)
    }

    fn put(
        &self,
        key: &ListId,
        expected: ExpectedVersion,
        value: PodcastList,
    ) -> Result<Versioned<PodcastList>, StoreError> {
        self.vanish(key, expected)?;
        self.inner.put(key, expected, value)
    }

    fn delete(&self, key: &ListId, expected: ExpectedVersion) -> Result<(), StoreError> {
        self.vanish(key, expected)?;
        self.inner.delete(key, expected)
    }

    fn scan(&self) -> Result<Vec<(ListId, Versioned<PodcastList>)>, StoreError> {
        self.inner.scan()
    }
}

fn refs(n: usize) -> Vec<PodcastRef> {
    (0..n).map(|_| PodcastRef::Id(PodcastId::new())).collect()
}

fn expected_ids(refs: &[PodcastRef]) -> Vec<PodcastId> {
    refs.iter()
        .map(|r| match r {
            PodcastRef::Id(id) => *id,
            PodcastRef::Url(_) => unreachable!(),
        })
        .collect()
}

#[test]
fn replace_retries_through_conflicts_and_persists_exactly_one_set() {
    let contended = Arc::new(ContendedStore::new(0));
    let resolver = Arc::new(InMemoryDirectory::new());
    let lists = ListStore::new(contended.clone(), resolver);

    let owner = UserId::new();
    let created = lists.create(owner, "Contended", &refs(1)).unwrap();

    // Three competing writes land ahead of this replace; the retry budget
    // (default 10) absorbs them.
    contended.remaining.store(3, Ordering::SeqCst);
    contended.persist_attempts.store(0, Ordering::SeqCst);

    let mine = refs(2);
    lists.replace_podcasts(created.id, &mine, owner).unwrap();

    let stored = contended.get(&created.id).unwrap().unwrap();
    assert_eq!(stored.value.podcasts, expected_ids(&mine));
    // 3 conflicted attempts + 1 successful attempt.
    assert_eq!(contended.persist_attempts.load(Ordering::SeqCst), 4);
}

#[test]
fn replace_fails_with_conflict_after_exactly_the_retry_bound() {
    let contended = Arc::new(ContendedStore::new(0));
    let resolver = Arc::new(InMemoryDirectory::new());
    let lists = ListStore::new(contended.clone(), resolver)
        .with_retry_policy(RetryPolicy::with_max_attempts(4));

    let owner = UserId::new();
    let created = lists.create(owner, "Hot", &refs(1)).unwrap();

    // More conflicts than the budget allows: every attempt loses the race.
    contended.remaining.store(usize::MAX, Ordering::SeqCst);
    contended.persist_attempts.store(0, Ordering::SeqCst);

    let err = lists
        .replace_podcasts(created.id, &refs(2), owner)
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(contended.persist_attempts.load(Ordering::SeqCst), 4);

    // The competing writer's set is what persisted: one writer's set, never
    // a merge.
    let stored = contended.get(&created.id).unwrap().unwrap();
    assert_eq!(stored.value.podcasts.len(), 1);
}

#[test]
fn delete_succeeds_despite_a_racing_update() {
    let contended = Arc::new(ContendedStore::new(0));
    let resolver = Arc::new(InMemoryDirectory::new());
    let lists = ListStore::new(contended.clone(), resolver);

    let owner = UserId::new();
    let created = lists.create(owner, "Doomed", &refs(1)).unwrap();

    contended.remaining.store(2, Ordering::SeqCst);
    lists.delete(created.id, owner).unwrap();

    assert!(contended.get(&created.id).unwrap().is_none());
}

#[test]
fn replace_is_not_found_when_the_list_vanishes_mid_retry() {
    let vanishing = Arc::new(VanishingStore::new());
    let resolver = Arc::new(InMemoryDirectory::new());
    let lists = ListStore::new(vanishing.clone(), resolver);

    let owner = UserId::new();
    let created = lists.create(owner, "Fleeting", &refs(1)).unwrap();
    vanishing.armed.store(true, Ordering::SeqCst);

    let err = lists
        .replace_podcasts(created.id, &refs(2), owner)
        .unwrap_err();
    assert_eq!(err, DomainError::NotFound);
    assert!(vanishing.get(&created.id).unwrap().is_none());
}

#[test]
fn delete_succeeds_when_a_competing_delete_wins_mid_retry() {
    let vanishing = Arc::new(VanishingStore::new());
    let resolver = Arc::new(InMemoryDirectory::new());
    let lists = ListStore::new(vanishing.clone(), resolver);

    let owner = UserId::new();
    let created = lists.create(owner, "Fleeting", &refs(1)).unwrap();
    vanishing.armed.store(true, Ordering::SeqCst);

    lists.delete(created.id, owner).unwrap();
    assert!(vanishing.get(&created.id).unwrap().is_none());
}

#[test]
fn racing_replacers_all_land_serialized_by_retry() {
    let store: Arc<InMemoryStore<ListId, PodcastList>> = Arc::new(InMemoryStore::new());
    let resolver = Arc::new(InMemoryDirectory::new());
    let lists = Arc::new(ListStore::new(
        store.clone() as Arc<dyn VersionedStore<ListId, PodcastList>>,
        resolver,
    ));

    let owner = UserId::new();
    let created = lists.create(owner, "Race", &refs(1)).unwrap();

    let candidate_sets: Vec<Vec<PodcastRef>> = (0..4).map(|_| refs(2)).collect();
    let handles: Vec<_> = candidate_sets
        .iter()
        .cloned()
        .map(|set| {
            let lists = lists.clone();
            let list_id = created.id;
            thread::spawn(move || lists.replace_podcasts(list_id, &set, owner))
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    // Every writer eventually landed (create + 4 replaces), and the final
    // set is exactly one writer's set.
    let stored = store.get(&created.id).unwrap().unwrap();
    assert_eq!(stored.version, 5);
    assert!(candidate_sets
        .iter()
        .map(|set| expected_ids(set))
        .any(|ids| ids == stored.value.podcasts));
}
