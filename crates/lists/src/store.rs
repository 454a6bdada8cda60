//! List store operations: create/read/replace/delete over list documents.

use std::sync::Arc;

use tracing::{debug, info};

use podbase_core::{DomainError, DomainResult, ExpectedVersion, ListId, PodcastId, Slug, UserId};
use podbase_directory::PodcastResolver;
use podbase_store::{
    run_with_conflict_retry, RetryError, RetryPolicy, StoreError, Versioned, VersionedStore,
};

use crate::list::PodcastList;

/// A podcast reference supplied by a caller: either an already-canonical id
/// or a feed URL to be resolved (creating a record if unknown).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodcastRef {
    Id(PodcastId),
    Url(String),
}

/// Domain operations over podcast-list documents.
///
/// Reads go straight to the store; every write against an existing document
/// runs through the conflict-retry executor with the list named for reload.
pub struct ListStore {
    store: Arc<dyn VersionedStore<ListId, PodcastList>>,
    resolver: Arc<dyn PodcastResolver>,
    retry: RetryPolicy,
}

impl ListStore {
    pub fn new(
        store: Arc<dyn VersionedStore<ListId, PodcastList>>,
        resolver: Arc<dyn PodcastResolver>,
    ) -> Self {
        Self {
            store,
            resolver,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Create a new list for `owner`, slugging `title`.
    ///
    /// Fails with `InvalidInput` when the title normalizes to an empty slug
    /// and with `Conflict` when the owner already has a list under that slug.
    pub fn create(
        &self,
        owner: UserId,
        title: &str,
        refs: &[PodcastRef],
    ) -> DomainResult<PodcastList> {
        let slug = Slug::from_title(title)?;

        if self.find_by_owner_and_slug(owner, &slug)?.is_some() {
            return Err(DomainError::conflict(format!(
                "list '{slug}' already exists for owner"
            )));
        }

        let podcasts = self.resolve_refs(refs)?;
        let list = PodcastList::new(owner, title, slug, podcasts);
        let id = list.id;

        // First write of a fresh document: no prior version, no retry needed.
        let stored = self
            .store
            .put(&id, ExpectedVersion::Exact(0), list)
            .map_err(DomainError::from)?;

        info!(list_id = %id, owner = %owner, slug = %stored.value.slug, "created podcast list");
        Ok(stored.value)
    }

    /// Look up a list by owner and slug. Read-only, no authorization.
    ///
    /// `slug` arrives raw (e.g. from a URL path) and fails with
    /// `InvalidInput` unless it is already in slug normal form.
    pub fn get_by_owner_and_slug(
        &self,
        owner: UserId,
        slug: &str,
    ) -> DomainResult<Option<Versioned<PodcastList>>> {
        let slug = Slug::parse(slug)?;
        self.find_by_owner_and_slug(owner, &slug)
    }

    /// All lists belonging to `owner`. Order is not significant.
    pub fn list_all_by_owner(&self, owner: UserId) -> DomainResult<Vec<PodcastList>> {
        let all = self.store.scan().map_err(DomainError::from)?;
        Ok(all
            .into_iter()
            .map(|(_, versioned)| versioned.value)
            .filter(|list| list.owner == owner)
            .collect())
    }

    /// Replace the podcast set of a list wholesale.
    ///
    /// Fails with `Forbidden` unless `requester` owns the list. The swap runs
    /// through the conflict-retry executor: on a version conflict the list is
    /// reloaded by identity and the replacement re-applied, up to the retry
    /// budget. A list deleted mid-flight surfaces as `NotFound`.
    pub fn replace_podcasts(
        &self,
        list_id: ListId,
        refs: &[PodcastRef],
        requester: UserId,
    ) -> DomainResult<()> {
        let current = self
            .store
            .get(&list_id)
            .map_err(DomainError::from)?
            .ok_or(DomainError::NotFound)?;

        if current.value.owner != requester {
            return Err(DomainError::Forbidden);
        }

        let podcasts = self.resolve_refs(refs)?;
        let store = &self.store;

        let result = run_with_conflict_retry(
            self.retry,
            current,
            || store.get(&list_id),
            |loaded| {
                let mut next = loaded.value.clone();
                next.podcasts = podcasts.clone();
                store
                    .put(&list_id, ExpectedVersion::Exact(loaded.version), next)
                    .map(|_| ())
            },
        );

        match result {
            Ok(()) => {
                debug!(list_id = %list_id, count = refs.len(), "replaced podcast set");
                Ok(())
            }
            Err(RetryError::NotFound) => Err(DomainError::NotFound),
            Err(RetryError::Exhausted { attempts }) => Err(DomainError::conflict(format!(
                "replace failed after {attempts} conflicting attempts"
            ))),
            Err(RetryError::Store(e)) => Err(e.into()),
        }
    }

    /// Delete a list. Idempotent: deleting an already-gone list succeeds.
    ///
    /// Runs through the conflict-retry executor so a concurrent update racing
    /// the delete cannot resurrect stale data.
    pub fn delete(&self, list_id: ListId, requester: UserId) -> DomainResult<()> {
        let Some(current) = self.store.get(&list_id).map_err(DomainError::from)? else {
            return Ok(());
        };

        if current.value.owner != requester {
            return Err(DomainError::Forbidden);
        }

        let store = &self.store;
        let result = run_with_conflict_retry(
            self.retry,
            current,
            || store.get(&list_id),
            |loaded| store.delete(&list_id, ExpectedVersion::Exact(loaded.version)),
        );

        match result {
            Ok(()) => {
                info!(list_id = %list_id, "deleted podcast list");
                Ok(())
            }
            // A concurrent delete winning the race is still a successful
            // delete from this caller's point of view.
            Err(RetryError::NotFound) | Err(RetryError::Store(StoreError::NotFound)) => Ok(()),
            Err(RetryError::Exhausted { attempts }) => Err(DomainError::conflict(format!(
                "delete failed after {attempts} conflicting attempts"
            ))),
            Err(RetryError::Store(e)) => Err(e.into()),
        }
    }

    fn find_by_owner_and_slug(
        &self,
        owner: UserId,
        slug: &Slug,
    ) -> DomainResult<Option<Versioned<PodcastList>>> {
        let all = self.store.scan().map_err(DomainError::from)?;
        Ok(all
            .into_iter()
            .map(|(_, versioned)| versioned)
            .find(|versioned| versioned.value.owner == owner && &versioned.value.slug == slug))
    }

    fn resolve_refs(&self, refs: &[PodcastRef]) -> DomainResult<Vec<PodcastId>> {
        refs.iter()
            .map(|r| match r {
                PodcastRef::Id(id) => Ok(*id),
                PodcastRef::Url(url) => self.resolver.resolve(url).map_err(DomainError::from),
            })
            .collect()
    }
}
