//! Directory capabilities and the in-memory catalog backend.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::debug;

use podbase_core::{GroupId, PodcastId};

use crate::podcast::Podcast;
use crate::toplist::{PodcastGroup, ToplistEntry};

/// Directory operation error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("podcast not found: {0}")]
    PodcastNotFound(PodcastId),

    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<DirectoryError> for podbase_core::DomainError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::PodcastNotFound(_) | DirectoryError::GroupNotFound(_) => {
                podbase_core::DomainError::NotFound
            }
            DirectoryError::Storage(msg) => podbase_core::DomainError::internal(msg),
        }
    }
}

/// Opaque URL-to-canonical-podcast resolution capability.
///
/// Resolving an unknown URL creates a new podcast record.
pub trait PodcastResolver: Send + Sync {
    fn resolve(&self, url: &str) -> Result<PodcastId, DirectoryError>;
}

/// Read surface of the podcast catalog consumed by the queue builder.
///
/// `random_sample` and `by_last_update` hand out demand-driven iterators:
/// the full podcast population may be very large, so neither may require the
/// caller to consume (or hold) more items than it actually pulls.
pub trait PodcastDirectory: PodcastResolver {
    /// Load a podcast record by identity.
    fn get(&self, id: PodcastId) -> Result<Option<Podcast>, DirectoryError>;

    /// The top `limit` entries of the curated toplist, best ranked first.
    fn toplist(&self, limit: usize) -> Result<Vec<ToplistEntry>, DirectoryError>;

    /// Members of a podcast group, in the group's internal order.
    fn group_members(&self, id: GroupId) -> Result<Vec<PodcastId>, DirectoryError>;

    /// All podcasts with at least one episode flagged for a metadata update,
    /// each exactly once. Order is unspecified but stable per snapshot.
    fn with_new_episodes(&self) -> Result<Vec<PodcastId>, DirectoryError>;

    /// Uniform random sample over the full population, in unspecified order.
    fn random_sample(&self) -> Result<Box<dyn Iterator<Item = PodcastId> + Send>, DirectoryError>;

    /// All podcasts ordered by staleness: least-recently-updated first, with
    /// never-updated podcasts ahead of everything else.
    fn by_last_update(&self)
        -> Result<Box<dyn Iterator<Item = PodcastId> + Send>, DirectoryError>;
}

#[derive(Debug, Default)]
struct DirectoryInner {
    podcasts: HashMap<PodcastId, Podcast>,
    by_url: HashMap<String, PodcastId>,
    groups: HashMap<GroupId, PodcastGroup>,
    toplist: Vec<ToplistEntry>,
}

/// In-memory podcast catalog.
///
/// Intended for tests/dev. A production backend would serve the sample and
/// staleness scans server-side; here they iterate over an id snapshot taken
/// under the read lock.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    inner: RwLock<DirectoryInner>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a podcast record, indexing it by URL.
    pub fn insert_podcast(&self, podcast: Podcast) -> Result<PodcastId, DirectoryError> {
        let mut inner = self.write()?;
        let id = podcast.id;
        inner.by_url.insert(podcast.url.clone(), id);
        inner.podcasts.insert(id, podcast);
        Ok(id)
    }

    /// Insert a podcast group.
    pub fn insert_group(&self, group: PodcastGroup) -> Result<GroupId, DirectoryError> {
        let mut inner = self.write()?;
        let id = group.id;
        inner.groups.insert(id, group);
        Ok(id)
    }

    /// Replace the curated toplist wholesale, best ranked first.
    pub fn set_toplist(&self, entries: Vec<ToplistEntry>) -> Result<(), DirectoryError> {
        self.write()?.toplist = entries;
        Ok(())
    }

    /// Flag episodes of a podcast as needing a metadata update.
    pub fn set_episodes_needing_update(
        &self,
        id: PodcastId,
        count: u64,
    ) -> Result<(), DirectoryError> {
        let mut inner = self.write()?;
        let podcast = inner
            .podcasts
            .get_mut(&id)
            .ok_or(DirectoryError::PodcastNotFound(id))?;
        podcast.episodes_needing_update = count;
        Ok(())
    }

    /// Record a completed feed refresh.
    pub fn mark_updated(&self, id: PodcastId, at: DateTime<Utc>) -> Result<(), DirectoryError> {
        let mut inner = self.write()?;
        let podcast = inner
            .podcasts
            .get_mut(&id)
            .ok_or(DirectoryError::PodcastNotFound(id))?;
        podcast.last_update = Some(at);
        podcast.episodes_needing_update = 0;
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, DirectoryInner>, DirectoryError> {
        self.inner
            .read()
            .map_err(|_| DirectoryError::Storage("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, DirectoryInner>, DirectoryError> {
        self.inner
            .write()
            .map_err(|_| DirectoryError::Storage("lock poisoned".to_string()))
    }
}

impl PodcastResolver for InMemoryDirectory {
    fn resolve(&self, url: &str) -> Result<PodcastId, DirectoryError> {
        let mut inner = self.write()?;
        if let Some(id) = inner.by_url.get(url) {
            return Ok(*id);
        }

        let podcast = Podcast::new(url);
        let id = podcast.id;
        debug!(%id, url, "creating podcast record for unknown feed url");
        inner.by_url.insert(podcast.url.clone(), id);
        inner.podcasts.insert(id, podcast);
        Ok(id)
    }
}

impl PodcastDirectory for InMemoryDirectory {
    fn get(&self, id: PodcastId) -> Result<Option<Podcast>, DirectoryError> {
        Ok(self.read()?.podcasts.get(&id).cloned())
    }

    fn toplist(&self, limit: usize) -> Result<Vec<ToplistEntry>, DirectoryError> {
        Ok(self.read()?.toplist.iter().take(limit).copied().collect())
    }

    fn group_members(&self, id: GroupId) -> Result<Vec<PodcastId>, DirectoryError> {
        let inner = self.read()?;
        let group = inner
            .groups
            .get(&id)
            .ok_or(DirectoryError::GroupNotFound(id))?;
        Ok(group.members.clone())
    }

    fn with_new_episodes(&self) -> Result<Vec<PodcastId>, DirectoryError> {
        let inner = self.read()?;
        Ok(inner
            .podcasts
            .values()
            .filter(|p| p.needs_episode_refresh())
            .map(|p| p.id)
            .collect())
    }

    fn random_sample(
        &self,
    ) -> Result<Box<dyn Iterator<Item = PodcastId> + Send>, DirectoryError> {
        let mut ids: Vec<PodcastId> = self.read()?.podcasts.keys().copied().collect();
        ids.shuffle(&mut rand::thread_rng());
        Ok(Box::new(ids.into_iter()))
    }

    fn by_last_update(
        &self,
    ) -> Result<Box<dyn Iterator<Item = PodcastId> + Send>, DirectoryError> {
        let mut podcasts: Vec<(Option<DateTime<Utc>>, PodcastId)> = self
            .read()?
            .podcasts
            .values()
            .map(|p| (p.last_update, p.id))
            .collect();
        // Option sorts None first, which is exactly "never updated is stalest".
        podcasts.sort_by_key(|(last_update, _)| *last_update);
        Ok(Box::new(podcasts.into_iter().map(|(_, id)| id)))
    }
}
