//! Queue builder: merges candidate sources into one lazy ordered sequence.

use std::sync::Arc;

use tracing::debug;

use podbase_core::PodcastId;
use podbase_directory::{DirectoryError, PodcastDirectory, ToplistEntry};

/// How far down the curated toplist the toplist source reaches.
pub const TOPLIST_WINDOW: usize = 100;

/// Streaming cap on the random source when no overall `max` is set.
pub const RANDOM_SAMPLE_CAP: usize = 1000;

/// Which sources feed the queue, and how large it may grow.
///
/// Source priority is fixed: toplist, then new-episode podcasts, then the
/// random sample, then explicit references. When none of those is supplied
/// the queue falls back to a full staleness-ordered scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueConfig {
    /// Include the top entries of the curated toplist, groups expanded.
    pub toplist: bool,
    /// Include podcasts with at least one episode flagged for update.
    pub new_episodes: bool,
    /// Include a uniform random sample of the whole population.
    pub random: bool,
    /// Feed URLs to resolve (creating unknown podcasts) and enqueue.
    pub explicit_refs: Vec<String>,
    /// Truncate the merged queue after this many items. 0 = unbounded.
    pub max: usize,
}

impl QueueConfig {
    pub fn with_toplist(mut self) -> Self {
        self.toplist = true;
        self
    }

    pub fn with_new_episodes(mut self) -> Self {
        self.new_episodes = true;
        self
    }

    pub fn with_random(mut self) -> Self {
        self.random = true;
        self
    }

    pub fn with_explicit_refs(mut self, refs: Vec<String>) -> Self {
        self.explicit_refs = refs;
        self
    }

    pub fn with_max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    /// True when no source was supplied and the staleness fallback applies.
    pub fn falls_back(&self) -> bool {
        !self.toplist && !self.new_episodes && !self.random && self.explicit_refs.is_empty()
    }
}

/// A transient reference to a podcast due for refresh.
///
/// Carries nothing beyond identity; its position is its index in the merged
/// sequence. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub podcast: PodcastId,
}

/// Assembles the refresh queue from a podcast directory.
///
/// The returned sequence is pull-based: the population-scale sources
/// (random sample, staleness scan) are consumed on demand, so a small `max`
/// never forces a full materialization. Candidates are deliberately **not**
/// deduplicated across sources; a podcast present in two enabled sources is
/// yielded twice.
pub struct QueueBuilder {
    directory: Arc<dyn PodcastDirectory>,
}

impl QueueBuilder {
    pub fn new(directory: Arc<dyn PodcastDirectory>) -> Self {
        Self { directory }
    }

    /// Build the merged candidate sequence for `config`.
    ///
    /// Bounded inputs (toplist window, group expansion, explicit refs) are
    /// resolved at build time; resolution failure aborts the build.
    pub fn build(
        &self,
        config: &QueueConfig,
    ) -> Result<Box<dyn Iterator<Item = Candidate> + Send>, DirectoryError> {
        let mut queue: Box<dyn Iterator<Item = PodcastId> + Send> = Box::new(std::iter::empty());

        if config.toplist {
            let expanded = self.expanded_toplist()?;
            debug!(entries = expanded.len(), "queueing toplist source");
            queue = Box::new(queue.chain(expanded));
        }

        if config.new_episodes {
            let flagged = self.directory.with_new_episodes()?;
            debug!(podcasts = flagged.len(), "queueing new-episode source");
            queue = Box::new(queue.chain(flagged));
        }

        if config.random {
            let sample = self.directory.random_sample()?;
            // Without an overall max the sample would stream the whole
            // population; cap it.
            let sample: Box<dyn Iterator<Item = PodcastId> + Send> = if config.max == 0 {
                Box::new(sample.take(RANDOM_SAMPLE_CAP))
            } else {
                sample
            };
            queue = Box::new(queue.chain(sample));
        }

        if !config.explicit_refs.is_empty() {
            let resolved: Vec<PodcastId> = config
                .explicit_refs
                .iter()
                .map(|url| self.directory.resolve(url))
                .collect::<Result<_, _>>()?;
            debug!(refs = resolved.len(), "queueing explicit references");
            queue = Box::new(queue.chain(resolved));
        }

        if config.falls_back() {
            debug!("no sources supplied, falling back to staleness scan");
            queue = self.directory.by_last_update()?;
        }

        if config.max > 0 {
            queue = Box::new(queue.take(config.max));
        }

        Ok(Box::new(queue.map(|podcast| Candidate { podcast })))
    }

    fn expanded_toplist(&self) -> Result<Vec<PodcastId>, DirectoryError> {
        let mut expanded = Vec::new();
        for entry in self.directory.toplist(TOPLIST_WINDOW)? {
            match entry {
                ToplistEntry::Podcast(id) => expanded.push(id),
                ToplistEntry::Group(group_id) => {
                    expanded.extend(self.directory.group_members(group_id)?);
                }
            }
        }
        Ok(expanded)
    }
}
