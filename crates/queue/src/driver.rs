//! Batch refresh driver: drains the queue into an external feed refresher.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use podbase_directory::{DirectoryError, Podcast, PodcastDirectory};

use crate::builder::Candidate;

/// External feed refresh routine (network fetch + parse live elsewhere).
pub trait FeedRefresher: Send + Sync {
    fn refresh(&self, podcast: &Podcast) -> Result<(), RefreshError>;
}

/// Failure of a single feed refresh.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshError {
    #[error("feed refresh failed: {0}")]
    Failed(String),
}

/// Outcome counters for one driver run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct RefreshReport {
    pub queued: u64,
    pub refreshed: u64,
    pub failed: u64,
    pub missing: u64,
}

/// Drains a candidate queue sequentially.
///
/// One candidate is pulled, handed off, and only then is the next pulled;
/// per-item refresh failures are logged and counted, never fatal to the run.
pub struct RefreshDriver {
    directory: Arc<dyn PodcastDirectory>,
    refresher: Arc<dyn FeedRefresher>,
}

impl RefreshDriver {
    pub fn new(directory: Arc<dyn PodcastDirectory>, refresher: Arc<dyn FeedRefresher>) -> Self {
        Self {
            directory,
            refresher,
        }
    }

    pub fn run(
        &self,
        queue: impl Iterator<Item = Candidate>,
    ) -> Result<RefreshReport, DirectoryError> {
        let mut report = RefreshReport::default();

        for candidate in queue {
            report.queued += 1;

            let Some(podcast) = self.directory.get(candidate.podcast)? else {
                warn!(podcast_id = %candidate.podcast, "queued podcast vanished, skipping");
                report.missing += 1;
                continue;
            };

            match self.refresher.refresh(&podcast) {
                Ok(()) => report.refreshed += 1,
                Err(e) => {
                    warn!(podcast_id = %podcast.id, url = %podcast.url, error = %e, "refresh failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            queued = report.queued,
            refreshed = report.refreshed,
            failed = report.failed,
            missing = report.missing,
            "refresh run finished"
        );
        Ok(report)
    }
}
