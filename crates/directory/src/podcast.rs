//! Canonical podcast record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use podbase_core::PodcastId;

/// A canonical podcast, identified by its feed URL.
///
/// Metadata fields are filled in by the (external) feed parser; the record is
/// created as soon as an unknown URL is first resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podcast {
    pub id: PodcastId,
    /// Canonical source feed URL.
    pub url: String,
    pub title: Option<String>,
    /// When the feed was last refreshed. `None` means never.
    pub last_update: Option<DateTime<Utc>>,
    /// Episodes currently flagged as needing a metadata update.
    pub episodes_needing_update: u64,
}

impl Podcast {
    /// Create a fresh, never-refreshed record for a feed URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: PodcastId::new(),
            url: url.into(),
            title: None,
            last_update: None,
            episodes_needing_update: 0,
        }
    }

    pub fn needs_episode_refresh(&self) -> bool {
        self.episodes_needing_update > 0
    }
}
