//! Podcast list document.

use serde::{Deserialize, Serialize};

use podbase_core::{ListId, PodcastId, Slug, UserId};

/// A named, ordered list of podcasts owned by one user.
///
/// `podcasts` is the user's curation order; duplicates are allowed. The
/// version token lives in the store envelope, never in the document, so the
/// document itself stays a plain value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodcastList {
    pub id: ListId,
    pub owner: UserId,
    pub slug: Slug,
    pub title: String,
    pub podcasts: Vec<PodcastId>,
}

impl PodcastList {
    pub fn new(
        owner: UserId,
        title: impl Into<String>,
        slug: Slug,
        podcasts: Vec<PodcastId>,
    ) -> Self {
        Self {
            id: ListId::new(),
            owner,
            slug,
            title: title.into(),
            podcasts,
        }
    }
}
