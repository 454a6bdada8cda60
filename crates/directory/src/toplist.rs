//! Curated toplist and podcast groups.

use serde::{Deserialize, Serialize};

use podbase_core::{GroupId, PodcastId};

/// An aggregate of podcast records treated as variants of one show.
///
/// Member order is the group's internal order and is preserved when the
/// group is expanded into queue candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodcastGroup {
    pub id: GroupId,
    pub title: String,
    pub members: Vec<PodcastId>,
}

impl PodcastGroup {
    pub fn new(title: impl Into<String>, members: Vec<PodcastId>) -> Self {
        Self {
            id: GroupId::new(),
            title: title.into(),
            members,
        }
    }
}

/// One ranked entry of the curated toplist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToplistEntry {
    Podcast(PodcastId),
    Group(GroupId),
}
