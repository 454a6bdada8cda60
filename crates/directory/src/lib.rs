//! `podbase-directory` — the podcast catalog.
//!
//! Holds canonical podcast records, podcast groups and the curated toplist,
//! and exposes the capabilities the list store and the refresh queue consume:
//! URL resolution (create-if-unknown) and the demand-driven candidate
//! sources.

pub mod directory;
pub mod podcast;
pub mod toplist;

pub use directory::{DirectoryError, InMemoryDirectory, PodcastDirectory, PodcastResolver};
pub use podcast::Podcast;
pub use toplist::{PodcastGroup, ToplistEntry};
