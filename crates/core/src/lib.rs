//! `podbase-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod slug;
pub mod version;

pub use error::{DomainError, DomainResult};
pub use id::{GroupId, ListId, PodcastId, UserId};
pub use slug::Slug;
pub use version::ExpectedVersion;
