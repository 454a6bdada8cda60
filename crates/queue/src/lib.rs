//! `podbase-queue` — refresh queue assembly and the batch driver.
//!
//! The queue builder merges enabled candidate sources into one lazy,
//! priority-ordered sequence; the driver drains it one candidate at a time
//! into an external feed refresher.

pub mod builder;
pub mod driver;

pub use builder::{Candidate, QueueBuilder, QueueConfig, RANDOM_SAMPLE_CAP, TOPLIST_WINDOW};
pub use driver::{FeedRefresher, RefreshDriver, RefreshError, RefreshReport};
