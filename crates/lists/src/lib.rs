//! `podbase-lists` — named, shareable, ordered podcast lists.
//!
//! The list store owns the create/read/replace/delete lifecycle of list
//! documents. Every mutation of an existing document runs through the
//! conflict-retry executor, so concurrent writers are resolved by
//! reload-and-retry instead of locks.

pub mod list;
pub mod store;

pub use list::PodcastList;
pub use store::{ListStore, PodcastRef};
