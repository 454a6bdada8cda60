//! Logging/tracing initialization for podbase binaries.

mod tracing_init;

pub use tracing_init::init;
