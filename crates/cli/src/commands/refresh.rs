//! `podbase refresh` — batch trigger for the refresh queue.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use serde::Deserialize;
use tracing::info;

use podbase_directory::{
    InMemoryDirectory, Podcast, PodcastDirectory, PodcastGroup, ToplistEntry,
};
use podbase_queue::{FeedRefresher, QueueBuilder, QueueConfig, RefreshDriver, RefreshError};

#[derive(Debug, Args)]
pub struct RefreshArgs {
    /// Update all entries from the toplist
    #[arg(long)]
    toplist: bool,

    /// Update all podcasts with new episodes
    #[arg(long)]
    new: bool,

    /// Update random podcasts, best used with --max
    #[arg(long)]
    random: bool,

    /// Don't update anything, just list the queued podcasts
    #[arg(long)]
    list_only: bool,

    /// How many feeds should be updated at maximum (0 = unbounded)
    #[arg(long, default_value_t = 0)]
    max: usize,

    /// Seed the in-memory catalog from a JSON file
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,

    /// Explicit feed URLs to enqueue (created if unknown)
    urls: Vec<String>,
}

/// Catalog seed for the in-memory backend.
#[derive(Debug, Default, Deserialize)]
struct SeedFile {
    #[serde(default)]
    podcasts: Vec<Podcast>,
    #[serde(default)]
    groups: Vec<PodcastGroup>,
    #[serde(default)]
    toplist: Vec<ToplistEntry>,
}

/// Hands candidates off by logging them; the network fetch/parse pipeline
/// lives outside this tool.
struct LogOnlyRefresher;

impl FeedRefresher for LogOnlyRefresher {
    fn refresh(&self, podcast: &Podcast) -> Result<(), RefreshError> {
        info!(podcast_id = %podcast.id, url = %podcast.url, "dispatching feed refresh");
        Ok(())
    }
}

pub fn execute(args: RefreshArgs) -> anyhow::Result<()> {
    let directory = Arc::new(load_directory(args.seed.as_deref())?);

    let config = QueueConfig {
        toplist: args.toplist,
        new_episodes: args.new,
        random: args.random,
        explicit_refs: args.urls.clone(),
        max: args.max,
    };

    let builder = QueueBuilder::new(directory.clone() as Arc<dyn PodcastDirectory>);
    let queue = builder
        .build(&config)
        .context("failed to assemble refresh queue")?;

    if args.list_only {
        for candidate in queue {
            if let Some(podcast) = directory.get(candidate.podcast)? {
                println!("{}", podcast.url);
            }
        }
        return Ok(());
    }

    info!("updating podcasts");
    let driver = RefreshDriver::new(
        directory as Arc<dyn PodcastDirectory>,
        Arc::new(LogOnlyRefresher),
    );
    let report = driver.run(queue)?;

    println!(
        "queued {} / refreshed {} / failed {} / missing {}",
        report.queued, report.refreshed, report.failed, report.missing
    );
    Ok(())
}

fn load_directory(seed: Option<&Path>) -> anyhow::Result<InMemoryDirectory> {
    let directory = InMemoryDirectory::new();

    if let Some(path) = seed {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        let seed: SeedFile = serde_json::from_str(&raw)
            .with_context(|| format!("invalid seed file {}", path.display()))?;

        for podcast in seed.podcasts {
            directory.insert_podcast(podcast)?;
        }
        for group in seed.groups {
            directory.insert_group(group)?;
        }
        directory.set_toplist(seed.toplist)?;
    }

    Ok(directory)
}
