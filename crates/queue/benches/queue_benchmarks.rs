//! Queue assembly benchmarks.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use podbase_directory::{InMemoryDirectory, Podcast, PodcastDirectory, ToplistEntry};
use podbase_queue::{QueueBuilder, QueueConfig};

fn seeded(population: usize) -> Arc<InMemoryDirectory> {
    let directory = Arc::new(InMemoryDirectory::new());
    let mut top = Vec::new();
    for i in 0..population {
        let id = directory
            .insert_podcast(Podcast::new(format!("http://feeds.example/{i}")))
            .unwrap();
        if i % 50 == 0 {
            top.push(ToplistEntry::Podcast(id));
        }
        if i % 7 == 0 {
            directory.set_episodes_needing_update(id, 1).unwrap();
        }
    }
    directory.set_toplist(top).unwrap();
    directory
}

fn bench_queue_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_assembly");

    for population in [1_000usize, 10_000] {
        let directory = seeded(population);
        let builder = QueueBuilder::new(directory.clone() as Arc<dyn PodcastDirectory>);

        group.bench_with_input(
            BenchmarkId::new("toplist_and_new", population),
            &population,
            |b, _| {
                let config = QueueConfig::default()
                    .with_toplist()
                    .with_new_episodes()
                    .with_max(100);
                b.iter(|| builder.build(&config).unwrap().count())
            },
        );

        group.bench_with_input(
            BenchmarkId::new("fallback_small_max", population),
            &population,
            |b, _| {
                let config = QueueConfig::default().with_max(25);
                b.iter(|| builder.build(&config).unwrap().count())
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_queue_assembly);
criterion_main!(benches);
