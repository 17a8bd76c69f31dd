//! Creation-path benchmarks: similarity scoring and the nearest scan that
//! runs on every first creation.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use ctxprof::{similarity, CacheTracker, ConfigurationFingerprint, CostSnapshot};

fn fingerprint(i: usize) -> ConfigurationFingerprint {
    let shared = (0..12).map(|c| format!("app.config.Config{}", (i + c) % 40));
    ConfigurationFingerprint::new(shared.chain([format!("app.config.Suite{i}")]))
        .with_profiles([if i % 2 == 0 { "test" } else { "integration" }])
        .with_loader("BootLoader")
        .with_property_overrides((0..6).map(|p| format!("feature.{p}={}", i % 3)))
}

fn populated(n: usize) -> CacheTracker {
    let tracker = CacheTracker::new();
    for i in 0..n {
        let fp = fingerprint(i);
        tracker.register_consumer(&fp, &format!("app.Suite{i}Test"));
        tracker.record_creation(&fp, 1000, CostSnapshot::default());
    }
    tracker
}

fn similarity_benchmarks(c: &mut Criterion) {
    let a = fingerprint(0);
    let b = fingerprint(3);

    c.bench_function("similarity_score", |bench| {
        bench.iter(|| similarity::score(black_box(&a), black_box(&b)));
    });
}

fn creation_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_creation_with_nearest_scan");
    for size in [10, 100, 500] {
        let newcomer = fingerprint(size + 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bench, &size| {
            bench.iter_batched(
                || {
                    let tracker = populated(size);
                    tracker.register_consumer(&newcomer, "app.NewcomerTest");
                    tracker
                },
                |tracker| {
                    tracker.record_creation(black_box(&newcomer), 1000, CostSnapshot::default());
                    tracker
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, similarity_benchmarks, creation_benchmarks);
criterion_main!(benches);
