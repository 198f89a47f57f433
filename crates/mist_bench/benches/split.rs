//! Split benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mist_bench::record_stream;
use mist_codec::RecordReader;
use mist_core::{split_records, MemorySource, PlanSink, SplitConfig, SplitPolicy, Splitter};
use mist_testkit::{build_source, GeneratedPost, SplitFixture};

/// Benchmark the state machine alone over an in-memory source.
fn bench_plan_in_memory(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_in_memory");

    for count in [1_000, 10_000].iter() {
        let stream = record_stream(*count, 1);
        let mut source = MemorySource::new();
        for i in (1..*count).step_by(2) {
            source.insert(format!("data/p{i}/0.bin"), vec![0u8; 128]);
        }
        let policy = SplitPolicy::from_limits(500, 16 * 1024);

        group.bench_with_input(BenchmarkId::from_parameter(count), &stream, |b, stream| {
            b.iter(|| {
                let report = split_records(
                    RecordReader::new(black_box(stream.as_bytes())),
                    &mut source,
                    &mut PlanSink,
                    &policy,
                )
                .unwrap();
                black_box(report);
            });
        });
    }

    group.finish();
}

/// Benchmark a full split writing zip segments.
fn bench_split_to_disk(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_to_disk");
    group.sample_size(10);

    let posts: Vec<GeneratedPost> = (0..500)
        .map(|i| GeneratedPost {
            message: format!("post {i}"),
            attachment_sizes: vec![4096],
            direct: i % 5 == 0,
        })
        .collect();
    let fixture = SplitFixture::new(build_source(&posts));

    group.bench_function("500_posts", |b| {
        b.iter(|| {
            let config = SplitConfig::new()
                .archive(fixture.source())
                .prefix(fixture.prefix())
                .max_lines(100)
                .max_bytes(256 * 1024);
            let report = Splitter::new(config).run().unwrap();
            black_box(report);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_plan_in_memory, bench_split_to_disk);
criterion_main!(benches);
