//! Record decoding benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mist_bench::record_stream;
use mist_codec::{Record, RecordReader};
use mist_testkit::post_record;

/// Benchmark decoding a single post line.
fn bench_decode_line(c: &mut Criterion) {
    let line = post_record("hello world", &["a/1.png", "a/2.png", "a/3.png"]);

    c.bench_function("decode_post_line", |b| {
        b.iter(|| {
            let record = Record::decode(black_box(line.as_bytes())).unwrap();
            black_box(record);
        });
    });
}

/// Benchmark streaming whole record streams.
fn bench_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_reader");

    for count in [100, 1_000, 10_000].iter() {
        let stream = record_stream(*count, 2);
        group.throughput(Throughput::Bytes(stream.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &stream, |b, stream| {
            b.iter(|| {
                let lines = RecordReader::new(black_box(stream.as_bytes())).count();
                black_box(lines);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode_line, bench_reader);
criterion_main!(benches);
