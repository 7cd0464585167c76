//! Performance benchmarks for identifier normalization and response
//! classification.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench normalize_bench
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rollcall_core::{CardIdentifier, ServerResponse};
use std::hint::black_box;

/// Benchmark normalization across the UID sizes found on ISO 14443 cards.
fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for len in [4usize, 7, 10] {
        let raw: Vec<u8> = (0..len as u8).map(|b| b.wrapping_mul(37)).collect();
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &raw, |b, raw| {
            b.iter(|| black_box(CardIdentifier::normalize(black_box(raw))));
        });
    }

    group.finish();
}

/// Benchmark classification of the three 200/201 bodies the service sends.
fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(1));

    let responses = [
        ("session_started", ServerResponse::new(201, "Admin session started successfully.")),
        ("session_ended", ServerResponse::new(200, "Active session ended successfully.")),
        ("attendance", ServerResponse::new(200, "Attendance marked successfully.")),
    ];

    for (name, response) in &responses {
        group.bench_function(*name, |b| {
            b.iter(|| black_box(black_box(response).classify()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_classify);
criterion_main!(benches);
