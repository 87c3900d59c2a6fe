//! # Associative Memory Benchmarks
//!
//! Measures full storage runs, non-destructive match probabilities and extraction
//! distributions for a few pattern widths.
//!
//! Run: `cargo bench --bench memory_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qam_memory::{find_angle, AssociativeMemory, MemoryConfig};

fn config(width: usize) -> MemoryConfig {
    MemoryConfig {
        pattern_width: width,
        ..MemoryConfig::default()
    }
}

/// Benchmark storage of 2^(width-1) patterns
fn bench_storage(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage");

    for width in [2usize, 3, 4, 5] {
        let patterns: Vec<u64> = (0..1u64 << (width - 1)).map(|k| 2 * k + 1).collect();

        group.bench_with_input(BenchmarkId::new("store", width), &patterns, |b, patterns| {
            b.iter(|| {
                let Ok(mut mem) = AssociativeMemory::new(config(width)) else { return };
                black_box(mem.store(patterns).ok());
            })
        });
    }

    group.finish();
}

/// Benchmark match probabilities and extraction on a loaded memory
fn bench_retrieval(c: &mut Criterion) {
    let mut group = c.benchmark_group("retrieval");

    for width in [3usize, 4, 5] {
        let Ok(mut mem) = AssociativeMemory::new(config(width)) else { continue };
        if mem.store(&[1, 2, 4]).is_err() {
            continue;
        }

        group.bench_with_input(BenchmarkId::new("match_probability", width), &width, |b, _| {
            b.iter(|| black_box(mem.match_probability(black_box(4)).ok()))
        });
        group.bench_with_input(BenchmarkId::new("extraction_distribution", width), &width, |b, _| {
            b.iter(|| black_box(mem.extraction_distribution().ok()))
        });
    }

    group.finish();
}

fn bench_angle(c: &mut Criterion) {
    c.bench_function("find_angle", |b| b.iter(|| find_angle(black_box(17.0))));
}

criterion_group!(benches, bench_storage, bench_retrieval, bench_angle);
criterion_main!(benches);
