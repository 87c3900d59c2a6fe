//! # State-Vector Engine Benchmarks
//!
//! Measures gate application, controlled gates and measurement over growing
//! state vectors. Every operation is one O(2^n) pass.
//!
//! Run: `cargo bench --bench gate_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qam_state::{Gate, GateOp, QuantumProcessor};

/// Benchmark single-qubit gates by state size
fn bench_single_qubit(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_qubit");

    for n in [4usize, 8, 12, 16] {
        let mut qp = QuantumProcessor::seeded(0);
        let Ok(r) = qp.allocate(n) else { continue };
        let h = GateOp::new(Gate::h(), r[n / 2]);

        group.bench_with_input(BenchmarkId::new("hadamard", n), &n, |b, _| {
            b.iter(|| {
                let _ = qp.apply(black_box(&h));
            })
        });
    }

    group.finish();
}

/// Benchmark multi-controlled X (storage step 4 shape)
fn bench_controlled(c: &mut Criterion) {
    let mut group = c.benchmark_group("controlled");

    for controls in [1usize, 2, 4, 8] {
        let mut qp = QuantumProcessor::seeded(0);
        let Ok(r) = qp.allocate(controls + 1) else { continue };
        let op = GateOp::new(Gate::x(), r[controls]).controlled_by(r.iter().take(controls));

        group.bench_with_input(BenchmarkId::new("mcx", controls), &controls, |b, _| {
            b.iter(|| {
                let _ = qp.apply(black_box(&op));
            })
        });
    }

    let mut qp = QuantumProcessor::seeded(0);
    if let Ok(r) = qp.allocate(8) {
        let op = GateOp::new(Gate::cu_squared(3), r[0]).controlled_by([r[7]]);
        group.bench_function("cu_squared", |b| {
            b.iter(|| {
                let _ = qp.apply(black_box(&op));
            })
        });
    }

    group.finish();
}

/// Benchmark measurement with implicit reset
fn bench_measure(c: &mut Criterion) {
    let mut group = c.benchmark_group("measure");

    for n in [4usize, 8, 12] {
        let mut qp = QuantumProcessor::seeded(1);
        let Ok(r) = qp.allocate(n) else { continue };
        let h = GateOp::new(Gate::h(), r[0]);

        group.bench_with_input(BenchmarkId::new("h_then_measure", n), &n, |b, _| {
            b.iter(|| {
                let _ = qp.apply(&h);
                black_box(qp.measure(r[0]).ok())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_qubit, bench_controlled, bench_measure);
criterion_main!(benches);
