//! Batch edits through a transient session versus the same edits made one
//! persistent operation at a time.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rrb_vector::persistent::{PersistentVector, TransientVector};
use std::hint::black_box;

// =============================================================================
// Transient batches
// =============================================================================

fn benchmark_batch_push_back(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("batch_push_back");

    for size in [1_000, 10_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::new("transient", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut transient = TransientVector::new();
                    for index in 0..size {
                        let _ = transient.push_back(black_box(index));
                    }
                    black_box(transient.persistent())
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("persistent", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut vector = PersistentVector::new();
                    for index in 0..size {
                        vector = vector.push_back(black_box(index));
                    }
                    black_box(vector)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("std_vec", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut vector = Vec::new();
                for index in 0..size {
                    vector.push(black_box(index));
                }
                black_box(vector)
            });
        });
    }

    group.finish();
}

fn benchmark_batch_assoc(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("batch_assoc");

    for size in [1_000, 10_000, 100_000] {
        let vector: PersistentVector<usize> = (0..size).collect();

        group.bench_with_input(
            BenchmarkId::new("transient", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut transient = vector.transient();
                    for index in 0..size {
                        let _ = transient.assoc(black_box(index), index * 2);
                    }
                    black_box(transient.persistent())
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("persistent", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut current = vector.clone();
                    for index in 0..size {
                        if let Some(updated) = current.update(black_box(index), index * 2) {
                            current = updated;
                        }
                    }
                    black_box(current)
                });
            },
        );
    }

    group.finish();
}

fn benchmark_batch_pop_back(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("batch_pop_back");

    for size in [1_000, 10_000] {
        let vector: PersistentVector<usize> = (0..size).collect();

        group.bench_with_input(
            BenchmarkId::new("transient", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let mut transient = vector.transient();
                    while let Ok(value) = transient.pop_back() {
                        black_box(value);
                    }
                    black_box(transient.persistent())
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("persistent", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let mut current = vector.clone();
                    while let Some((rest, value)) = current.pop_back() {
                        black_box(value);
                        current = rest;
                    }
                    black_box(current)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_batch_push_back,
    benchmark_batch_assoc,
    benchmark_batch_pop_back
);
criterion_main!(benches);
