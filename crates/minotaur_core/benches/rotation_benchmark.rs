//! Benchmark for rotation and snapshot throughput.
//!
//! The interesting number is uncontended gate overhead: a rotation is a
//! handful of slice copies, so admission cost dominates small cubes.
//!
//! Run with: cargo bench --package minotaur_core --bench rotation_benchmark

use std::sync::Arc;
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use minotaur_core::{Cube, Face};

fn bench_single_thread_rotations(c: &mut Criterion) {
    let mut group = c.benchmark_group("rotate_single_thread");
    for size in [3usize, 8] {
        group.throughput(Throughput::Elements(1));
        group.bench_function(format!("size_{size}"), |b| {
            let cube = Cube::new(size);
            let mut layer = 0;
            b.iter(|| {
                cube.rotate(black_box(Face::Front), black_box(layer)).unwrap();
                layer = (layer + 1) % size;
            });
        });
    }
    group.finish();
}

fn bench_parallel_disjoint_layers(c: &mut Criterion) {
    const THREADS: usize = 4;
    const ROTATIONS_PER_THREAD: usize = 64;

    let mut group = c.benchmark_group("rotate_parallel_disjoint");
    group.throughput(Throughput::Elements((THREADS * ROTATIONS_PER_THREAD) as u64));
    group.bench_function("4_threads_size_8", |b| {
        b.iter(|| {
            let cube = Cube::new(8);
            let workers: Vec<_> = (0..THREADS)
                .map(|id| {
                    let cube = Arc::clone(&cube);
                    thread::spawn(move || {
                        // each worker owns two private depths of one axis
                        for i in 0..ROTATIONS_PER_THREAD {
                            let layer = id * 2 + i % 2;
                            cube.rotate(Face::Left, layer).unwrap();
                        }
                    })
                })
                .collect();
            for worker in workers {
                worker.join().unwrap();
            }
        });
    });
    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    for size in [3usize, 16] {
        group.throughput(Throughput::Elements((6 * size * size) as u64));
        group.bench_function(format!("size_{size}"), |b| {
            let cube = Cube::new(size);
            cube.rotate(Face::Up, 0).unwrap();
            b.iter(|| black_box(cube.snapshot().unwrap()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_single_thread_rotations,
    bench_parallel_disjoint_layers,
    bench_snapshot
);
criterion_main!(benches);
