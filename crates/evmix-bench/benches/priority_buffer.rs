//! Benchmarks for the priority buffer

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use evmix_bench::random_keys;
use evmix_core::PriorityBuffer;

fn bench_insert_then_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_insert_drain");
    for size in [64usize, 1_024, 8_192] {
        let keys = random_keys(size, 100.0, 7);
        group.bench_with_input(BenchmarkId::from_parameter(size), &keys, |b, keys| {
            b.iter(|| {
                let mut buffer = PriorityBuffer::with_capacity(keys.len());
                for (i, key) in keys.iter().enumerate() {
                    buffer.insert(*key, i);
                }
                while let Ok(entry) = buffer.pop() {
                    black_box(entry);
                }
            })
        });
    }
    group.finish();
}

fn bench_steady_state(c: &mut Criterion) {
    // Buffer held at a fixed depth, as during a long mixing session.
    let keys = random_keys(4_096, 1.0, 11);
    let mut buffer = PriorityBuffer::new();
    for (i, key) in keys.iter().take(256).enumerate() {
        buffer.insert(*key, i);
    }

    c.bench_function("buffer_steady_state_256", |b| {
        let mut i = 0usize;
        b.iter(|| {
            if let Ok(entry) = buffer.pop() {
                buffer.insert(entry.key + keys[i % keys.len()], entry.value);
            }
            i += 1;
        })
    });
}

fn bench_rebase(c: &mut Criterion) {
    let keys = random_keys(1_024, 100.0, 3);
    let mut buffer = PriorityBuffer::new();
    for (i, key) in keys.iter().enumerate() {
        buffer.insert(*key, i);
    }

    c.bench_function("buffer_shift_all_keys_1024", |b| {
        b.iter(|| {
            buffer.shift_all_keys(black_box(0.25));
            buffer.shift_all_keys(black_box(-0.25));
        })
    });
}

criterion_group!(benches, bench_insert_then_drain, bench_steady_state, bench_rebase);
criterion_main!(benches);
