// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// RingBuffer throughput benchmarks.
//
// Run with:
//   cargo bench --bench ring
//
// Groups:
//   ring_push_pop  — alternating push/pop at steady-state occupancy
//   ring_drain     — fill to capacity, then drain completely
//   ring_overflow  — push past capacity, measuring the drop-newest path

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tickbus::RingBuffer;

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_push_pop");
    group.throughput(Throughput::Elements(1));

    group.bench_function("u8_cap_1024", |b| {
        let mut ring: RingBuffer<u8, 1024> = RingBuffer::new();
        let mut v = 0u8;
        b.iter(|| {
            ring.push(black_box(v)).unwrap();
            black_box(ring.pop());
            v = v.wrapping_add(1);
        });
    });

    group.bench_function("can_message_cap_33", |b| {
        let mut ring: RingBuffer<[u8; 8], 33> = RingBuffer::new();
        let frame = [0xABu8; 8];
        b.iter(|| {
            ring.push(black_box(frame)).unwrap();
            black_box(ring.pop());
        });
    });

    group.finish();
}

// `N` is a const generic, so the two capacities can't share a loop body
// over a runtime variable; each gets its own monomorphized closure.
fn bench_drain_capacity<const N: usize>(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
) {
    let cap = N - 1;
    group.throughput(Throughput::Elements(cap as u64));
    group.bench_with_input(BenchmarkId::from_parameter(cap), &cap, |b, _| {
        b.iter_batched(
            || {
                let mut ring: RingBuffer<u8, N> = RingBuffer::new();
                for i in 0..ring.capacity() {
                    ring.push(i as u8).ok();
                }
                ring
            },
            |mut ring| {
                while let Some(v) = ring.pop() {
                    black_box(v);
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_drain");
    bench_drain_capacity::<64>(&mut group);
    bench_drain_capacity::<1024>(&mut group);
    group.finish();
}

fn bench_overflow(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_overflow");
    group.throughput(Throughput::Elements(1));

    group.bench_function("push_full_drop_newest", |b| {
        let mut ring: RingBuffer<u8, 8> = RingBuffer::new();
        for i in 0..ring.capacity() {
            ring.push(i as u8).unwrap();
        }
        b.iter(|| {
            black_box(ring.push(0xFF).err());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_push_pop, bench_drain, bench_overflow);
criterion_main!(benches);
