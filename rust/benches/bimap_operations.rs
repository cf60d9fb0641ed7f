use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use treebimap::Bimap;

const SEED: u64 = 42;

/// Pairs with independently shuffled left and right values.
fn generate_test_data(size: usize) -> Vec<(u64, u64)> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..size)
        .map(|_| (rng.gen_range(0..size as u64 * 4), rng.gen_range(0..size as u64 * 4)))
        .collect()
}

fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion");
    group.sample_size(30);

    for size in [1_000, 10_000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("bimap", size), size, |b, _| {
            b.iter(|| {
                let mut bimap = Bimap::new();
                for &(l, r) in &data {
                    black_box(bimap.insert(l, r));
                }
                black_box(bimap)
            })
        });

        // Two std maps kept in sync, the usual hand-rolled alternative
        group.bench_with_input(BenchmarkId::new("btreemap_pair", size), size, |b, _| {
            b.iter(|| {
                let mut by_left = BTreeMap::new();
                let mut by_right = BTreeMap::new();
                for &(l, r) in &data {
                    if !by_left.contains_key(&l) && !by_right.contains_key(&r) {
                        by_left.insert(l, r);
                        by_right.insert(r, l);
                    }
                }
                black_box((by_left, by_right))
            })
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [1_000, 10_000].iter() {
        let data = generate_test_data(*size);
        let bimap: Bimap<u64, u64> = data.iter().copied().collect();

        group.bench_with_input(BenchmarkId::new("get_by_left", size), size, |b, _| {
            b.iter(|| {
                for (l, _) in &data {
                    black_box(bimap.get_by_left(l));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("get_by_right", size), size, |b, _| {
            b.iter(|| {
                for (_, r) in &data {
                    black_box(bimap.get_by_right(r));
                }
            })
        });
    }
    group.finish();
}

fn bench_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("iteration");
    let data = generate_test_data(10_000);
    let bimap: Bimap<u64, u64> = data.iter().copied().collect();

    group.bench_function("iter_left", |b| {
        b.iter(|| black_box(bimap.iter_left().map(|(l, _)| *l).sum::<u64>()))
    });
    group.bench_function("iter_right", |b| {
        b.iter(|| black_box(bimap.iter_right().map(|(_, r)| *r).sum::<u64>()))
    });
    group.bench_function("range_left", |b| {
        b.iter(|| black_box(bimap.range_left(5_000..15_000).count()))
    });
    group.finish();
}

fn bench_erase_and_clone(c: &mut Criterion) {
    let mut group = c.benchmark_group("erase_and_clone");
    group.sample_size(30);
    let data = generate_test_data(10_000);
    let bimap: Bimap<u64, u64> = data.iter().copied().collect();

    group.bench_function("clone", |b| b.iter(|| black_box(bimap.clone())));

    group.bench_function("erase_all_by_right", |b| {
        b.iter(|| {
            let mut copy = bimap.clone();
            for (_, r) in &data {
                copy.erase_right_key(r);
            }
            black_box(copy)
        })
    });

    // Correlated orders produce a path; this tracks the worst case
    let correlated: Bimap<u64, u64> = (0..2_000).map(|i| (i, i)).collect();
    group.bench_function("lookup_correlated_2k", |b| {
        b.iter(|| black_box(correlated.get_by_left(&1_999)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insertion,
    bench_lookup,
    bench_iteration,
    bench_erase_and_clone
);
criterion_main!(benches);
