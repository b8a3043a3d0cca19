//! Benchmarks for rank and select queries across bit-vector sizes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jacobson::{BitVector, RankSupport, SelectSupport, SparseArray};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SIZES: &[usize] = &[1 << 10, 1 << 14, 1 << 18];

fn random_bit_vector(rng: &mut ChaCha8Rng, bits: usize) -> BitVector {
    let mut bv = BitVector::new(bits);
    for i in 0..bits {
        if rng.gen() {
            bv.set(i, true).unwrap();
        }
    }
    bv
}

fn bench_rank1(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank1");
    let mut rng = ChaCha8Rng::seed_from_u64(0xB17_5EED);

    for &size in SIZES {
        let bv = random_bit_vector(&mut rng, size);
        let rank = RankSupport::new(&bv);
        let queries: Vec<usize> = (0..1024).map(|_| rng.gen_range(0..size)).collect();

        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &queries, |b, queries| {
            b.iter(|| {
                let mut acc = 0usize;
                for &i in queries {
                    acc += rank.rank1(black_box(i)).unwrap();
                }
                black_box(acc)
            });
        });
    }
    group.finish();
}

fn bench_select1(c: &mut Criterion) {
    let mut group = c.benchmark_group("select1");
    let mut rng = ChaCha8Rng::seed_from_u64(0x5E1EC7);

    for &size in SIZES {
        let bv = random_bit_vector(&mut rng, size);
        let rank = RankSupport::new(&bv);
        let select = SelectSupport::new(&rank);
        let ones = rank.total_ones();
        let queries: Vec<usize> = (0..1024).map(|_| rng.gen_range(1..=ones)).collect();

        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &queries, |b, queries| {
            b.iter(|| {
                let mut acc = 0usize;
                for &i in queries {
                    acc += select.select1(black_box(i)).unwrap();
                }
                black_box(acc)
            });
        });
    }
    group.finish();
}

fn bench_rank_directory_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_directory_build");
    let mut rng = ChaCha8Rng::seed_from_u64(0xB01D);

    for &size in SIZES {
        let bv = random_bit_vector(&mut rng, size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &bv, |b, bv| {
            b.iter(|| black_box(RankSupport::new(bv).total_ones()));
        });
    }
    group.finish();
}

fn bench_sparse_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse_append");
    let size = 1 << 14;
    // every 16th position occupied
    let positions: Vec<usize> = (0..size).step_by(16).collect();

    group.throughput(Throughput::Elements(positions.len() as u64));
    group.bench_function(BenchmarkId::from_parameter(size), |b| {
        b.iter(|| {
            let mut array = SparseArray::new();
            array.create(size);
            for &pos in &positions {
                array.append(pos as u64, pos).unwrap();
            }
            black_box(array.num_elem())
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_rank1,
    bench_select1,
    bench_rank_directory_build,
    bench_sparse_append
);
criterion_main!(benches);
