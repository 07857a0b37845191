use bimap_collections::{ArrayMultimap, MapMultiset, MultisetMultimap};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:04x}", n % 4096)
}

fn bench_multiset(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiset");
    group.throughput(Throughput::Elements(100_000));
    group.bench_function("add_100k_over_4k_distinct", |b| {
        b.iter_batched(
            MapMultiset::<String>::new,
            |mut m| {
                for x in lcg(1).take(100_000) {
                    m.add(key(x));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("add_then_remove_100k", |b| {
        b.iter_batched(
            || {
                let m: MapMultiset<String> = lcg(2).take(100_000).map(key).collect();
                let victims: Vec<String> = lcg(2).take(100_000).map(key).collect();
                (m, victims)
            },
            |(mut m, victims)| {
                for k in &victims {
                    m.remove(k.as_str());
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_multimaps(c: &mut Criterion) {
    let mut group = c.benchmark_group("multimap");
    group.throughput(Throughput::Elements(100_000));
    group.bench_function("array_put_100k", |b| {
        b.iter_batched(
            ArrayMultimap::<String, u64>::new,
            |mut m| {
                for x in lcg(3).take(100_000) {
                    m.put(key(x), x & 0xff);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("multiset_put_100k", |b| {
        b.iter_batched(
            MultisetMultimap::<String, u64>::new,
            |mut m| {
                for x in lcg(3).take(100_000) {
                    m.put(key(x), x & 0xff);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_multiset, bench_multimaps
}
criterion_main!(benches);
