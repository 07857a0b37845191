use bimap_collections::HashBiMap;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize) -> (HashBiMap<String, u64>, Vec<String>) {
    let m = HashBiMap::new();
    let keys: Vec<_> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        m.force_set(k.clone(), i as u64);
    }
    (m, keys)
}

fn bench_set(c: &mut Criterion) {
    c.bench_function("hash_bimap_set_10k", |b| {
        b.iter_batched(
            HashBiMap::<String, u64>::new,
            |m| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    let _ = m.set(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_force_set_churn(c: &mut Criterion) {
    c.bench_function("hash_bimap_force_set_churn", |b| {
        let (m, _) = filled(3, 10_000);
        let mut it = lcg(5).map(|x| (key(x % 12_000), x % 12_000));
        b.iter(|| {
            let (k, v) = it.next().unwrap();
            m.force_set(k, v);
        })
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("hash_bimap_get_hit", |b| {
        let (m, keys) = filled(7, 20_000);
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(*m.get(k).unwrap());
        })
    });
}

fn bench_inverse_get_hit(c: &mut Criterion) {
    c.bench_function("hash_bimap_inverse_get_hit", |b| {
        let (m, _) = filled(7, 20_000);
        let inv = m.inverse();
        let mut v = 0u64;
        b.iter(|| {
            v = (v + 1) % 20_000;
            black_box(inv.get(&v).is_some());
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("hash_bimap_get_miss", |b| {
        let (m, _) = filled(11, 10_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            // keys from another stream are unlikely to be present
            let k = key(miss.next().unwrap());
            black_box(m.contains_key(&k));
        })
    });
}

fn bench_iterate(c: &mut Criterion) {
    c.bench_function("hash_bimap_iterate_10k", |b| {
        let (m, _) = filled(13, 10_000);
        b.iter(|| black_box(m.values().fold(0u64, u64::wrapping_add)))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_set, bench_force_set_churn, bench_get_hit, bench_inverse_get_hit,
        bench_get_miss, bench_iterate
}
criterion_main!(benches);
