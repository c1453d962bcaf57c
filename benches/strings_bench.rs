use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use packed_strings::{StringMap, StringSet};
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

fn bench_map_insert(c: &mut Criterion) {
    c.bench_function("string_map_insert_10k", |b| {
        b.iter_batched(
            StringMap::new,
            |mut m| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    m.insert(&key(x), &i.to_string());
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_map_get_hit(c: &mut Criterion) {
    c.bench_function("string_map_get_hit", |b| {
        let mut m = StringMap::new();
        let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            m.insert(k, &i.to_string());
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(k));
        })
    });
}

fn bench_map_get_miss(c: &mut Criterion) {
    c.bench_function("string_map_get_miss", |b| {
        let mut m = StringMap::new();
        for (i, x) in lcg(11).take(10_000).enumerate() {
            m.insert(&key(x), &i.to_string());
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            // generate keys unlikely in map
            let k = key(miss.next().unwrap());
            black_box(m.get(&k));
        })
    });
}

fn bench_set_insert(c: &mut Criterion) {
    c.bench_function("string_set_insert_10k", |b| {
        b.iter_batched(
            StringSet::new,
            |mut s| {
                for x in lcg(3).take(10_000) {
                    s.insert(&key(x));
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_map_round_trip(c: &mut Criterion) {
    c.bench_function("string_map_round_trip_10k", |b| {
        let mut m = StringMap::new();
        for (i, x) in lcg(5).take(10_000).enumerate() {
            m.insert(&key(x), &i.to_string());
        }
        b.iter(|| {
            let mut buf = Vec::new();
            m.serialize(&mut buf).unwrap();
            let back = StringMap::deserialize(&mut buf.as_slice()).unwrap();
            black_box(back)
        })
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
    targets = bench_map_insert, bench_map_get_hit, bench_map_get_miss,
        bench_set_insert, bench_map_round_trip
}
criterion_main!(benches);
