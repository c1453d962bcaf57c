// Internal-layer bench; requires the bench_internal feature.
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use packed_strings::ByteArena;
use std::time::Duration;

fn bench_append(c: &mut Criterion) {
    c.bench_function("arena_append_10k", |b| {
        b.iter_batched(
            ByteArena::new,
            |mut a| {
                for i in 0..10_000u32 {
                    a.append(format!("entry-{i}").as_bytes());
                }
                black_box(a)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_entry_eq(c: &mut Criterion) {
    c.bench_function("arena_entry_eq", |b| {
        let mut a = ByteArena::new();
        let offsets: Vec<u32> = (0..10_000u32)
            .map(|i| a.append(format!("entry-{i}").as_bytes()))
            .collect();
        let mut i = 0usize;
        b.iter(|| {
            let off = offsets[i % offsets.len()];
            let probe = format!("entry-{}", i % offsets.len());
            i += 1;
            black_box(a.entry_eq(off, probe.as_bytes()))
        })
    });
}

fn bench_len_at(c: &mut Criterion) {
    c.bench_function("arena_len_at", |b| {
        let mut a = ByteArena::new();
        let offsets: Vec<u32> = (0..10_000u32)
            .map(|i| a.append(format!("entry-{i}").as_bytes()))
            .collect();
        let mut it = offsets.iter().cycle();
        b.iter(|| black_box(a.len_at(*it.next().unwrap())))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_append, bench_entry_eq, bench_len_at
}
criterion_main!(benches);
