use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use std::time::Duration;

use ttl_map::constants_for_benchmarking::{GET_MANY, INSERT_MANY, READER_THREADS};
use ttl_map::{ReadMode, TtlMap, TtlMapBuilder};

fn new_map(read_mode: ReadMode, capacity: usize) -> TtlMap<usize, usize> {
    TtlMapBuilder::new(Duration::from_secs(60))
        .read_mode(read_mode)
        .capacity(capacity)
        .build()
        .unwrap()
}

fn insert_many(map: &TtlMap<usize, usize>) {
    for i in 0..INSERT_MANY {
        map.insert(i, i);
    }
}

fn lookup_many(map: &TtlMap<usize, usize>) {
    for i in 0..GET_MANY {
        map.get(&i);
    }
}

// every reader thread hammers the same keys, which is where the read modes differ
fn lookup_many_threaded(map: &TtlMap<usize, usize>) {
    std::thread::scope(|s| {
        for _ in 0..READER_THREADS {
            s.spawn(|| lookup_many(map));
        }
    });
}

fn bencher(c: &mut Criterion) {
    let mut group = c.benchmark_group("ttl map");

    for mode in [ReadMode::Exclusive, ReadMode::Shared] {
        let map = new_map(mode, INSERT_MANY);
        group.bench_function(BenchmarkId::new("insert many", format!("{mode:?}")), |b| {
            b.iter(|| insert_many(&map))
        });

        let map = new_map(mode, GET_MANY);
        for i in 0..GET_MANY {
            map.insert(i, i);
        }

        group.bench_function(BenchmarkId::new("lookup many", format!("{mode:?}")), |b| {
            b.iter(|| lookup_many(&map))
        });

        group.bench_function(
            BenchmarkId::new("lookup many threaded", format!("{mode:?}")),
            |b| b.iter(|| lookup_many_threaded(&map)),
        );
    }

    group.finish();
}

criterion_group!(benches, bencher);
criterion_main!(benches);
