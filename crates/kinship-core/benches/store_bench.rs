use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use kinship_core::query::KinshipEngine;
use kinship_core::storage::duckdb::DuckDbStorage;

fn seeded_engine(rt: &tokio::runtime::Runtime) -> KinshipEngine {
    let storage = Arc::new(DuckDbStorage::open_in_memory().unwrap());
    let engine = KinshipEngine::new(storage);
    rt.block_on(engine.initialize_sample_data()).unwrap();
    engine
}

fn bench_search(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let engine = seeded_engine(&rt);

    c.bench_function("search_devanagari", |b| {
        b.iter(|| rt.block_on(engine.search("गुप्ता")).unwrap())
    });
    c.bench_function("search_empty", |b| {
        b.iter(|| rt.block_on(engine.search("")).unwrap())
    });
}

fn bench_list(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let engine = seeded_engine(&rt);

    c.bench_function("list_members", |b| {
        b.iter(|| rt.block_on(engine.list_members()).unwrap())
    });
}

criterion_group!(benches, bench_search, bench_list);
criterion_main!(benches);
