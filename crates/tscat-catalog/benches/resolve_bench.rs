//! Benchmark: catalog lookups and store reads.
//!
//! Run with: `cargo bench -p tscat-catalog --bench resolve_bench`
//!
//! Measures resolve latency for hits, misses and plural selection on a
//! real `lupdate` catalog, direct and through a published `CatalogStore`,
//! plus parse cost for the whole file.

use std::sync::{Arc, Barrier};
use std::thread;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tscat_catalog::{Catalog, CatalogStore, LoadOptions};

const UIBASE: &str = include_str!("../tests/fixtures/uibase_en.ts");
const PLURAL: &str = "This plugin can only be enabled for the following game(s): %1.";

// ===========================================================================
// Parse
// ===========================================================================

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse/uibase", |b| {
        b.iter(|| black_box(Catalog::parse(black_box(UIBASE), &LoadOptions::default())));
    });
}

// ===========================================================================
// Single-threaded resolve
// ===========================================================================

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let catalog = Catalog::load(UIBASE).expect("fixture parses");

    group.bench_function("hit", |b| {
        b.iter(|| black_box(catalog.resolve(black_box("QObject"), black_box("Error"), None)));
    });
    group.bench_function("miss", |b| {
        b.iter(|| black_box(catalog.resolve(black_box("QObject"), black_box("Missing"), None)));
    });
    group.bench_function("plural", |b| {
        b.iter(|| black_box(catalog.resolve(black_box("QObject"), black_box(PLURAL), Some(5))));
    });

    let store = CatalogStore::new();
    store
        .load(UIBASE, &LoadOptions::default())
        .expect("fixture parses");
    group.bench_function("store_hit", |b| {
        b.iter(|| black_box(store.resolve(black_box("QObject"), black_box("Error"), None)));
    });

    group.finish();
}

// ===========================================================================
// Multi-threaded reads
// ===========================================================================

fn bench_concurrent_store(c: &mut Criterion) {
    const READERS: usize = 4;
    const READS: usize = 1_000;

    let store = Arc::new(CatalogStore::new());
    store
        .load(UIBASE, &LoadOptions::default())
        .expect("fixture parses");

    c.bench_function("store/4_readers_x_1000", |b| {
        b.iter(|| {
            let barrier = Arc::new(Barrier::new(READERS));
            let handles: Vec<_> = (0..READERS)
                .map(|_| {
                    let store = Arc::clone(&store);
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        barrier.wait();
                        for _ in 0..READS {
                            let _ = black_box(store.resolve("uibase", "h", None));
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().expect("reader thread");
            }
        });
    });
}

criterion_group!(benches, bench_parse, bench_resolve, bench_concurrent_store);
criterion_main!(benches);
