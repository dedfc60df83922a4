//! Criterion micro-benchmarks for catalog construction and successor
//! enumeration.

use criterion::{criterion_group, criterion_main, Criterion};
use reconfig_bench::{catalog, line_to_column};
use reconfig_search::{ConfigurationSpace, SearchConfig};
use reconfig_test_utils::fixtures::slab_3d;
use std::hint::black_box;

/// Benchmark: expand the built-in templates over all 3D symmetries.
fn bench_catalog_build_3d(c: &mut Criterion) {
    c.bench_function("catalog_build_3d", |b| {
        b.iter(|| black_box(catalog(black_box(3))));
    });
}

/// Benchmark: all successors of a 12-module line with its static wall.
fn bench_successors_line_12(c: &mut Criterion) {
    let (lattice, _) = line_to_column(12);
    let mut space = ConfigurationSpace::new(&lattice, catalog(2), SearchConfig::default()).unwrap();
    let start = space.start();

    c.bench_function("successors_line_12", |b| {
        b.iter(|| black_box(space.successors(&start)));
    });
}

/// Benchmark: successors of the 3D slab, sequential vs. two threads.
fn bench_successors_slab_threads(c: &mut Criterion) {
    let (lattice, _) = slab_3d();
    for threads in [1, 2] {
        let config = SearchConfig {
            expansion_threads: threads,
            ..Default::default()
        };
        let mut space = ConfigurationSpace::new(&lattice, catalog(3), config).unwrap();
        let start = space.start();
        c.bench_function(&format!("successors_slab_3d_t{threads}"), |b| {
            b.iter(|| black_box(space.successors(&start)));
        });
    }
}

criterion_group!(
    benches,
    bench_catalog_build_3d,
    bench_successors_line_12,
    bench_successors_slab_threads
);
criterion_main!(benches);
