//! Criterion micro-benchmarks for the per-slab kernel.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use diff2d_arena::FieldPair;
use diff2d_bench::{reference_profile, stress_profile};
use diff2d_core::Rank;
use diff2d_engine::SimConfig;
use diff2d_space::RankGeometry;
use diff2d_stencil::{apply_edges, cell_centres_x, initial_condition, FtcsStencil, ZeroDirichlet};

/// The whole grid as one slab.
fn whole_grid(config: &SimConfig) -> (RankGeometry, FieldPair) {
    let geometry = RankGeometry::new(config.grid.ny(), Rank(0), 1).unwrap();
    let field = FieldPair::new(initial_condition(&config.grid, &geometry).unwrap());
    (geometry, field)
}

fn bench_ftcs(c: &mut Criterion, name: &str, config: &SimConfig) {
    let stencil = FtcsStencil::new(&config.grid);
    let (_, mut field) = whole_grid(config);

    let mut group = c.benchmark_group(name);
    group.bench_function("sequential", |b| {
        b.iter(|| {
            let (prev, now) = field.split();
            stencil.apply(black_box(prev), now);
        });
    });
    group.bench_function("parallel", |b| {
        b.iter(|| {
            let (prev, now) = field.split();
            stencil.apply_parallel(black_box(prev), now);
        });
    });
    group.finish();
}

/// Benchmark: one FTCS update of the 200×200 reference grid.
fn bench_ftcs_reference(c: &mut Criterion) {
    bench_ftcs(c, "ftcs_200x200", &reference_profile().unwrap());
}

/// Benchmark: one FTCS update of the 1000×1000 stress grid.
fn bench_ftcs_stress(c: &mut Criterion) {
    bench_ftcs(c, "ftcs_1000x1000", &stress_profile().unwrap());
}

/// Benchmark: edge boundary conditions on the reference grid.
fn bench_edges_reference(c: &mut Criterion) {
    let config = reference_profile().unwrap();
    let (geometry, mut field) = whole_grid(&config);
    let x = cell_centres_x(&config.grid);

    c.bench_function("apply_edges_200x200", |b| {
        b.iter(|| {
            apply_edges(field.prev_mut(), &geometry, &ZeroDirichlet, &x, 0, config.grid.dt());
            black_box(field.prev());
        });
    });
}

criterion_group!(
    benches,
    bench_ftcs_reference,
    bench_ftcs_stress,
    bench_edges_reference
);
criterion_main!(benches);
