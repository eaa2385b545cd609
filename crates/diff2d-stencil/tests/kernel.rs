use std::thread;

use diff2d_arena::{FieldPair, GhostGrid};
use diff2d_core::Transport;
use diff2d_space::{decompose, GlobalGrid, GridParams, RankGeometry};
use diff2d_stencil::{
    apply_edges, cell_centres_x, exchange_halos, initial_condition, FtcsStencil, ZeroDirichlet,
};
use diff2d_transport::LocalGroup;
use proptest::prelude::*;

/// Square domain of `cells × cells` cells of side 1/8.
fn square_grid(cells: usize) -> GlobalGrid {
    let side = cells as f64 * 0.125;
    GlobalGrid::derive(GridParams {
        lx: side,
        ly: side,
        dx: 0.125,
        dy: 0.125,
        diffusivity: 1.0,
        runtime: 1.0,
        output_interval: 0.5,
    })
    .unwrap()
}

/// Slab of a global `ny × nx` field whose owned cell `(g, j)` holds
/// `1000·g + j`, ghosts set to NaN.
fn tagged_slab(geo: &RankGeometry, nx: usize) -> GhostGrid {
    let off = geo.global_row_offset();
    let rows = geo.local_rows();
    GhostGrid::from_fn(rows, nx, |i, j| {
        if (1..=rows).contains(&i) && (1..=nx).contains(&j) {
            (1000 * (off + i - 1) + j) as f64
        } else {
            f64::NAN
        }
    })
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn exchange_copies_neighbour_rows(ny in 2usize..24, nx in 1usize..8, size in 1usize..6) {
        prop_assume!(ny >= size);
        let slabs = decompose(ny, size).unwrap();
        let handles: Vec<_> = LocalGroup::new(size)
            .into_transports()
            .into_iter()
            .zip(slabs)
            .map(|(t, geo)| {
                thread::spawn(move || {
                    let mut f = tagged_slab(&geo, nx);
                    exchange_halos(&mut f, &geo, &t).unwrap();
                    (geo, f)
                })
            })
            .collect();

        for h in handles {
            let (geo, f) = h.join().unwrap();
            let off = geo.global_row_offset();
            let n = geo.local_rows();
            if geo.neighbor_down().is_some() {
                for j in 1..=nx {
                    prop_assert_eq!(f.get(0, j), (1000 * (off - 1) + j) as f64);
                }
            } else {
                prop_assert!(f.row(0).iter().all(|v| v.is_nan()));
            }
            if geo.neighbor_up().is_some() {
                for j in 1..=nx {
                    prop_assert_eq!(f.get(n + 1, j), (1000 * (off + n) + j) as f64);
                }
            } else {
                prop_assert!(f.row(n + 1).iter().all(|v| v.is_nan()));
            }
        }
    }

    #[test]
    fn energy_never_grows_under_zero_edges(cells in 4usize..24, steps in 1u64..40) {
        let grid = square_grid(cells);
        prop_assume!(!grid.exceeds_stability_limit());
        let geo = RankGeometry::new(grid.ny(), diff2d_core::Rank(0), 1).unwrap();
        let x = cell_centres_x(&grid);
        let stencil = FtcsStencil::new(&grid);
        let mut pair = FieldPair::new(initial_condition(&grid, &geo).unwrap());

        apply_edges(pair.prev_mut(), &geo, &ZeroDirichlet, &x, 0, grid.dt());
        let mut energy = pair.prev().interior_energy();
        for step in 0..steps {
            apply_edges(pair.prev_mut(), &geo, &ZeroDirichlet, &x, step, grid.dt());
            let (prev, now) = pair.split();
            stencil.apply(prev, now);
            pair.swap();
            let next = pair.prev().interior_energy();
            prop_assert!(next <= energy * (1.0 + 1e-12), "step {}: {} > {}", step, next, energy);
            energy = next;
        }
    }
}

#[test]
fn single_rank_exchange_is_a_noop() {
    let grid = square_grid(10);
    let geo = RankGeometry::new(grid.ny(), diff2d_core::Rank(0), 1).unwrap();
    let t = LocalGroup::new(1).into_transports().remove(0);
    assert_eq!(t.size(), 1);
    let mut f = initial_condition(&grid, &geo).unwrap();
    let before = f.clone();
    exchange_halos(&mut f, &geo, &t).unwrap();
    assert_eq!(f, before);
}
