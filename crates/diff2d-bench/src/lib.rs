//! Benchmark profiles for the diff2d solver.
//!
//! - [`reference_profile`]: 200×200 cells, 20 steps
//! - [`stress_profile`]: 1000×1000 cells, 4 steps

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use diff2d_engine::{Forcing, SimConfig, SnapshotLayout};
use diff2d_space::{GlobalGrid, GridParams, SpaceError};

/// Square grid of `cells × cells` cells, running `steps` steps and
/// writing only the first and last snapshot.
///
/// `dt = dx²/5` for `D = 1`, so the run time is `steps · dx²/5`.
pub fn square_profile(cells: usize, steps: u64) -> Result<SimConfig, SpaceError> {
    // Power-of-two spacing keeps nx = ny = cells exact under floor.
    let dx = 1.0 / cells.next_power_of_two() as f64;
    let side = cells as f64 * dx;
    let dt = dx * dx / 5.0;
    let params = GridParams {
        lx: side,
        ly: side,
        dx,
        dy: dx,
        diffusivity: 1.0,
        runtime: steps as f64 * dt,
        output_interval: steps as f64 * dt,
    };
    Ok(SimConfig {
        params,
        grid: GlobalGrid::derive(params)?,
        output: std::env::temp_dir().join("diff2d-bench.bin"),
        forcing: Forcing::Zero,
        layout: SnapshotLayout::Compat,
        parallel: false,
    })
}

/// 200×200 cells (40K), 20 steps.
pub fn reference_profile() -> Result<SimConfig, SpaceError> {
    square_profile(200, 20)
}

/// 1000×1000 cells (1M), 4 steps.
pub fn stress_profile() -> Result<SimConfig, SpaceError> {
    square_profile(1000, 4)
}
