//! Cell centres and the closed-form initial field.

use diff2d_arena::{ArenaError, GhostGrid};
use diff2d_space::{GlobalGrid, RankGeometry};

/// π truncated to ten decimals, as the established initial field uses it.
#[allow(clippy::approx_constant)]
const PI_TRUNCATED: f64 = 3.1415926535;

/// x coordinate of every padded column: `x[j] = (j - 0.5)·dx` for
/// `j in 0..nx + 2`.
pub fn cell_centres_x(grid: &GlobalGrid) -> Vec<f64> {
    (0..grid.nx() + 2)
        .map(|j| (j as f64 - 0.5) * grid.dx())
        .collect()
}

/// y coordinate of every padded row of this rank's slab:
/// `y[i] = y0 + (i - 0.5)·dy` for `i in 0..local_rows + 2`.
///
/// The slab origin is `y0 = global_row_offset · dx`. Scaling by `dx`
/// rather than `dy` is part of the established output and only matters
/// when the two spacings differ.
pub fn cell_centres_y(grid: &GlobalGrid, geometry: &RankGeometry) -> Vec<f64> {
    let y0 = geometry.global_row_offset() as f64 * grid.dx();
    (0..geometry.local_rows() + 2)
        .map(|i| y0 + (i as f64 - 0.5) * grid.dy())
        .collect()
}

/// `sin(7(y + x)π/Lx) · sin((x/Ly)² · 11π)`.
pub fn initial_value(x: f64, y: f64, lx: f64, ly: f64) -> f64 {
    (7.0 * (y + x) * PI_TRUNCATED / lx).sin() * ((x / ly).powi(2) * 11.0 * PI_TRUNCATED).sin()
}

/// This rank's starting field, evaluated at every padded cell.
///
/// Ghost cells get the formula too, so the first step reads sane values
/// even before any boundary condition or exchange has run.
pub fn initial_condition(
    grid: &GlobalGrid,
    geometry: &RankGeometry,
) -> Result<GhostGrid, ArenaError> {
    let x = cell_centres_x(grid);
    let y = cell_centres_y(grid, geometry);
    GhostGrid::from_fn(geometry.local_rows(), grid.nx(), |i, j| {
        initial_value(x[j], y[i], grid.lx(), grid.ly())
    })
}
