//! Undecomposed serial solver.
//!
//! Runs the whole grid as one `(ny + 2) × (nx + 2)` array with no halo
//! exchange, evaluating every cell with the same expression the
//! distributed solver uses. A single-rank run must match it exactly.

use diff2d_space::GlobalGrid;
use diff2d_stencil::{initial_value, BoundaryCondition};

/// Result of a serial run.
#[derive(Clone, Debug, PartialEq)]
pub struct SerialRun {
    pub nx: usize,
    pub ny: usize,
    /// Every snapshot as a row-major `ny × nx` matrix, in step order.
    pub snapshots: Vec<Vec<f64>>,
    /// Final owned cells, row-major `ny × nx`.
    pub final_field: Vec<f64>,
}

impl SerialRun {
    /// Final value of global cell `(row, col)`, 0-based over owned cells.
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.final_field[row * self.nx + col]
    }
}

fn interior(field: &[f64], nx: usize, ny: usize) -> Vec<f64> {
    let w = nx + 2;
    (1..=ny)
        .flat_map(|i| field[i * w + 1..i * w + 1 + nx].iter().copied())
        .collect()
}

/// Run `grid` to completion on one array under `bc`.
pub fn serial_reference(grid: &GlobalGrid, bc: &dyn BoundaryCondition) -> SerialRun {
    let (nx, ny) = (grid.nx(), grid.ny());
    let (dx, dy, dt) = (grid.dx(), grid.dy(), grid.dt());
    let w = nx + 2;
    let x: Vec<f64> = (0..w).map(|j| (j as f64 - 0.5) * dx).collect();
    let y: Vec<f64> = (0..ny + 2).map(|i| (i as f64 - 0.5) * dy).collect();

    let mut prev = vec![0.0; (ny + 2) * w];
    for i in 0..ny + 2 {
        for j in 0..w {
            prev[i * w + j] = initial_value(x[j], y[i], grid.lx(), grid.ly());
        }
    }
    let mut now = prev.clone();

    let cy = dt * grid.diffusivity() / (dy * dy);
    let cx = dt * grid.diffusivity() / (dx * dx);

    let mut snapshots = Vec::new();
    let mut t = 0;
    while t < grid.nt() {
        if t % grid.per() == 0 {
            snapshots.push(interior(&prev, nx, ny));
        }
        for i in 0..ny + 2 {
            prev[i * w] = 0.0;
            prev[i * w + nx + 1] = 0.0;
        }
        for j in 0..w {
            prev[j] = bc.top_edge(x[j], t, dt);
            prev[(ny + 1) * w + j] = 0.0;
        }
        for i in 1..=ny {
            for j in 1..=nx {
                let c = prev[i * w + j];
                now[i * w + j] = c
                    + cy * (prev[(i + 1) * w + j] + prev[(i - 1) * w + j] - 2.0 * c)
                    + cx * (prev[i * w + j + 1] + prev[i * w + j - 1] - 2.0 * c);
            }
        }
        std::mem::swap(&mut prev, &mut now);
        t += 1;
    }
    if t % grid.per() == 0 {
        snapshots.push(interior(&prev, nx, ny));
    }

    SerialRun {
        nx,
        ny,
        snapshots,
        final_field: interior(&prev, nx, ny),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::REFERENCE_PARAMS;
    use diff2d_stencil::ZeroDirichlet;

    #[test]
    fn snapshot_count_matches_schedule() {
        let grid = GlobalGrid::derive(REFERENCE_PARAMS).unwrap();
        let run = serial_reference(&grid, &ZeroDirichlet);
        assert_eq!(run.snapshots.len() as u64, grid.snapshot_count());
        assert!(run.snapshots.iter().all(|s| s.len() == 100));
        assert_eq!(run.final_field.len(), 100);
    }

    #[test]
    fn first_snapshot_is_initial_condition() {
        let grid = GlobalGrid::derive(REFERENCE_PARAMS).unwrap();
        let run = serial_reference(&grid, &ZeroDirichlet);
        let v = initial_value(0.5 * 0.1, 0.5 * 0.1, 1.0, 1.0);
        assert_eq!(run.snapshots[0][0], v);
    }
}
