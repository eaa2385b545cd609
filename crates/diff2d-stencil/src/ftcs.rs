//! Forward-time, centred-space update of the owned cells.

use diff2d_arena::GhostGrid;
use diff2d_space::GlobalGrid;
use rayon::prelude::*;

/// The explicit five-point diffusion update
///
/// ```text
/// now[i][j] = prev[i][j]
///           + cy · (prev[i+1][j] + prev[i-1][j] − 2·prev[i][j])
///           + cx · (prev[i][j+1] + prev[i][j-1] − 2·prev[i][j])
/// ```
///
/// with `cy = dt·D/dy²` and `cx = dt·D/dx²`. Only owned cells of `now`
/// are written; its ghost margin is left as it was.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FtcsStencil {
    cx: f64,
    cy: f64,
}

impl FtcsStencil {
    /// Coefficients for `grid`'s spacing, diffusivity and time step.
    pub fn new(grid: &GlobalGrid) -> Self {
        Self::from_parts(grid.dt(), grid.diffusivity(), grid.dx(), grid.dy())
    }

    /// Coefficients from raw parameters.
    pub fn from_parts(dt: f64, diffusivity: f64, dx: f64, dy: f64) -> Self {
        Self {
            cx: dt * diffusivity / (dx * dx),
            cy: dt * diffusivity / (dy * dy),
        }
    }

    /// `dt·D/dx²`.
    pub fn cx(&self) -> f64 {
        self.cx
    }

    /// `dt·D/dy²`.
    pub fn cy(&self) -> f64 {
        self.cy
    }

    #[inline]
    fn update_row(&self, above: &[f64], row: &[f64], below: &[f64], out: &mut [f64]) {
        let cols = row.len() - 1;
        for j in 1..cols {
            let c = row[j];
            out[j] = c
                + self.cy * (below[j] + above[j] - 2.0 * c)
                + self.cx * (row[j + 1] + row[j - 1] - 2.0 * c);
        }
    }

    /// Write the next state into `now` on the calling thread.
    ///
    /// # Panics
    ///
    /// Panics if `prev` and `now` differ in shape.
    pub fn apply(&self, prev: &GhostGrid, now: &mut GhostGrid) {
        assert_eq!(prev.shape(), now.shape(), "field pair shape mismatch");
        for i in 1..=prev.rows() {
            self.update_row(prev.row(i - 1), prev.row(i), prev.row(i + 1), now.row_mut(i));
        }
    }

    /// Same update as [`apply`](Self::apply), rows split across the rayon
    /// pool.
    ///
    /// Every cell is computed by the same expression, so the result is
    /// bit-identical to the sequential path.
    ///
    /// # Panics
    ///
    /// Panics if `prev` and `now` differ in shape.
    pub fn apply_parallel(&self, prev: &GhostGrid, now: &mut GhostGrid) {
        assert_eq!(prev.shape(), now.shape(), "field pair shape mismatch");
        let width = now.padded_cols();
        let rows = prev.rows();
        now.as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .skip(1)
            .take(rows)
            .for_each(|(i, out)| {
                self.update_row(prev.row(i - 1), prev.row(i), prev.row(i + 1), out);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_interior_with_matching_ghosts_is_steady() {
        let prev = GhostGrid::from_fn(3, 3, |_, _| 2.0).unwrap();
        let mut now = GhostGrid::new(3, 3).unwrap();
        FtcsStencil::from_parts(0.01, 1.0, 0.1, 0.1).apply(&prev, &mut now);
        for i in 1..=3 {
            assert!(now.interior_row(i).iter().all(|&v| v == 2.0));
        }
    }

    #[test]
    fn ghost_margin_of_now_untouched() {
        let prev = GhostGrid::from_fn(2, 2, |_, _| 1.0).unwrap();
        let mut now = GhostGrid::from_fn(2, 2, |_, _| -9.0).unwrap();
        FtcsStencil::from_parts(0.001, 1.0, 0.1, 0.1).apply(&prev, &mut now);
        assert!(now.row(0).iter().all(|&v| v == -9.0));
        assert!(now.row(3).iter().all(|&v| v == -9.0));
        assert_eq!(now.get(1, 0), -9.0);
        assert_eq!(now.get(1, 3), -9.0);
    }

    #[test]
    fn single_spike_spreads_to_four_neighbours() {
        let mut prev = GhostGrid::new(3, 3).unwrap();
        prev.set(2, 2, 1.0);
        let mut now = GhostGrid::new(3, 3).unwrap();
        let s = FtcsStencil::from_parts(0.002, 1.0, 0.1, 0.1);
        s.apply(&prev, &mut now);
        assert_eq!(now.get(2, 2), 1.0 + s.cy() * -2.0 + s.cx() * -2.0);
        for (i, j) in [(1, 2), (3, 2)] {
            assert_eq!(now.get(i, j), s.cy());
        }
        for (i, j) in [(2, 1), (2, 3)] {
            assert_eq!(now.get(i, j), s.cx());
        }
        assert_eq!(now.get(1, 1), 0.0);
    }

    #[test]
    fn parallel_matches_sequential_bitwise() {
        let prev = GhostGrid::from_fn(17, 13, |i, j| ((i * 31 + j * 7) as f64).sin()).unwrap();
        let s = FtcsStencil::from_parts(0.002, 1.0, 0.1, 0.1);
        let mut seq = GhostGrid::new(17, 13).unwrap();
        let mut par = GhostGrid::new(17, 13).unwrap();
        s.apply(&prev, &mut seq);
        s.apply_parallel(&prev, &mut par);
        assert_eq!(seq, par);
    }
}
