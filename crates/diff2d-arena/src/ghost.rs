//! A row-major 2D block with a one-cell ghost margin.

use crate::error::ArenaError;

/// Width of the ghost margin on each side of the owned block.
pub const GHOST_WIDTH: usize = 1;

/// Dense row-major storage of `(rows + 2) × (cols + 2)` values.
///
/// Indices passed to every accessor are *padded* coordinates: row 0 and
/// row `rows + 1` are ghost rows, column 0 and column `cols + 1` are ghost
/// columns, and owned cells live in `1..=rows × 1..=cols`.
///
/// # Examples
///
/// ```
/// use diff2d_arena::GhostGrid;
///
/// let g = GhostGrid::from_fn(2, 3, |i, j| (10 * i + j) as f64).unwrap();
/// assert_eq!((g.padded_rows(), g.padded_cols()), (4, 5));
/// assert_eq!(g.get(1, 1), 11.0);
/// assert_eq!(g.interior_row(2), &[21.0, 22.0, 23.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GhostGrid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl GhostGrid {
    /// Zero-filled grid with `rows × cols` owned cells.
    pub fn new(rows: usize, cols: usize) -> Result<Self, ArenaError> {
        Self::from_fn(rows, cols, |_, _| 0.0)
    }

    /// Grid whose every cell, ghosts included, is `f(i, j)` in padded
    /// coordinates.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Result<Self, ArenaError>
    where
        F: FnMut(usize, usize) -> f64,
    {
        if rows == 0 || cols == 0 {
            return Err(ArenaError::EmptyGrid { rows, cols });
        }
        let padded_cols = cols + 2 * GHOST_WIDTH;
        let padded_rows = rows + 2 * GHOST_WIDTH;
        let mut data = Vec::with_capacity(padded_rows * padded_cols);
        for i in 0..padded_rows {
            for j in 0..padded_cols {
                data.push(f(i, j));
            }
        }
        Ok(Self { rows, cols, data })
    }

    /// Wrap an existing padded buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, ArenaError> {
        if rows == 0 || cols == 0 {
            return Err(ArenaError::EmptyGrid { rows, cols });
        }
        let expected = (rows + 2 * GHOST_WIDTH) * (cols + 2 * GHOST_WIDTH);
        if data.len() != expected {
            return Err(ArenaError::LengthMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Number of owned rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of owned columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Rows including the ghost margin.
    pub fn padded_rows(&self) -> usize {
        self.rows + 2 * GHOST_WIDTH
    }

    /// Columns including the ghost margin.
    pub fn padded_cols(&self) -> usize {
        self.cols + 2 * GHOST_WIDTH
    }

    /// Padded `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.padded_rows(), self.padded_cols())
    }

    /// Flat storage index of padded cell `(i, j)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.padded_rows() && j < self.padded_cols());
        i * self.padded_cols() + j
    }

    /// Value at padded cell `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.index(i, j)]
    }

    /// Overwrite padded cell `(i, j)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        let k = self.index(i, j);
        self.data[k] = value;
    }

    /// Full padded row `i`, ghost columns included.
    pub fn row(&self, i: usize) -> &[f64] {
        let start = self.index(i, 0);
        &self.data[start..start + self.padded_cols()]
    }

    /// Mutable full padded row `i`.
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let start = self.index(i, 0);
        let width = self.padded_cols();
        &mut self.data[start..start + width]
    }

    /// Borrow row `send` shared and row `recv` mutably at the same time.
    ///
    /// # Panics
    ///
    /// Panics if `send == recv`.
    pub fn row_pair_mut(&mut self, send: usize, recv: usize) -> (&[f64], &mut [f64]) {
        assert_ne!(send, recv, "send and receive rows must differ");
        let width = self.padded_cols();
        let (s, r) = (self.index(send, 0), self.index(recv, 0));
        if s < r {
            let (lo, hi) = self.data.split_at_mut(r);
            (&lo[s..s + width], &mut hi[..width])
        } else {
            let (lo, hi) = self.data.split_at_mut(s);
            (&hi[..width], &mut lo[r..r + width])
        }
    }

    /// The `cols` owned values of padded row `i`.
    pub fn interior_row(&self, i: usize) -> &[f64] {
        let start = self.index(i, GHOST_WIDTH);
        &self.data[start..start + self.cols]
    }

    /// Entire padded buffer, row-major.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Entire padded buffer, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Sum of squares over owned cells.
    pub fn interior_energy(&self) -> f64 {
        (GHOST_WIDTH..=self.rows)
            .flat_map(|i| self.interior_row(i))
            .map(|v| v * v)
            .sum()
    }
}
