//! Double-buffered field pair with O(1) role swap.
//!
//! The lifecycle per step is:
//! 1. boundary conditions and halo exchange write into `prev_mut()`
//! 2. `split()` hands the stencil `prev` to read and `now` to write
//! 3. `swap()` makes `now` the next step's `prev`

use crate::error::ArenaError;
use crate::ghost::GhostGrid;

/// Two same-shaped [`GhostGrid`]s whose read/write roles alternate.
///
/// Swapping flips an index; no cell data moves.
#[derive(Clone, Debug)]
pub struct FieldPair {
    grids: [GhostGrid; 2],
    /// Index of the grid currently playing `prev`.
    prev: usize,
    /// Number of swaps performed.
    generation: u64,
}

impl FieldPair {
    /// Pair whose halves both start as copies of `initial`.
    pub fn new(initial: GhostGrid) -> Self {
        Self {
            grids: [initial.clone(), initial],
            prev: 0,
            generation: 0,
        }
    }

    /// Pair from two existing grids; `prev` starts as `a`.
    pub fn from_grids(a: GhostGrid, b: GhostGrid) -> Result<Self, ArenaError> {
        if a.shape() != b.shape() {
            return Err(ArenaError::ShapeMismatch {
                left: a.shape(),
                right: b.shape(),
            });
        }
        Ok(Self {
            grids: [a, b],
            prev: 0,
            generation: 0,
        })
    }

    /// Grid holding the current state.
    pub fn prev(&self) -> &GhostGrid {
        &self.grids[self.prev]
    }

    /// Mutable access to the current state, for boundary conditions and
    /// halo exchange.
    pub fn prev_mut(&mut self) -> &mut GhostGrid {
        &mut self.grids[self.prev]
    }

    /// Grid the next state is written into.
    pub fn now(&self) -> &GhostGrid {
        &self.grids[1 - self.prev]
    }

    /// Borrow `prev` for reading and `now` for writing together.
    pub fn split(&mut self) -> (&GhostGrid, &mut GhostGrid) {
        let (a, b) = self.grids.split_at_mut(1);
        if self.prev == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        }
    }

    /// Exchange the roles of the two grids.
    pub fn swap(&mut self) {
        self.prev = 1 - self.prev;
        self.generation += 1;
    }

    /// Number of swaps since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Consume the pair, returning the grid holding the current state.
    pub fn into_prev(self) -> GhostGrid {
        let [a, b] = self.grids;
        if self.prev == 0 {
            a
        } else {
            b
        }
    }
}
