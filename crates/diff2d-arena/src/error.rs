//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur while building field storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// A grid with no interior rows or columns was requested.
    EmptyGrid {
        /// Requested interior rows.
        rows: usize,
        /// Requested interior columns.
        cols: usize,
    },
    /// A backing buffer does not match the padded shape.
    LengthMismatch {
        /// Length the padded shape requires.
        expected: usize,
        /// Length supplied.
        found: usize,
    },
    /// The two halves of a pair have different shapes.
    ShapeMismatch {
        /// Padded `(rows, cols)` of the first grid.
        left: (usize, usize),
        /// Padded `(rows, cols)` of the second grid.
        right: (usize, usize),
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { rows, cols } => {
                write!(f, "grid must have interior cells, got {rows}x{cols}")
            }
            Self::LengthMismatch { expected, found } => {
                write!(f, "buffer length mismatch: expected {expected}, found {found}")
            }
            Self::ShapeMismatch { left, right } => write!(
                f,
                "field pair shape mismatch: {}x{} vs {}x{}",
                left.0, left.1, right.0, right.1
            ),
        }
    }
}

impl Error for ArenaError {}
