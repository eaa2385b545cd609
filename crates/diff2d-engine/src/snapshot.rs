//! Snapshot offsets and the per-rank snapshot writer.
//!
//! Every snapshot is one `ny × nx` matrix of `f64` in the shared file,
//! snapshots back to back in step order. Each rank writes only its own
//! rows, at offsets it computes without talking to any other rank:
//!
//! ```text
//! start          = nx · global_row_offset · 8
//! row i          = start + i · pitch · 8             (i in 0..local_rows)
//! next snapshot  = start + local_rows · pitch · 8 + nx · (ny − local_rows) · 8
//! ```
//!
//! `pitch` is `nx` for [`SnapshotLayout::RowMajor`] and `ny` for
//! [`SnapshotLayout::Compat`]. The two agree whenever `nx == ny`.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use diff2d_arena::GhostGrid;
use diff2d_core::{SnapshotSink, TransportError, ELEMENT_SIZE};
use diff2d_space::{GlobalGrid, RankGeometry};

use crate::config::ConfigError;

/// Distance in elements between consecutive rows of one rank's block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnapshotLayout {
    /// Row pitch `ny`, matching files written by earlier versions of this
    /// solver. Only a true row-major matrix when the grid is square.
    #[default]
    Compat,
    /// Row pitch `nx`: every snapshot is an exact row-major matrix.
    RowMajor,
}

impl SnapshotLayout {
    /// Row pitch in elements for `grid`.
    pub fn row_pitch(self, grid: &GlobalGrid) -> u64 {
        match self {
            Self::Compat => grid.ny() as u64,
            Self::RowMajor => grid.nx() as u64,
        }
    }

    /// Whether rows written at this pitch tile each snapshot without
    /// overlap. False for [`Compat`](Self::Compat) when `nx != ny`.
    pub fn tiles(self, grid: &GlobalGrid) -> bool {
        self.row_pitch(grid) == grid.nx() as u64
    }

    /// Settings spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compat => "compat",
            Self::RowMajor => "rowmajor",
        }
    }
}

impl FromStr for SnapshotLayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compat" => Ok(Self::Compat),
            "rowmajor" | "row-major" => Ok(Self::RowMajor),
            _ => Err(ConfigError::UnknownLayout { value: s.into() }),
        }
    }
}

impl fmt::Display for SnapshotLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from writing a snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    /// The field handed to the writer is not this rank's slab shape.
    FieldShape {
        /// Owned `(rows, cols)` the writer was built for.
        expected: (usize, usize),
        /// Owned `(rows, cols)` of the field.
        found: (usize, usize),
    },
    /// The positioned write failed.
    Write(TransportError),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldShape { expected, found } => write!(
                f,
                "snapshot field is {}x{}, expected {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            Self::Write(e) => write!(f, "snapshot write failed: {e}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Write(e) => Some(e),
            Self::FieldShape { .. } => None,
        }
    }
}

impl From<TransportError> for SnapshotError {
    fn from(e: TransportError) -> Self {
        Self::Write(e)
    }
}

/// Running byte offset of one rank's next snapshot block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotCursor {
    start: u64,
    offset: u64,
    row_bytes: u64,
    tail_bytes: u64,
    local_rows: u64,
}

impl SnapshotCursor {
    /// Cursor positioned at this rank's first row of snapshot 0.
    pub fn new(grid: &GlobalGrid, geometry: &RankGeometry, layout: SnapshotLayout) -> Self {
        let nx = grid.nx() as u64;
        let ny = grid.ny() as u64;
        let local_rows = geometry.local_rows() as u64;
        let start = nx * geometry.global_row_offset() as u64 * ELEMENT_SIZE;
        Self {
            start,
            offset: start,
            row_bytes: layout.row_pitch(grid) * ELEMENT_SIZE,
            tail_bytes: nx * (ny - local_rows) * ELEMENT_SIZE,
            local_rows,
        }
    }

    /// Offset of this rank's first row in the next snapshot.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Offset of local row `row` (0-based, owned rows only) in the next
    /// snapshot.
    pub fn row_offset(&self, row: usize) -> u64 {
        self.offset + row as u64 * self.row_bytes
    }

    /// Bytes the cursor moves per snapshot.
    pub fn stride(&self) -> u64 {
        self.local_rows * self.row_bytes + self.tail_bytes
    }

    /// Offset of local row `row` in snapshot `index`, independent of the
    /// cursor's position.
    pub fn offset_of(&self, index: u64, row: usize) -> u64 {
        self.start + index * self.stride() + row as u64 * self.row_bytes
    }

    /// Move past the current snapshot.
    pub fn advance(&mut self) {
        self.offset += self.stride();
    }
}

/// Writes one rank's rows of each snapshot into a [`SnapshotSink`].
#[derive(Debug)]
pub struct SnapshotWriter<S> {
    sink: S,
    cursor: SnapshotCursor,
    shape: (usize, usize),
    snapshots: u64,
    bytes: u64,
}

impl<S: SnapshotSink> SnapshotWriter<S> {
    /// Writer for `geometry`'s slab of `grid`.
    pub fn new(
        sink: S,
        grid: &GlobalGrid,
        geometry: &RankGeometry,
        layout: SnapshotLayout,
    ) -> Self {
        Self {
            sink,
            cursor: SnapshotCursor::new(grid, geometry, layout),
            shape: (geometry.local_rows(), grid.nx()),
            snapshots: 0,
            bytes: 0,
        }
    }

    /// Write the owned cells of `field` as the next snapshot and advance.
    pub fn write(&mut self, field: &GhostGrid) -> Result<u64, SnapshotError> {
        let found = (field.rows(), field.cols());
        if found != self.shape {
            return Err(SnapshotError::FieldShape {
                expected: self.shape,
                found,
            });
        }
        let first = self.cursor.offset();
        for r in 0..self.shape.0 {
            let row = field.interior_row(r + 1);
            self.sink.write_at(self.cursor.row_offset(r), row)?;
            self.bytes += row.len() as u64 * ELEMENT_SIZE;
        }
        self.cursor.advance();
        self.snapshots += 1;
        Ok(first)
    }

    /// Flush the sink.
    pub fn flush(&self) -> Result<(), SnapshotError> {
        Ok(self.sink.flush()?)
    }

    /// The cursor, positioned at the next snapshot.
    pub fn cursor(&self) -> &SnapshotCursor {
        &self.cursor
    }

    /// Snapshots written so far.
    pub fn snapshots(&self) -> u64 {
        self.snapshots
    }

    /// Bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }
}
