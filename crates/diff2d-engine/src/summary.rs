//! Human-readable decomposition report, printed by the leader at start.

use std::fmt;

use diff2d_space::GlobalGrid;

/// What the leader reports before the first step.
#[derive(Clone, Debug, PartialEq)]
pub struct DecompositionSummary {
    /// Domain extents `(Lx, Ly)`.
    pub domain: (f64, f64),
    /// Grid size `(nx, ny)`.
    pub cells: (usize, usize),
    /// Number of ranks.
    pub ranks: usize,
    /// Owned rows per rank, in rank order.
    pub local_rows: Vec<u64>,
    /// Total time steps.
    pub steps: u64,
    /// Snapshot cadence in steps.
    pub per: u64,
    /// Snapshots a full run writes.
    pub snapshots: u64,
}

impl DecompositionSummary {
    /// Summary for `grid` split into slabs of `local_rows` rows.
    pub fn new(grid: &GlobalGrid, local_rows: Vec<u64>) -> Self {
        Self {
            domain: (grid.lx(), grid.ly()),
            cells: (grid.nx(), grid.ny()),
            ranks: local_rows.len(),
            local_rows,
            steps: grid.nt(),
            per: grid.per(),
            snapshots: grid.snapshot_count(),
        }
    }
}

impl fmt::Display for DecompositionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self
            .local_rows
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        writeln!(f, "===")?;
        writeln!(f, "Domain size:\t{} x {}", self.domain.0, self.domain.1)?;
        writeln!(f, "Grid size:\t{} x {}", self.cells.0, self.cells.1)?;
        writeln!(f, "Processes:\t{}", self.ranks)?;
        writeln!(f, "Local grids:\t{} x {{{rows}}}", self.cells.0)?;
        writeln!(f, "Time steps:\t{}", self.steps)?;
        writeln!(
            f,
            "Output every\t{} steps ({} snapshots)",
            self.per, self.snapshots
        )?;
        write!(f, "===")
    }
}
