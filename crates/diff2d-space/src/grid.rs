//! Global grid derivation: cell counts, time step, and output cadence.

use crate::error::SpaceError;

/// Relative tolerance for "spacing divides length" checks.
pub const FIT_TOLERANCE: f64 = 1.0e-8;

/// Divisor in the time-step rule `dt = min(dx², dy²)·D / 5`.
const DT_DIVISOR: f64 = 5.0;

/// Physical inputs of a run, as read from the settings file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridParams {
    /// Domain extent along x (`LX`).
    pub lx: f64,
    /// Domain extent along y (`LY`).
    pub ly: f64,
    /// Cell spacing along x (`DX`).
    pub dx: f64,
    /// Cell spacing along y (`DY`, defaults to `DX`).
    pub dy: f64,
    /// Diffusion coefficient (`D`).
    pub diffusivity: f64,
    /// Simulated time to run for (`TIME`).
    pub runtime: f64,
    /// Simulated time between snapshots (`OUTPUT`).
    pub output_interval: f64,
}

/// Immutable description of the global grid and its time-step schedule.
///
/// Built once by [`GlobalGrid::derive`]; every rank derives the same value
/// from the same settings.
///
/// # Compatibility notes
///
/// `ny` is derived as `floor(Lx / dy)`, not `floor(Ly / dy)`. The
/// `DY`-fits-`LY` check therefore only passes when `Lx / dy` happens to
/// equal `Ly / dy`, which in practice restricts runs to square domains.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobalGrid {
    lx: f64,
    ly: f64,
    dx: f64,
    dy: f64,
    nx: usize,
    ny: usize,
    diffusivity: f64,
    dt: f64,
    nt: u64,
    per: u64,
}

fn require_positive(name: &'static str, value: f64) -> Result<(), SpaceError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SpaceError::InvalidParameter { name, value })
    }
}

/// `|(length / spacing) / cells - 1| <= FIT_TOLERANCE`
fn fits(length: f64, spacing: f64, cells: usize) -> bool {
    ((length / spacing) / cells as f64 - 1.0).abs() <= FIT_TOLERANCE
}

impl GlobalGrid {
    /// Derive the grid and schedule from physical parameters.
    ///
    /// Checks, in order: every parameter finite and positive, run time at
    /// least one step, output interval at least one step, `DX` fits `LX`,
    /// `DY` fits `LY`. The group-size check lives in
    /// [`check_group_size`](Self::check_group_size).
    ///
    /// # Examples
    ///
    /// ```
    /// use diff2d_space::{GlobalGrid, GridParams};
    ///
    /// let grid = GlobalGrid::derive(GridParams {
    ///     lx: 1.0, ly: 1.0, dx: 0.1, dy: 0.1,
    ///     diffusivity: 1.0, runtime: 0.01, output_interval: 0.006,
    /// }).unwrap();
    /// assert_eq!((grid.nx(), grid.ny()), (10, 10));
    /// assert_eq!(grid.nt(), 5);
    /// assert_eq!(grid.per(), 3);
    /// assert_eq!(grid.snapshot_count(), 2);
    /// ```
    pub fn derive(params: GridParams) -> Result<Self, SpaceError> {
        require_positive("LX", params.lx)?;
        require_positive("LY", params.ly)?;
        require_positive("DX", params.dx)?;
        require_positive("DY", params.dy)?;
        require_positive("D", params.diffusivity)?;
        require_positive("TIME", params.runtime)?;
        require_positive("OUTPUT", params.output_interval)?;

        let GridParams {
            lx,
            ly,
            dx,
            dy,
            diffusivity,
            runtime,
            output_interval,
        } = params;

        let nx = (lx / dx) as usize;
        let ny = (lx / dy) as usize;
        let dtx = dx * dx * diffusivity / DT_DIVISOR;
        let dty = dy * dy * diffusivity / DT_DIVISOR;
        let dt = if dtx < dty { dtx } else { dty };
        let nt = (0.5 + runtime / dt) as u64;
        let per = (0.5 + output_interval / dt) as u64;

        if dt > runtime {
            return Err(SpaceError::RuntimeTooShort { runtime, dt });
        }
        if per == 0 {
            return Err(SpaceError::OutputIntervalTooShort {
                interval: output_interval,
                dt,
            });
        }
        if !fits(lx, dx, nx) {
            return Err(SpaceError::SpacingMismatch {
                spacing: "DX",
                length: "LX",
            });
        }
        if !fits(ly, dy, ny) {
            return Err(SpaceError::SpacingMismatch {
                spacing: "DY",
                length: "LY",
            });
        }

        Ok(Self {
            lx,
            ly,
            dx,
            dy,
            nx,
            ny,
            diffusivity,
            dt,
            nt,
            per,
        })
    }

    /// Fail if the grid cannot give every one of `size` ranks a row.
    pub fn check_group_size(&self, size: usize) -> Result<(), SpaceError> {
        if size == 0 {
            return Err(SpaceError::EmptyGroup);
        }
        if self.ny < size {
            return Err(SpaceError::TooFewRows { ny: self.ny, size });
        }
        Ok(())
    }

    /// Domain extent along x.
    pub fn lx(&self) -> f64 {
        self.lx
    }

    /// Domain extent along y.
    pub fn ly(&self) -> f64 {
        self.ly
    }

    /// Cell spacing along x.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Cell spacing along y.
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Number of interior columns.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of interior rows.
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Diffusion coefficient.
    pub fn diffusivity(&self) -> f64 {
        self.diffusivity
    }

    /// Time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Total number of steps.
    pub fn nt(&self) -> u64 {
        self.nt
    }

    /// Snapshot cadence in steps.
    pub fn per(&self) -> u64 {
        self.per
    }

    /// Whether a snapshot is due at `step`.
    pub fn is_snapshot_step(&self, step: u64) -> bool {
        step % self.per == 0
    }

    /// Number of snapshots a full run writes.
    ///
    /// One at step 0, one every `per` steps before `nt`, and one after the
    /// loop when `nt` itself lands on the cadence: `floor(nt/per) + 1`
    /// either way.
    pub fn snapshot_count(&self) -> u64 {
        self.nt / self.per + 1
    }

    /// Bytes in one full `ny × nx` snapshot matrix.
    pub fn snapshot_bytes(&self) -> u64 {
        self.nx as u64 * self.ny as u64 * diff2d_core::ELEMENT_SIZE
    }

    /// Largest stable explicit time step for this spacing and diffusivity,
    /// `1 / (2D (1/dx² + 1/dy²))`.
    ///
    /// The derived `dt` is not checked against it; callers may warn.
    pub fn von_neumann_limit(&self) -> f64 {
        1.0 / (2.0 * self.diffusivity * (1.0 / (self.dx * self.dx) + 1.0 / (self.dy * self.dy)))
    }

    /// Whether the derived `dt` exceeds [`von_neumann_limit`](Self::von_neumann_limit).
    pub fn exceeds_stability_limit(&self) -> bool {
        self.dt > self.von_neumann_limit()
    }
}
