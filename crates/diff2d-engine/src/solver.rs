//! The per-rank time loop.
//!
//! Each iteration of [`RankSolver::step`] runs, in order:
//!
//! 1. snapshot of `prev`, when the step is on the output cadence
//! 2. edge boundary conditions on `prev`
//! 3. halo exchange of `prev`'s ghost rows
//! 4. stencil update `prev → now`
//! 5. swap
//!
//! After the last step one more snapshot is written if the final step
//! count is itself on the cadence.

use std::error::Error;
use std::fmt;
use std::time::Instant;

use diff2d_arena::{ArenaError, FieldPair, GhostGrid};
use diff2d_core::{Rank, SnapshotSink, StepId, Transport, TransportError, LEADER};
use diff2d_space::{GlobalGrid, RankGeometry, SpaceError};
use diff2d_stencil::{
    apply_edges, cell_centres_x, exchange_halos, initial_condition, BoundaryCondition,
    FtcsStencil,
};
use tracing::{debug, error, info, warn};

use crate::config::SimConfig;
use crate::metrics::{elapsed_us, RunMetrics};
use crate::snapshot::{SnapshotError, SnapshotLayout, SnapshotWriter};
use crate::summary::DecompositionSummary;

/// Errors that stop a rank.
#[derive(Debug)]
pub enum SolverError {
    /// This rank's geometry could not be derived.
    Space(SpaceError),
    /// Field storage could not be built.
    Arena(ArenaError),
    /// A halo exchange or gather failed.
    Transport(TransportError),
    /// A snapshot could not be written.
    Snapshot(SnapshotError),
}

impl SolverError {
    /// Whether this rank only failed because a peer went away first.
    pub fn is_peer_disconnect(&self) -> bool {
        matches!(
            self,
            Self::Transport(TransportError::PeerDisconnected { .. })
        )
    }
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(e) => write!(f, "decomposition: {e}"),
            Self::Arena(e) => write!(f, "field: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Snapshot(e) => write!(f, "snapshot: {e}"),
        }
    }
}

impl Error for SolverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            Self::Arena(e) => Some(e),
            Self::Transport(e) => Some(e),
            Self::Snapshot(e) => Some(e),
        }
    }
}

impl From<SpaceError> for SolverError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<ArenaError> for SolverError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

impl From<TransportError> for SolverError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<SnapshotError> for SolverError {
    fn from(e: SnapshotError) -> Self {
        Self::Snapshot(e)
    }
}

/// Outcome of one rank's completed run.
#[derive(Clone, Debug)]
pub struct RankReport {
    /// The rank.
    pub rank: Rank,
    /// Its slab.
    pub geometry: RankGeometry,
    /// Counters and timings.
    pub metrics: RunMetrics,
    /// Final state of the slab, ghosts included.
    pub field: GhostGrid,
}

/// One rank's share of the simulation.
pub struct RankSolver<T, S> {
    grid: GlobalGrid,
    geometry: RankGeometry,
    stencil: FtcsStencil,
    bc: Box<dyn BoundaryCondition>,
    x_centres: Vec<f64>,
    field: FieldPair,
    writer: SnapshotWriter<S>,
    transport: T,
    layout: SnapshotLayout,
    parallel: bool,
    step: StepId,
    metrics: RunMetrics,
}

impl<T: Transport, S: SnapshotSink> RankSolver<T, S> {
    /// Set up this rank: derive its slab, build the initial field, and
    /// position its snapshot cursor.
    pub fn new(config: &SimConfig, transport: T, sink: S) -> Result<Self, SolverError> {
        let grid = config.grid;
        let geometry = RankGeometry::new(grid.ny(), transport.rank(), transport.size())?;
        let field = FieldPair::new(initial_condition(&grid, &geometry)?);
        Ok(Self {
            stencil: FtcsStencil::new(&grid),
            bc: config.boundary_condition(),
            x_centres: cell_centres_x(&grid),
            field,
            writer: SnapshotWriter::new(sink, &grid, &geometry, config.layout),
            transport,
            layout: config.layout,
            parallel: config.parallel,
            step: StepId::default(),
            metrics: RunMetrics::default(),
            grid,
            geometry,
        })
    }

    /// This rank's slab.
    pub fn geometry(&self) -> &RankGeometry {
        &self.geometry
    }

    /// Index of the next step to run.
    pub fn current_step(&self) -> StepId {
        self.step
    }

    /// Current state of the slab.
    pub fn field(&self) -> &GhostGrid {
        self.field.prev()
    }

    /// Metrics so far.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Whether every step has run.
    pub fn is_finished(&self) -> bool {
        self.step.0 >= self.grid.nt()
    }

    fn snapshot(&mut self) -> Result<(), SolverError> {
        let t = self.step.0;
        if self.transport.is_leader() {
            info!("{t}/{}", self.grid.nt());
        }
        let start = Instant::now();
        let offset = self.writer.write(self.field.prev())?;
        self.metrics.snapshot_us += elapsed_us(start);
        self.metrics.snapshots = self.writer.snapshots();
        self.metrics.bytes_written = self.writer.bytes_written();
        debug!(rank = %self.geometry.rank(), step = t, offset, "snapshot written");
        Ok(())
    }

    /// Run one iteration of the time loop.
    pub fn step(&mut self) -> Result<(), SolverError> {
        let t = self.step.0;
        if self.grid.is_snapshot_step(t) {
            self.snapshot()?;
        }

        let start = Instant::now();
        apply_edges(
            self.field.prev_mut(),
            &self.geometry,
            &self.bc,
            &self.x_centres,
            t,
            self.grid.dt(),
        );
        self.metrics.boundary_us += elapsed_us(start);

        let start = Instant::now();
        exchange_halos(self.field.prev_mut(), &self.geometry, &self.transport)?;
        self.metrics.exchange_us += elapsed_us(start);

        let start = Instant::now();
        let (prev, now) = self.field.split();
        if self.parallel {
            self.stencil.apply_parallel(prev, now);
        } else {
            self.stencil.apply(prev, now);
        }
        self.field.swap();
        self.metrics.update_us += elapsed_us(start);

        self.step = self.step.next();
        self.metrics.steps += 1;
        Ok(())
    }

    fn report_decomposition(&self) -> Result<(), SolverError> {
        debug!(
            rank = %self.geometry.rank(),
            rows = ?self.geometry.global_rows(),
            neighbours = ?self.geometry.neighbours(),
            "slab ready"
        );
        let rows = self
            .transport
            .gather(self.geometry.local_rows() as u64, LEADER)?;
        if self.transport.is_leader() {
            info!("{}", DecompositionSummary::new(&self.grid, rows));
            if self.grid.exceeds_stability_limit() {
                warn!(
                    dt = self.grid.dt(),
                    limit = self.grid.von_neumann_limit(),
                    "time step exceeds the explicit stability limit"
                );
            }
            if !self.layout.tiles(&self.grid) {
                warn!(
                    layout = %self.layout,
                    nx = self.grid.nx(),
                    ny = self.grid.ny(),
                    "row pitch differs from nx; snapshot rows of neighbouring ranks overlap"
                );
            }
        }
        Ok(())
    }

    fn run_inner(&mut self) -> Result<(), SolverError> {
        self.report_decomposition()?;
        while !self.is_finished() {
            self.step()?;
        }
        if self.grid.is_snapshot_step(self.step.0) {
            self.snapshot()?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Run every remaining step, write the final snapshot if due, and
    /// flush the sink.
    pub fn run(mut self) -> Result<RankReport, SolverError> {
        let start = Instant::now();
        if let Err(e) = self.run_inner() {
            if !e.is_peer_disconnect() {
                error!(rank = %self.geometry.rank(), "{e}");
            }
            return Err(e);
        }
        self.metrics.total_us = elapsed_us(start);
        Ok(RankReport {
            rank: self.geometry.rank(),
            geometry: self.geometry,
            metrics: self.metrics,
            field: self.field.into_prev(),
        })
    }
}
