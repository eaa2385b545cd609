//! diff2d: an explicit 2D diffusion solver over a slab-decomposed grid.
//!
//! This is the facade crate. It re-exports the sub-crates, carries the
//! snapshot [`dump`] reader used by `double2ascii`, and the shared
//! logging setup for both binaries.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use diff2d::prelude::*;
//!
//! let config = SimConfig::from_path("diff2d.ini")?;
//! let reports = run_local(&config, 4)?;
//! for report in &reports {
//!     println!("{}: {} steps", report.rank, report.metrics.steps);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `diff2d-core` | ids, `Transport`, `SnapshotSink`, `TransportError` |
//! | [`space`] | `diff2d-space` | grid derivation and slab decomposition |
//! | [`arena`] | `diff2d-arena` | ghosted field storage and the ping-pong pair |
//! | [`transport`] | `diff2d-transport` | in-process rank group and the shared output file |
//! | [`stencil`] | `diff2d-stencil` | boundary conditions, halo exchange, FTCS update |
//! | [`engine`] | `diff2d-engine` | settings, config, snapshot writer, solver loop, launcher |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dump;
pub mod logging;

/// Identifiers, capability traits and transport errors (`diff2d-core`).
pub use diff2d_core as types;

/// Grid derivation and slab decomposition (`diff2d-space`).
pub use diff2d_space as space;

/// Ghosted field storage (`diff2d-arena`).
pub use diff2d_arena as arena;

/// In-process rank group and shared output file (`diff2d-transport`).
pub use diff2d_transport as transport;

/// Numerical kernel (`diff2d-stencil`).
pub use diff2d_stencil as stencil;

/// Configuration, snapshot output and the time loop (`diff2d-engine`).
pub use diff2d_engine as engine;

/// Common imports for running a simulation.
pub mod prelude {
    pub use diff2d_core::{Rank, SnapshotSink, Transport, TransportError};
    pub use diff2d_space::{GlobalGrid, GridParams, RankGeometry, SpaceError};
    pub use diff2d_stencil::{BoundaryCondition, ForcedWave, ZeroDirichlet};
    pub use diff2d_engine::{
        run_local, run_with_sink, ConfigError, RankReport, RunError, RunMetrics, Settings,
        SimConfig, SnapshotLayout,
    };
}
