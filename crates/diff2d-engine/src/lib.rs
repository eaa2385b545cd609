//! Run orchestration for diff2d.
//!
//! Turns a settings file into a [`SimConfig`], then runs one
//! [`RankSolver`] per rank. [`run_local`] hosts every rank as a thread of
//! the calling process and returns one [`RankReport`] per rank.
//!
//! # Logging
//!
//! All output goes through `tracing`:
//!
//! | Level | Event |
//! |-------|-------|
//! | `info` | decomposition summary and `t/nt` snapshot progress (leader only) |
//! | `warn` | time step above the explicit stability limit, or a `compat` row pitch that overlaps ranks (leader only) |
//! | `debug` | each rank's rows and neighbours at start, every snapshot block written |
//! | `error` | the error that stopped a rank, or a group-size mismatch |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod group;
pub mod metrics;
pub mod settings;
pub mod snapshot;
pub mod solver;
pub mod summary;

pub use config::{ConfigError, Forcing, SimConfig, SECTION};
pub use group::{run_local, run_with_sink, RunError};
pub use metrics::RunMetrics;
pub use settings::{Settings, SettingsError};
pub use snapshot::{SnapshotCursor, SnapshotError, SnapshotLayout, SnapshotWriter};
pub use solver::{RankReport, RankSolver, SolverError};
pub use summary::DecompositionSummary;
