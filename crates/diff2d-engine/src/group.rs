//! Launching a whole group of ranks inside this process.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::thread;

use diff2d_core::{Rank, SnapshotSink, Transport};
use diff2d_transport::{LocalGroup, SharedFile};
use tracing::{error, info};

use crate::config::{ConfigError, SimConfig};
use crate::solver::{RankReport, RankSolver, SolverError};

/// Errors that stop a group run.
#[derive(Debug)]
pub enum RunError {
    /// The configuration cannot run on this many ranks.
    Config(ConfigError),
    /// The snapshot file could not be created.
    Output {
        /// Path of the file.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A rank thread could not be started.
    Spawn {
        /// The rank.
        rank: Rank,
        /// Underlying error.
        source: io::Error,
    },
    /// A rank stopped with an error.
    Rank {
        /// The rank.
        rank: Rank,
        /// What went wrong.
        source: SolverError,
    },
    /// A rank thread panicked.
    Panicked {
        /// The rank.
        rank: Rank,
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Output { path, source } => {
                write!(f, "cannot create output file {}: {source}", path.display())
            }
            Self::Spawn { rank, source } => write!(f, "cannot start rank {rank}: {source}"),
            Self::Rank { rank, source } => write!(f, "rank {rank}: {source}"),
            Self::Panicked { rank } => write!(f, "rank {rank} panicked"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Output { source, .. } => Some(source),
            Self::Spawn { source, .. } => Some(source),
            Self::Rank { source, .. } => Some(source),
            Self::Panicked { .. } => None,
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl RunError {
    /// Whether this is a secondary failure caused by another rank leaving.
    fn is_secondary(&self) -> bool {
        matches!(self, Self::Rank { source, .. } if source.is_peer_disconnect())
    }
}

/// Run `config` on `ranks` threads, writing snapshots to
/// `config.output`.
///
/// The file is created (and truncated) before any rank starts.
pub fn run_local(config: &SimConfig, ranks: usize) -> Result<Vec<RankReport>, RunError> {
    check_group(config, ranks)?;
    let file = SharedFile::create(&config.output).map_err(|source| RunError::Output {
        path: config.output.clone(),
        source,
    })?;
    run_with_sink(config, ranks, &file)
}

fn check_group(config: &SimConfig, ranks: usize) -> Result<(), RunError> {
    config.validate_group(ranks).map_err(|e| {
        error!("{e}");
        RunError::from(e)
    })
}

/// Run `config` on `ranks` threads, writing snapshots into `sink`.
///
/// Every rank gets its own thread, named `rank-<r>`. If any rank fails,
/// its peers see it disconnect and stop too; the error returned is the
/// first one that was not merely such a disconnect.
pub fn run_with_sink<S>(
    config: &SimConfig,
    ranks: usize,
    sink: &S,
) -> Result<Vec<RankReport>, RunError>
where
    S: SnapshotSink + Sync,
{
    check_group(config, ranks)?;
    info!(
        ranks,
        parallel = config.parallel,
        layout = %config.layout,
        output = %config.output.display(),
        "starting local group"
    );

    let results: Vec<Result<RankReport, RunError>> = thread::scope(|scope| {
        let handles: Vec<_> = LocalGroup::new(ranks)
            .into_transports()
            .into_iter()
            .map(|transport| {
                let rank = transport.rank();
                let handle = thread::Builder::new()
                    .name(format!("rank-{rank}"))
                    .spawn_scoped(scope, move || -> Result<RankReport, SolverError> {
                        RankSolver::new(config, transport, sink)?.run()
                    });
                (rank, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(rank, handle)| match handle {
                Err(source) => Err(RunError::Spawn { rank, source }),
                Ok(h) => match h.join() {
                    Ok(Ok(report)) => Ok(report),
                    Ok(Err(source)) => Err(RunError::Rank { rank, source }),
                    Err(_) => Err(RunError::Panicked { rank }),
                },
            })
            .collect()
    });

    let mut reports = Vec::with_capacity(ranks);
    let mut first_err: Option<RunError> = None;
    for result in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                let replace = match &first_err {
                    None => true,
                    Some(prev) => prev.is_secondary() && !e.is_secondary(),
                };
                if replace {
                    first_err = Some(e);
                }
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(reports),
    }
}
