//! Error types for grid derivation and decomposition.

use std::fmt;

/// Errors arising from grid derivation or slab decomposition.
///
/// All of them are startup-time configuration errors: fatal for the
/// whole group, never retried.
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceError {
    /// A physical parameter is non-finite or not strictly positive.
    InvalidParameter {
        /// Settings key of the parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The run time is shorter than one time step.
    RuntimeTooShort {
        /// Requested run time.
        runtime: f64,
        /// Derived time step.
        dt: f64,
    },
    /// The output interval rounds to zero steps.
    OutputIntervalTooShort {
        /// Requested output interval.
        interval: f64,
        /// Derived time step.
        dt: f64,
    },
    /// A grid spacing does not divide its domain length within
    /// [`FIT_TOLERANCE`](crate::FIT_TOLERANCE).
    SpacingMismatch {
        /// Settings key of the spacing (`DX` or `DY`).
        spacing: &'static str,
        /// Settings key of the length (`LX` or `LY`).
        length: &'static str,
    },
    /// The grid has fewer rows than the group has ranks.
    TooFewRows {
        /// Number of grid rows.
        ny: usize,
        /// Number of ranks.
        size: usize,
    },
    /// A rank outside `0..size` was requested.
    RankOutOfRange {
        /// The requested rank.
        rank: usize,
        /// Size of the group.
        size: usize,
    },
    /// A group of zero ranks was requested.
    EmptyGroup,
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            Self::RuntimeTooShort { runtime, dt } => {
                write!(f, "runtime (TIME) is too short: {runtime} < dt = {dt}")
            }
            Self::OutputIntervalTooShort { interval, dt } => write!(
                f,
                "output interval (OUTPUT) is too short: {interval} rounds to zero steps of {dt}"
            ),
            Self::SpacingMismatch { spacing, length } => {
                write!(f, "{spacing} does not fit in {length}")
            }
            Self::TooFewRows { ny, size } => write!(
                f,
                "LY/DY not large enough for communicator size ({ny} rows, {size} ranks)"
            ),
            Self::RankOutOfRange { rank, size } => {
                write!(f, "rank {rank} is outside a group of size {size}")
            }
            Self::EmptyGroup => write!(f, "group must have at least one rank"),
        }
    }
}

impl std::error::Error for SpaceError {}
