//! Strongly-typed identifiers shared across the workspace.

use std::fmt;

/// Size in bytes of one field element on the wire and on disk (`f64`).
pub const ELEMENT_SIZE: u64 = std::mem::size_of::<f64>() as u64;

/// Position of a worker within its process group.
///
/// Ranks are dense: a group of size `n` has ranks `0..n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub usize);

/// The designated leader rank. Only the leader prints reports and
/// receives gathered values.
pub const LEADER: Rank = Rank(0);

impl Rank {
    /// The rank as a plain index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for Rank {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

/// Message tag carried by every point-to-point transfer.
///
/// A receive only accepts a message whose tag matches the one it posted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub u16);

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for Tag {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

/// Index of a time step, starting at 0 for the initial condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StepId(pub u64);

impl StepId {
    /// The following step.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
