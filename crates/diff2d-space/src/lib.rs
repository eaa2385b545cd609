//! Global grid geometry and slab decomposition for diff2d.
//!
//! [`GlobalGrid`] turns the physical parameters of a run (extents,
//! spacing, diffusivity, run time, output interval) into cell counts and
//! the time-step schedule, applying every startup check that does not
//! depend on the group size. [`RankGeometry`] then splits the `ny` grid
//! rows into one contiguous slab per rank.
//!
//! Both are pure functions of their inputs and immutable once built.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod slab;

pub use error::SpaceError;
pub use grid::{GlobalGrid, GridParams, FIT_TOLERANCE};
pub use slab::{decompose, RankGeometry};
