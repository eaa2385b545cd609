//! Numerical kernel of diff2d.
//!
//! One time step on one rank is, in order:
//!
//! 1. [`apply_edges`]: zero the ghost columns and set the ghost rows that
//!    lie on the physical domain edge from a [`BoundaryCondition`].
//! 2. [`exchange_halos`]: refresh the remaining ghost rows from the
//!    neighbouring ranks.
//! 3. [`FtcsStencil::apply`] (or [`FtcsStencil::apply_parallel`]): write
//!    the next state of every owned cell from the current one.
//!
//! [`initial_condition`] builds the starting field, ghosts included.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod ftcs;
pub mod halo;
pub mod initial;

pub use boundary::{apply_edges, BoundaryCondition, ForcedWave, ZeroDirichlet};
pub use ftcs::FtcsStencil;
pub use halo::{exchange_halos, HALO_TAG_DOWN, HALO_TAG_UP};
pub use initial::{cell_centres_x, cell_centres_y, initial_condition, initial_value};
