//! Ghosted field storage for diff2d.
//!
//! Each rank holds its slab of the field as a [`GhostGrid`]: the owned
//! `local_rows × nx` cells surrounded by a margin of [`GHOST_WIDTH`]
//! cells on every side. Column margins carry the Dirichlet boundary;
//! row margins carry either a neighbour's halo row or the domain-edge
//! boundary value.
//!
//! The time integrator reads one grid and writes the other. [`FieldPair`]
//! owns both and swaps their roles in O(1):
//!
//! ```text
//! FieldPair
//! ├── grids[prev]      ←─── read by the stencil, exchanged, written to disk
//! └── grids[1 - prev]  ←─── written by the stencil, becomes prev on swap()
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod ghost;
pub mod pingpong;

pub use error::ArenaError;
pub use ghost::{GhostGrid, GHOST_WIDTH};
pub use pingpong::FieldPair;
