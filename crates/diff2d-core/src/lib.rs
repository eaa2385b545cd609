//! Core types and traits for the diff2d diffusion solver.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers, error types, and the two capability traits every
//! other crate is written against:
//!
//! - [`Transport`]: rank/size identity, paired neighbour exchange and a
//!   root gather over a fixed-size process group.
//! - [`SnapshotSink`]: direct-offset writes of contiguous doubles into
//!   the one shared output file.
//!
//! Components receive these by reference; nothing in the workspace
//! reaches for a process-global communicator.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod traits;

pub use error::TransportError;
pub use id::{Rank, StepId, Tag, ELEMENT_SIZE, LEADER};
pub use traits::{SnapshotSink, Transport};
