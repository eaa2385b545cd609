//! Transport backends for diff2d.
//!
//! - [`LocalGroup`] builds a group of [`LocalTransport`]s, one per rank,
//!   for ranks hosted as threads of one process. Every ordered pair of
//!   ranks gets its own unbounded channel, so sends never block and a
//!   paired send/receive can only wait on the receive half.
//! - [`SharedFile`] is the output file every rank writes into at
//!   disjoint byte offsets.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod file;
pub mod local;

pub use file::SharedFile;
pub use local::{LocalGroup, LocalTransport};
