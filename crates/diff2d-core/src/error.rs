//! Error types for the process-group transport.
//!
//! Every failure of a point-to-point transfer, a gather, or a shared-file
//! write maps to one [`TransportError`]. None of them are retried: the
//! caller propagates the error and the rank exits, which in turn
//! disconnects it from its peers and tears the group down.

use std::error::Error;
use std::fmt;
use std::io;

use crate::id::{Rank, Tag};

/// Errors from [`Transport`](crate::Transport) and
/// [`SnapshotSink`](crate::SnapshotSink) operations.
#[derive(Debug)]
pub enum TransportError {
    /// The peer left the group (its end of the channel was dropped)
    /// before the expected message arrived.
    PeerDisconnected {
        /// The rank that went away.
        peer: Rank,
    },
    /// A message arrived with a different tag than the receive posted.
    TagMismatch {
        /// Sender of the message.
        peer: Rank,
        /// Tag the receive was waiting for.
        expected: Tag,
        /// Tag the message carried.
        found: Tag,
    },
    /// A message arrived with a different element count than the
    /// receive buffer holds.
    LengthMismatch {
        /// Sender of the message.
        peer: Rank,
        /// Length of the receive buffer.
        expected: usize,
        /// Length of the incoming payload.
        found: usize,
    },
    /// A message of the wrong kind arrived (e.g. a gathered scalar where
    /// a row was expected).
    UnexpectedMessage {
        /// Sender of the message.
        peer: Rank,
        /// What was expected instead.
        reason: String,
    },
    /// A rank outside `0..size` was named as a peer or root.
    InvalidRank {
        /// The offending rank.
        rank: Rank,
        /// Size of the group.
        size: usize,
    },
    /// Writing to the shared output file failed.
    Io {
        /// Byte offset of the failed write.
        offset: u64,
        /// The underlying I/O error.
        source: io::Error,
    },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeerDisconnected { peer } => write!(f, "rank {peer} disconnected"),
            Self::TagMismatch {
                peer,
                expected,
                found,
            } => write!(
                f,
                "message from rank {peer} has tag {found}, expected {expected}"
            ),
            Self::LengthMismatch {
                peer,
                expected,
                found,
            } => write!(
                f,
                "message from rank {peer} has {found} elements, expected {expected}"
            ),
            Self::UnexpectedMessage { peer, reason } => {
                write!(f, "unexpected message from rank {peer}: {reason}")
            }
            Self::InvalidRank { rank, size } => {
                write!(f, "rank {rank} is outside a group of size {size}")
            }
            Self::Io { offset, source } => {
                write!(f, "write at byte offset {offset} failed: {source}")
            }
        }
    }
}

impl Error for TransportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
