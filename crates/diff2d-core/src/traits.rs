//! Capability traits for the process group and the shared output file.

use crate::error::TransportError;
use crate::id::{Rank, Tag, LEADER};

/// A fixed-size group of cooperating ranks.
///
/// One value of this trait exists per rank and is handed by reference to
/// every component that needs the group. Implementations decide how ranks
/// are hosted (threads, processes); the solver only relies on the
/// contract below.
///
/// # Contract
///
/// - `rank()` and `size()` never change over the life of the value.
/// - [`sendrecv`](Transport::sendrecv) performs one send and one receive
///   as a single paired operation. A `None` peer turns that half into a
///   no-op: nothing is sent, and the receive buffer is left untouched.
///   Because both halves are posted together, a chain of ranks that all
///   call `sendrecv` in the same order cannot deadlock.
/// - [`gather`](Transport::gather) is collective: every rank must call it
///   with the same `root`.
pub trait Transport {
    /// This rank's position in the group.
    fn rank(&self) -> Rank;

    /// Number of ranks in the group.
    fn size(&self) -> usize;

    /// Whether this rank is the group leader (rank 0).
    fn is_leader(&self) -> bool {
        self.rank() == LEADER
    }

    /// Send `send` to `to` under `send_tag` while receiving into `recv`
    /// from `from` under `recv_tag`.
    ///
    /// Blocks until the receive half completes (or immediately if `from`
    /// is `None`). The incoming message must match `recv_tag` and
    /// `recv.len()` exactly.
    fn sendrecv(
        &self,
        send: &[f64],
        to: Option<Rank>,
        send_tag: Tag,
        recv: &mut [f64],
        from: Option<Rank>,
        recv_tag: Tag,
    ) -> Result<(), TransportError>;

    /// Gather one scalar from every rank onto `root`.
    ///
    /// Returns the values in rank order on `root` and an empty vector on
    /// every other rank.
    fn gather(&self, value: u64, root: Rank) -> Result<Vec<u64>, TransportError>;
}

/// Direct-offset writer into the shared output file.
///
/// Ranks write disjoint byte ranges, so implementations need no locking
/// beyond what the operating system provides for positioned writes.
pub trait SnapshotSink {
    /// Write `data` as native-endian `f64`s starting at `byte_offset`.
    fn write_at(&self, byte_offset: u64, data: &[f64]) -> Result<(), TransportError>;

    /// Push buffered data to the operating system.
    fn flush(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn rank(&self) -> Rank {
        (**self).rank()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn sendrecv(
        &self,
        send: &[f64],
        to: Option<Rank>,
        send_tag: Tag,
        recv: &mut [f64],
        from: Option<Rank>,
        recv_tag: Tag,
    ) -> Result<(), TransportError> {
        (**self).sendrecv(send, to, send_tag, recv, from, recv_tag)
    }

    fn gather(&self, value: u64, root: Rank) -> Result<Vec<u64>, TransportError> {
        (**self).gather(value, root)
    }
}

impl<S: SnapshotSink + ?Sized> SnapshotSink for &S {
    fn write_at(&self, byte_offset: u64, data: &[f64]) -> Result<(), TransportError> {
        (**self).write_at(byte_offset, data)
    }

    fn flush(&self) -> Result<(), TransportError> {
        (**self).flush()
    }
}
