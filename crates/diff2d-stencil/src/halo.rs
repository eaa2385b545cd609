//! Ghost-row exchange between vertically adjacent ranks.

use diff2d_arena::GhostGrid;
use diff2d_core::{Tag, Transport, TransportError};
use diff2d_space::RankGeometry;

/// Tag of the transfer that moves each rank's first owned row down to
/// the rank below.
pub const HALO_TAG_DOWN: Tag = Tag(13);

/// Tag of the transfer that moves each rank's last owned row up to the
/// rank above.
pub const HALO_TAG_UP: Tag = Tag(14);

/// Refresh both ghost rows of `field` from the neighbouring ranks.
///
/// Two paired transfers, full padded row width each:
///
/// ```text
/// row 1           -> neighbor_down   |  row local_rows+1 <- neighbor_up    (tag 13)
/// row local_rows  -> neighbor_up     |  row 0            <- neighbor_down  (tag 14)
/// ```
///
/// On an edge rank the missing neighbour makes that half a no-op, leaving
/// the edge ghost row as [`apply_edges`](crate::apply_edges) set it.
pub fn exchange_halos<T: Transport + ?Sized>(
    field: &mut GhostGrid,
    geometry: &RankGeometry,
    transport: &T,
) -> Result<(), TransportError> {
    let n = geometry.local_rows();

    let (send, recv) = field.row_pair_mut(1, n + 1);
    transport.sendrecv(
        send,
        geometry.neighbor_down(),
        HALO_TAG_DOWN,
        recv,
        geometry.neighbor_up(),
        HALO_TAG_DOWN,
    )?;

    let (send, recv) = field.row_pair_mut(n, 0);
    transport.sendrecv(
        send,
        geometry.neighbor_up(),
        HALO_TAG_UP,
        recv,
        geometry.neighbor_down(),
        HALO_TAG_UP,
    )
}
