//! Row-slab decomposition of the global grid.

use std::ops::Range;

use diff2d_core::Rank;
use smallvec::SmallVec;

use crate::error::SpaceError;

/// One rank's share of the global grid: a contiguous band of rows plus
/// the ranks that own the bands on either side.
///
/// Rank 0 owns the rows starting at global row 0 and has no neighbour
/// below it; the last rank owns the rows ending at `ny` and has no
/// neighbour above it. Boundaries follow the balanced split
/// `floor(rank · ny / size)`, so slab sizes differ by at most one row.
///
/// # Examples
///
/// ```
/// use diff2d_core::Rank;
/// use diff2d_space::RankGeometry;
///
/// let g = RankGeometry::new(10, Rank(1), 3).unwrap();
/// assert_eq!(g.global_row_offset(), 3);
/// assert_eq!(g.local_rows(), 3);
/// assert_eq!(g.neighbor_down(), Some(Rank(0)));
/// assert_eq!(g.neighbor_up(), Some(Rank(2)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankGeometry {
    rank: Rank,
    size: usize,
    local_rows: usize,
    global_row_offset: usize,
    neighbor_down: Option<Rank>,
    neighbor_up: Option<Rank>,
}

/// First global row owned by `rank`.
fn slab_start(ny: usize, rank: usize, size: usize) -> usize {
    // u128 keeps `rank * ny` exact for any usize inputs.
    ((rank as u128 * ny as u128) / size as u128) as usize
}

impl RankGeometry {
    /// Geometry of `rank` in a group of `size` ranks sharing `ny` rows.
    ///
    /// Fails if the group is empty, the rank is out of range, or there are
    /// fewer rows than ranks.
    pub fn new(ny: usize, rank: Rank, size: usize) -> Result<Self, SpaceError> {
        if size == 0 {
            return Err(SpaceError::EmptyGroup);
        }
        if rank.index() >= size {
            return Err(SpaceError::RankOutOfRange {
                rank: rank.index(),
                size,
            });
        }
        if ny < size {
            return Err(SpaceError::TooFewRows { ny, size });
        }

        let r = rank.index();
        let start = slab_start(ny, r, size);
        let end = slab_start(ny, r + 1, size);
        Ok(Self {
            rank,
            size,
            local_rows: end - start,
            global_row_offset: start,
            neighbor_down: r.checked_sub(1).map(Rank),
            neighbor_up: (r + 1 < size).then(|| Rank(r + 1)),
        })
    }

    /// This rank.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Number of ranks in the group.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of interior rows this rank owns.
    pub fn local_rows(&self) -> usize {
        self.local_rows
    }

    /// Global index of the first owned row.
    pub fn global_row_offset(&self) -> usize {
        self.global_row_offset
    }

    /// Rank owning the band below, `None` on rank 0.
    pub fn neighbor_down(&self) -> Option<Rank> {
        self.neighbor_down
    }

    /// Rank owning the band above, `None` on the last rank.
    pub fn neighbor_up(&self) -> Option<Rank> {
        self.neighbor_up
    }

    /// Whether this rank owns global row 0 (ghost row 0 is a domain edge).
    pub fn is_top_edge(&self) -> bool {
        self.neighbor_down.is_none()
    }

    /// Whether this rank owns global row `ny - 1` (ghost row
    /// `local_rows + 1` is a domain edge).
    pub fn is_bottom_edge(&self) -> bool {
        self.neighbor_up.is_none()
    }

    /// Live neighbours, down first.
    pub fn neighbours(&self) -> SmallVec<[Rank; 2]> {
        self.neighbor_down
            .into_iter()
            .chain(self.neighbor_up)
            .collect()
    }

    /// Global row indices owned by this rank.
    pub fn global_rows(&self) -> Range<usize> {
        self.global_row_offset..self.global_row_offset + self.local_rows
    }
}

/// Geometry of every rank of a `size`-rank group, in rank order.
pub fn decompose(ny: usize, size: usize) -> Result<Vec<RankGeometry>, SpaceError> {
    (0..size)
        .map(|r| RankGeometry::new(ny, Rank(r), size))
        .collect::<Result<Vec<_>, _>>()
        .and_then(|slabs| {
            if slabs.is_empty() {
                Err(SpaceError::EmptyGroup)
            } else {
                Ok(slabs)
            }
        })
}
