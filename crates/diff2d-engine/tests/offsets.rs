use diff2d_engine::{SnapshotCursor, SnapshotLayout};
use diff2d_space::{decompose, GlobalGrid, GridParams};
use proptest::prelude::*;

fn square(cells: usize) -> GlobalGrid {
    let side = cells as f64 * 0.25;
    GlobalGrid::derive(GridParams {
        lx: side,
        ly: side,
        dx: 0.25,
        dy: 0.25,
        diffusivity: 1.0,
        runtime: 1.0,
        output_interval: 0.1,
    })
    .unwrap()
}

fn arb_layout() -> impl Strategy<Value = SnapshotLayout> {
    prop_oneof![Just(SnapshotLayout::Compat), Just(SnapshotLayout::RowMajor)]
}

proptest! {
    #[test]
    fn rank_rows_tile_every_snapshot_exactly(
        cells in 1usize..40,
        size in 1usize..12,
        layout in arb_layout(),
        snapshots in 1u64..4,
    ) {
        prop_assume!(cells >= size);
        let grid = square(cells);
        let row_bytes = grid.nx() as u64 * 8;

        let mut starts = Vec::new();
        for geo in decompose(grid.ny(), size).unwrap() {
            let mut cursor = SnapshotCursor::new(&grid, &geo, layout);
            for k in 0..snapshots {
                for r in 0..geo.local_rows() {
                    prop_assert_eq!(cursor.row_offset(r), cursor.offset_of(k, r));
                    starts.push(cursor.row_offset(r));
                }
                cursor.advance();
            }
        }
        starts.sort_unstable();
        let expected: Vec<u64> = (0..snapshots * grid.ny() as u64).map(|k| k * row_bytes).collect();
        prop_assert_eq!(starts, expected);
    }

    #[test]
    fn cursor_starts_at_global_row_offset(cells in 1usize..40, size in 1usize..12) {
        prop_assume!(cells >= size);
        let grid = square(cells);
        for geo in decompose(grid.ny(), size).unwrap() {
            let cursor = SnapshotCursor::new(&grid, &geo, SnapshotLayout::Compat);
            prop_assert_eq!(cursor.offset(), (grid.nx() * geo.global_row_offset() * 8) as u64);
            prop_assert_eq!(cursor.stride(), grid.snapshot_bytes());
        }
    }
}
