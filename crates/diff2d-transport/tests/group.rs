use std::thread;

use diff2d_core::{Rank, SnapshotSink, Tag, Transport, TransportError};
use diff2d_transport::{LocalGroup, LocalTransport, SharedFile};
use proptest::prelude::*;

const DOWN: Tag = Tag(13);
const UP: Tag = Tag(14);

/// Run `f` on every rank of a fresh group, one thread per rank.
fn on_each_rank<T, F>(size: usize, f: F) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(LocalTransport) -> T + Send + Sync + Copy + 'static,
{
    let handles: Vec<_> = LocalGroup::new(size)
        .into_transports()
        .into_iter()
        .map(|t| {
            thread::Builder::new()
                .name(format!("rank-{}", t.rank()))
                .spawn(move || f(t))
                .unwrap()
        })
        .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

/// Both halves of a chain exchange, as the halo protocol performs them.
fn chain_exchange(t: &LocalTransport) -> Result<(f64, f64), TransportError> {
    let r = t.rank().index();
    let down = r.checked_sub(1).map(Rank);
    let up = (r + 1 < t.size()).then(|| Rank(r + 1));
    let mine = [r as f64];
    let mut from_up = [-1.0];
    let mut from_down = [-1.0];
    t.sendrecv(&mine, down, DOWN, &mut from_up, up, DOWN)?;
    t.sendrecv(&mine, up, UP, &mut from_down, down, UP)?;
    Ok((from_down[0], from_up[0]))
}

#[test]
fn chain_exchange_does_not_deadlock() {
    for size in 1..=6 {
        let results = on_each_rank(size, |t| {
            let mut last = (0.0, 0.0);
            for _ in 0..50 {
                last = chain_exchange(&t).unwrap();
            }
            last
        });
        for (r, (from_down, from_up)) in results.into_iter().enumerate() {
            let expect_down = if r == 0 { -1.0 } else { (r - 1) as f64 };
            let expect_up = if r + 1 == size { -1.0 } else { (r + 1) as f64 };
            assert_eq!(from_down, expect_down, "rank {r} of {size}");
            assert_eq!(from_up, expect_up, "rank {r} of {size}");
        }
    }
}

#[test]
fn gather_collects_in_rank_order() {
    let results = on_each_rank(4, |t| t.gather(10 * t.rank().index() as u64 + 1, Rank(0)).unwrap());
    assert_eq!(results[0], vec![1, 11, 21, 31]);
    assert!(results[1..].iter().all(Vec::is_empty));
}

#[test]
fn failing_rank_tears_down_neighbours() {
    let results = on_each_rank(3, |t| {
        if t.rank() == Rank(1) {
            // Leaves before posting any exchange.
            return Ok((0.0, 0.0));
        }
        chain_exchange(&t)
    });
    assert!(results[1].is_ok());
    for r in [0, 2] {
        assert!(matches!(
            results[r],
            Err(TransportError::PeerDisconnected { peer: Rank(1) })
        ));
    }
}

#[test]
fn shared_file_disjoint_writes() {
    let path = std::env::temp_dir().join(format!("diff2d-transport-{}.bin", std::process::id()));
    let file = SharedFile::create(&path).unwrap();
    assert!(file.is_empty().unwrap());

    let writers: Vec<_> = (0..4u64)
        .map(|r| {
            let f = file.clone();
            thread::spawn(move || {
                let row = [r as f64; 4];
                f.write_at(r * 4 * 8, &row).unwrap();
            })
        })
        .collect();
    for w in writers {
        w.join().unwrap();
    }
    file.flush().unwrap();
    assert_eq!(file.len().unwrap(), 128);

    let bytes = std::fs::read(&path).unwrap();
    let values: Vec<f64> = bytes
        .chunks_exact(8)
        .map(|c| f64::from_ne_bytes(c.try_into().unwrap()))
        .collect();
    for (k, v) in values.iter().enumerate() {
        assert_eq!(*v, (k / 4) as f64);
    }

    let again = SharedFile::create(&path).unwrap();
    assert_eq!(again.len().unwrap(), 0);
    std::fs::remove_file(&path).unwrap();
}

/// Rows received from below and from above.
type ExchangedRows = Result<(Vec<f64>, Vec<f64>), TransportError>;

/// Row `k` of rank `r`'s outgoing message.
fn row_value(r: usize, k: usize) -> f64 {
    (1000 * r + k) as f64
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn chain_rows_arrive_from_the_right_neighbour(size in 1usize..8, width in 1usize..24) {
        let results = on_each_rank(size, move |t| -> ExchangedRows {
            let r = t.rank().index();
            let down = r.checked_sub(1).map(Rank);
            let up = (r + 1 < t.size()).then(|| Rank(r + 1));
            let mine: Vec<f64> = (0..width).map(|k| row_value(r, k)).collect();
            let mut from_up = vec![f64::NAN; width];
            let mut from_down = vec![f64::NAN; width];
            t.sendrecv(&mine, down, DOWN, &mut from_up, up, DOWN)?;
            t.sendrecv(&mine, up, UP, &mut from_down, down, UP)?;
            Ok((from_down, from_up))
        });
        for (r, result) in results.into_iter().enumerate() {
            let (from_down, from_up) = result.unwrap();
            if r == 0 {
                prop_assert!(from_down.iter().all(|v| v.is_nan()));
            } else {
                let expect: Vec<f64> = (0..width).map(|k| row_value(r - 1, k)).collect();
                prop_assert_eq!(from_down, expect);
            }
            if r + 1 == size {
                prop_assert!(from_up.iter().all(|v| v.is_nan()));
            } else {
                let expect: Vec<f64> = (0..width).map(|k| row_value(r + 1, k)).collect();
                prop_assert_eq!(from_up, expect);
            }
        }
    }

    #[test]
    fn rank_blocks_tile_the_file(size in 1usize..8, extra in 0usize..10, width in 1usize..16) {
        let rows = size + extra;
        let path = std::env::temp_dir().join(format!(
            "diff2d-transport-tile-{}-{size}-{rows}-{width}.bin",
            std::process::id()
        ));
        let file = SharedFile::create(&path).unwrap();

        let writers: Vec<_> = (0..size)
            .map(|r| {
                let f = file.clone();
                thread::spawn(move || {
                    let start = r * rows / size;
                    let end = (r + 1) * rows / size;
                    for g in start..end {
                        let row: Vec<f64> = (0..width).map(|k| row_value(g, k)).collect();
                        f.write_at((g * width * 8) as u64, &row).unwrap();
                    }
                })
            })
            .collect();
        for w in writers {
            w.join().unwrap();
        }

        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        prop_assert_eq!(bytes.len(), rows * width * 8);
        for (n, c) in bytes.chunks_exact(8).enumerate() {
            let v = f64::from_ne_bytes(c.try_into().unwrap());
            prop_assert_eq!(v, row_value(n / width, n % width));
        }
    }
}
