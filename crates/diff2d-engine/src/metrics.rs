//! Per-rank run metrics.
//!
//! [`RunMetrics`] accumulates wall-clock time per phase of the time
//! loop. All durations are in microseconds.

use std::time::Instant;

/// Counters and timings for one rank's run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Time steps executed.
    pub steps: u64,
    /// Snapshots written.
    pub snapshots: u64,
    /// Bytes this rank wrote to the snapshot file.
    pub bytes_written: u64,
    /// Time spent applying edge boundary conditions.
    pub boundary_us: u64,
    /// Time spent in halo exchange, including waiting on neighbours.
    pub exchange_us: u64,
    /// Time spent in the stencil update.
    pub update_us: u64,
    /// Time spent writing snapshots.
    pub snapshot_us: u64,
    /// Wall-clock time of the whole run.
    pub total_us: u64,
}

impl RunMetrics {
    /// Mean stencil update time per step, in microseconds.
    pub fn mean_update_us(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.update_us as f64 / self.steps as f64
        }
    }
}

/// Microseconds elapsed since `start`, saturating.
pub(crate) fn elapsed_us(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = RunMetrics::default();
        assert_eq!(m.steps, 0);
        assert_eq!(m.snapshots, 0);
        assert_eq!(m.bytes_written, 0);
        assert_eq!(m.total_us, 0);
        assert_eq!(m.mean_update_us(), 0.0);
    }

    #[test]
    fn mean_update() {
        let m = RunMetrics {
            steps: 4,
            update_us: 10,
            ..Default::default()
        };
        assert_eq!(m.mean_update_us(), 2.5);
    }
}
