//! Settings file in, snapshot file out, text dump back.

use diff2d::dump::{dump_file, DumpShape};
use diff2d::prelude::*;
use diff2d_test_utils::{reference_settings, serial_reference, temp_output};

#[test]
fn run_then_dump_first_snapshot() {
    let ini = temp_output("e2e").with_extension("ini");
    let out = temp_output("e2e-out");
    std::fs::write(&ini, reference_settings(&out)).unwrap();

    let config = SimConfig::from_path(&ini).unwrap();
    let reports = run_local(&config, 3).unwrap();
    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|r| r.metrics.steps == config.grid.nt()));

    let mut text = Vec::new();
    let rows = dump_file(&out, &mut text, DumpShape { columns: 10, rows: Some(10) }).unwrap();
    assert_eq!(rows, 10);

    let serial = serial_reference(&config.grid, config.boundary_condition().as_ref());
    let printed: Vec<f64> = String::from_utf8(text)
        .unwrap()
        .split_whitespace()
        .map(|v| v.parse().unwrap())
        .collect();
    assert_eq!(printed.len(), 100);
    for (a, b) in printed.iter().zip(&serial.snapshots[0]) {
        assert!((a - b).abs() <= 1e-12);
    }

    let mut all = Vec::new();
    let total = dump_file(&out, &mut all, DumpShape { columns: 10, rows: None }).unwrap();
    assert_eq!(total as u64, 10 * config.grid.snapshot_count());

    std::fs::remove_file(&ini).unwrap();
    std::fs::remove_file(&out).unwrap();
}

#[test]
fn settings_errors_surface_before_any_rank_runs() {
    let ini = temp_output("e2e-bad").with_extension("ini");
    std::fs::write(&ini, "[diff2d]\nLX = 1\n").unwrap();
    assert!(matches!(
        SimConfig::from_path(&ini),
        Err(ConfigError::Settings(_))
    ));
    std::fs::remove_file(&ini).unwrap();
}
