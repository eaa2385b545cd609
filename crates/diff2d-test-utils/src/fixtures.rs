//! Settings fixtures.

use std::path::Path;

use diff2d_space::GridParams;

/// The 10×10 unit-square scenario: five steps, snapshots every three.
pub const REFERENCE_PARAMS: GridParams = GridParams {
    lx: 1.0,
    ly: 1.0,
    dx: 0.1,
    dy: 0.1,
    diffusivity: 1.0,
    runtime: 0.01,
    output_interval: 0.006,
};

/// Settings text for `params` writing to `output`, plus any `extra`
/// `KEY = value` lines in the same section.
pub fn scenario_settings(params: &GridParams, output: &Path, extra: &str) -> String {
    format!(
        "[diff2d]\nLX = {}\nLY = {}\nD = {}\nDX = {}\nDY = {}\nTIME = {}\nOUTPUT = {}\nOUTFILE = {}\n{extra}",
        params.lx,
        params.ly,
        params.diffusivity,
        params.dx,
        params.dy,
        params.runtime,
        params.output_interval,
        output.display(),
    )
}

/// [`scenario_settings`] for [`REFERENCE_PARAMS`].
pub fn reference_settings(output: &Path) -> String {
    scenario_settings(&REFERENCE_PARAMS, output, "")
}
