//! Domain-edge boundary conditions.

use std::f64::consts::PI;

use diff2d_arena::GhostGrid;
use diff2d_space::RankGeometry;

/// Value held on the ghost row at global row −1 (the "top" edge, owned
/// by rank 0).
///
/// The left, right and bottom edges are always zero; implementations
/// only choose the top edge.
pub trait BoundaryCondition: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Top-edge value at column centre `x` on step `step`.
    fn top_edge(&self, x: f64, step: u64, dt: f64) -> f64;
}

/// Zero on every edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ZeroDirichlet;

impl BoundaryCondition for ZeroDirichlet {
    fn name(&self) -> &'static str {
        "zero"
    }

    fn top_edge(&self, _x: f64, _step: u64, _dt: f64) -> f64 {
        0.0
    }
}

/// A travelling wave driven in through the top edge:
/// `sin(ω·t·dt − x/Ly·K·π)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForcedWave {
    omega: f64,
    k: f64,
    ly: f64,
}

impl ForcedWave {
    /// Wave of angular frequency `omega` and wavenumber `k` over a domain
    /// of height `ly`.
    pub fn new(omega: f64, k: f64, ly: f64) -> Self {
        Self { omega, k, ly }
    }

    /// Angular frequency.
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// Wavenumber.
    pub fn k(&self) -> f64 {
        self.k
    }
}

impl BoundaryCondition for ForcedWave {
    fn name(&self) -> &'static str {
        "forced-wave"
    }

    fn top_edge(&self, x: f64, step: u64, dt: f64) -> f64 {
        (self.omega * step as f64 * dt - x / self.ly * self.k * PI).sin()
    }
}

impl<B: BoundaryCondition + ?Sized> BoundaryCondition for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn top_edge(&self, x: f64, step: u64, dt: f64) -> f64 {
        (**self).top_edge(x, step, dt)
    }
}

/// Overwrite the edge ghosts of `field` for step `step`.
///
/// Ghost columns 0 and `nx + 1` are zeroed on every padded row. Then, on
/// the rank owning global row 0, ghost row 0 takes the top-edge value;
/// on the rank owning the last global row, ghost row `local_rows + 1` is
/// zeroed. Rows are written after columns, so the top-edge value wins at
/// the corners.
pub fn apply_edges<B: BoundaryCondition + ?Sized>(
    field: &mut GhostGrid,
    geometry: &RankGeometry,
    bc: &B,
    x_centres: &[f64],
    step: u64,
    dt: f64,
) {
    let last_col = field.padded_cols() - 1;
    for i in 0..field.padded_rows() {
        field.set(i, 0, 0.0);
        field.set(i, last_col, 0.0);
    }
    if geometry.is_top_edge() {
        for (cell, &x) in field.row_mut(0).iter_mut().zip(x_centres) {
            *cell = bc.top_edge(x, step, dt);
        }
    }
    if geometry.is_bottom_edge() {
        let last_row = field.padded_rows() - 1;
        field.row_mut(last_row).fill(0.0);
    }
}
