//! Run configuration and its validation.
//!
//! [`SimConfig`] is built once from a [`Settings`] file and shared by
//! reference with every rank. Grid derivation and every startup check
//! that does not depend on the group size happen here, before any rank
//! exists.

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use diff2d_space::{GlobalGrid, GridParams, SpaceError};
use diff2d_stencil::{BoundaryCondition, ForcedWave, ZeroDirichlet};

use crate::settings::{Settings, SettingsError};
use crate::snapshot::SnapshotLayout;

/// Section holding the solver's keys.
pub const SECTION: &str = "diff2d";

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while turning settings into a [`SimConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// A key is missing or malformed.
    Settings(SettingsError),
    /// Grid derivation or a startup check failed.
    Space(SpaceError),
    /// `OMEGA` is set but `K` is not.
    MissingWaveNumber,
    /// `LAYOUT` names no known layout.
    UnknownLayout {
        /// The rejected value.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settings(e) => write!(f, "settings: {e}"),
            Self::Space(e) => write!(f, "{e}"),
            Self::MissingWaveNumber => {
                write!(f, "forced boundary needs both {SECTION}.OMEGA and {SECTION}.K")
            }
            Self::UnknownLayout { value } => write!(
                f,
                "unknown snapshot layout {value:?} (expected \"compat\" or \"rowmajor\")"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Settings(e) => Some(e),
            Self::Space(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SettingsError> for ConfigError {
    fn from(e: SettingsError) -> Self {
        Self::Settings(e)
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

// ── Forcing ────────────────────────────────────────────────────────

/// Which boundary condition drives the top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Forcing {
    /// All edges held at zero.
    Zero,
    /// `sin(ω·t·dt − x/Ly·K·π)` on the top edge.
    Wave {
        /// Angular frequency (`OMEGA`).
        omega: f64,
        /// Wavenumber (`K`).
        k: f64,
    },
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Everything a rank needs to run, derived from the settings file.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Physical inputs as read.
    pub params: GridParams,
    /// Derived grid and schedule.
    pub grid: GlobalGrid,
    /// Path of the shared snapshot file (`OUTFILE`).
    pub output: PathBuf,
    /// Top-edge boundary condition.
    pub forcing: Forcing,
    /// Row pitch used when laying snapshots out on disk.
    pub layout: SnapshotLayout,
    /// Split the stencil update across the rayon pool.
    pub parallel: bool,
}

impl SimConfig {
    /// Build from parsed settings.
    ///
    /// Reads `diff2d.LX`, `LY`, `D`, `DX`, `DY` (defaults to `DX`),
    /// `TIME`, `OUTPUT`, `OUTFILE`, and the optional `OMEGA`, `K` and
    /// `LAYOUT`.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let key = |k: &str| format!("{SECTION}.{k}");

        let dx = settings.get_f64(&key("DX"))?;
        let params = GridParams {
            lx: settings.get_f64(&key("LX"))?,
            ly: settings.get_f64(&key("LY"))?,
            dx,
            dy: settings.get_opt_f64(&key("DY"))?.unwrap_or(dx),
            diffusivity: settings.get_f64(&key("D"))?,
            runtime: settings.get_f64(&key("TIME"))?,
            output_interval: settings.get_f64(&key("OUTPUT"))?,
        };
        let output = PathBuf::from(settings.get_str(&key("OUTFILE"))?);

        let forcing = match (
            settings.get_opt_f64(&key("OMEGA"))?,
            settings.get_opt_f64(&key("K"))?,
        ) {
            (None, _) => Forcing::Zero,
            (Some(omega), Some(k)) => Forcing::Wave { omega, k },
            (Some(_), None) => return Err(ConfigError::MissingWaveNumber),
        };

        let layout = match settings.get_str(&key("LAYOUT")) {
            Ok(raw) => raw.parse()?,
            Err(SettingsError::Missing { .. }) => SnapshotLayout::default(),
            Err(e) => return Err(e.into()),
        };

        let grid = GlobalGrid::derive(params)?;
        Ok(Self {
            params,
            grid,
            output,
            forcing,
            layout,
            parallel: false,
        })
    }

    /// Read the settings file at `path` and build from it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_settings(&Settings::from_path(path)?)
    }

    /// Replace the output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Turn the rayon update on or off.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check that the grid can be split over `size` ranks.
    pub fn validate_group(&self, size: usize) -> Result<(), ConfigError> {
        Ok(self.grid.check_group_size(size)?)
    }

    /// The boundary condition this run applies.
    pub fn boundary_condition(&self) -> Box<dyn BoundaryCondition> {
        match self.forcing {
            Forcing::Zero => Box::new(ZeroDirichlet),
            Forcing::Wave { omega, k } => Box::new(ForcedWave::new(omega, k, self.grid.ly())),
        }
    }
}
