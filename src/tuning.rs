//! Gameplay tuning.
//!
//! Every number the simulation depends on lives here, grouped per concern.
//! Defaults reproduce the classic formation; a JSON document can override any
//! subset of fields.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, ensure};
use serde::{Deserialize, Serialize};

/// Environment variable naming an optional tuning file for the binary.
pub const TUNING_ENV_VAR: &str = "INVADERS_TUNING";

/// Grid layout shared by the three enemy classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridTuning {
    pub cols: usize,
    pub back_rows: usize,
    pub mid_rows: usize,
    pub front_rows: usize,
    /// Offset of the top-left cell.
    pub origin_x: f32,
    pub origin_y: f32,
    pub col_spacing: f32,
    pub row_spacing: f32,
}

impl Default for GridTuning {
    fn default() -> Self {
        Self {
            cols: 11,
            back_rows: 1,
            mid_rows: 2,
            front_rows: 2,
            origin_x: -0.5,
            origin_y: 0.5,
            col_spacing: 0.1,
            row_spacing: 0.1,
        }
    }
}

/// Formation motion and difficulty escalation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationTuning {
    /// Horizontal speed at session start, in units per second.
    pub initial_shift_factor: f32,
    pub shift_factor_increment: f32,
    pub max_shift_factor: f32,
    /// Step period at session start, in milliseconds.
    pub initial_tick_period_ms: f32,
    pub tick_period_decrement_ms: f32,
    pub min_tick_period_ms: f32,
    pub downward_shift: f32,
    /// Offsets at or past +/- this value trigger a reversal.
    pub reversal_bound: f32,
    /// Bottommost active y at or below this line ends the game.
    pub game_over_line: f32,
}

impl Default for FormationTuning {
    fn default() -> Self {
        Self {
            initial_shift_factor: 0.03,
            shift_factor_increment: 0.03,
            max_shift_factor: 0.15,
            initial_tick_period_ms: 650.0,
            tick_period_decrement_ms: 75.0,
            min_tick_period_ms: 300.0,
            downward_shift: 0.05,
            reversal_bound: 0.92,
            game_over_line: -0.87,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterTuning {
    pub offset_y: f32,
    pub travel_limit: f32,
    /// Input sampling cadence in milliseconds.
    pub sample_period_ms: f32,
    /// Distance travelled per 10 ms of held input.
    pub speed: f32,
    /// Ticks between consecutive shots while fire is held.
    pub fire_cooldown_ticks: u8,
    pub half_width: f32,
    pub height: f32,
}

impl Default for ShooterTuning {
    fn default() -> Self {
        Self {
            offset_y: -0.9,
            travel_limit: 0.9,
            sample_period_ms: 35.0,
            speed: 0.05,
            fire_cooldown_ticks: 8,
            half_width: 0.04,
            height: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Vertical distance per tick (not time scaled).
    pub velocity: f32,
    pub width: f32,
    pub height: f32,
    /// Projectiles whose anchor passes this y are retired.
    pub forward_bound: f32,
    pub max_projectiles: usize,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            velocity: 0.01,
            width: 0.01,
            height: 0.04,
            forward_bound: 1.0,
            max_projectiles: 20,
        }
    }
}

/// Root of all gameplay tuning.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub grid: GridTuning,
    pub formation: FormationTuning,
    pub shooter: ShooterTuning,
    pub projectile: ProjectileTuning,
}

impl Tuning {
    /// Reads a (possibly partial) JSON tuning document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read tuning file {}", path.display()))?;
        let tuning: Tuning = serde_json::from_str(&raw)
            .wrap_err_with(|| format!("failed to parse tuning file {}", path.display()))?;
        tuning
            .validate()
            .wrap_err_with(|| format!("invalid tuning in {}", path.display()))?;
        Ok(tuning)
    }

    /// Uses the file named by [`TUNING_ENV_VAR`] when set, defaults otherwise.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(TUNING_ENV_VAR) {
            Some(path) => {
                log::info!("loading tuning from {}", Path::new(&path).display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let g = &self.grid;
        ensure!(g.cols > 0, "grid must have at least one column");
        ensure!(
            g.back_rows + g.mid_rows + g.front_rows > 0,
            "grid must have at least one row"
        );

        let f = &self.formation;
        ensure!(
            f.min_tick_period_ms > 0.0,
            "min_tick_period_ms must be positive"
        );
        ensure!(
            f.initial_tick_period_ms >= f.min_tick_period_ms,
            "initial_tick_period_ms ({}) is below min_tick_period_ms ({})",
            f.initial_tick_period_ms,
            f.min_tick_period_ms
        );
        ensure!(
            f.tick_period_decrement_ms >= 0.0,
            "tick_period_decrement_ms must not be negative"
        );
        ensure!(
            f.initial_shift_factor <= f.max_shift_factor,
            "initial_shift_factor ({}) exceeds max_shift_factor ({})",
            f.initial_shift_factor,
            f.max_shift_factor
        );
        ensure!(
            f.shift_factor_increment >= 0.0,
            "shift_factor_increment must not be negative"
        );
        ensure!(f.reversal_bound > 0.0, "reversal_bound must be positive");

        let s = &self.shooter;
        ensure!(s.sample_period_ms > 0.0, "sample_period_ms must be positive");
        ensure!(s.travel_limit >= 0.0, "travel_limit must not be negative");

        ensure!(f.downward_shift > 0.0, "downward_shift must be positive");

        let p = &self.projectile;
        ensure!(p.width > 0.0 && p.height > 0.0, "projectile size must be positive");
        ensure!(p.max_projectiles > 0, "max_projectiles must be at least 1");
        Ok(())
    }
}
