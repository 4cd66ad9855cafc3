//! Laser Reflect - beam tracing core for a grid mirror puzzle
//!
//! Core modules:
//! - `sim`: Deterministic beam propagation (grid model, reflection, tracing, session)
//! - `settings`: Tunable trace and timing parameters
//! - `error`: Error type for fallible grid and session operations

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{PuzzleError, Result};
pub use settings::Settings;

use glam::IVec2;

/// Puzzle configuration constants
pub mod consts {
    /// Step ceiling is this factor times the cell count of the grid
    pub const STEP_CEILING_FACTOR: u32 = 2;
    /// Upper bound accepted for a configured step-ceiling factor
    pub const MAX_STEP_CEILING_FACTOR: u32 = 64;

    /// Largest accepted grid side length
    pub const MAX_GRID_SIZE: u32 = 4096;

    /// How long a fired beam stays on screen before input is re-enabled (seconds)
    pub const FIRE_DURATION_SECS: f32 = 2.0;
    /// Delay between a winning shot and the solved notification (seconds)
    pub const WIN_REVEAL_DELAY_SECS: f32 = 0.5;
}

/// Step ceiling for a square grid of the given side length
#[inline]
pub fn step_ceiling(size: u32, factor: u32) -> usize {
    let cells = (size as usize).saturating_mul(size as usize);
    cells.saturating_mul(factor as usize)
}

/// Whether `cell` lies inside a square grid of side `size`
#[inline]
pub fn in_bounds(cell: IVec2, size: u32) -> bool {
    let size = size as i64;
    (0..size).contains(&(cell.x as i64)) && (0..size).contains(&(cell.y as i64))
}
