//! Trace and timing settings
//!
//! Defaults come from `consts`; a JSON file may override any subset.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    FIRE_DURATION_SECS, MAX_STEP_CEILING_FACTOR, STEP_CEILING_FACTOR, WIN_REVEAL_DELAY_SECS,
};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Step ceiling is this factor times the grid's cell count
    pub step_ceiling_factor: u32,
    /// Seconds a fired beam stays visible before input is re-enabled
    pub fire_duration_secs: f32,
    /// Seconds between a winning shot and the solved event
    pub win_reveal_delay_secs: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            step_ceiling_factor: STEP_CEILING_FACTOR,
            fire_duration_secs: FIRE_DURATION_SECS,
            win_reveal_delay_secs: WIN_REVEAL_DELAY_SECS,
        }
    }
}

impl Settings {
    /// Step ceiling for a grid of side `size`
    pub fn step_ceiling(&self, size: u32) -> usize {
        crate::step_ceiling(size, self.step_ceiling_factor.min(MAX_STEP_CEILING_FACTOR))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Clamp timings to non-negative finite values and bound the ceiling factor
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.step_ceiling_factor > MAX_STEP_CEILING_FACTOR {
            log::warn!(
                "step_ceiling_factor {} clamped to {}",
                self.step_ceiling_factor,
                MAX_STEP_CEILING_FACTOR
            );
            self.step_ceiling_factor = MAX_STEP_CEILING_FACTOR;
        }
        if !self.fire_duration_secs.is_finite() || self.fire_duration_secs < 0.0 {
            self.fire_duration_secs = defaults.fire_duration_secs;
        }
        if !self.win_reveal_delay_secs.is_finite() || self.win_reveal_delay_secs < 0.0 {
            self.win_reveal_delay_secs = defaults.win_reveal_delay_secs;
        }
        self
    }
}
