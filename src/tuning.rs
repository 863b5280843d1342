//! Data-driven game balance
//!
//! Every gameplay constant flows through [`Tuning`] so levels can be rebalanced
//! from JSON without touching code. Missing fields fall back to [`crate::consts`].

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while reading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Viewport ===
    pub viewport_width: f32,
    pub wrap_margin: f32,

    // === Progress ===
    pub cull_distance: f32,
    pub fall_limit: f32,

    // === Parallax ===
    pub parallax_start: f32,
    pub background_divisor: f32,
    pub midground_divisor: f32,

    // === Collisions ===
    pub star_boost: f32,
    pub platform_bounce: f32,

    // === Physics ===
    pub gravity: f32,
    pub player_mass: f32,

    // === Player ===
    pub launch_impulse: f32,
    pub player_start: Vec2,
    pub tilt_speed: f32,

    // === Input ===
    pub tilt_sample_weight: f32,
    pub tilt_interval_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            wrap_margin: WRAP_MARGIN,

            cull_distance: CULL_DISTANCE,
            fall_limit: FALL_LIMIT,

            parallax_start: PARALLAX_START,
            background_divisor: BACKGROUND_DIVISOR,
            midground_divisor: MIDGROUND_DIVISOR,

            star_boost: STAR_BOOST,
            platform_bounce: PLATFORM_BOUNCE,

            gravity: GRAVITY,
            player_mass: PLAYER_MASS,

            launch_impulse: LAUNCH_IMPULSE,
            player_start: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            tilt_speed: TILT_SPEED,

            tilt_sample_weight: TILT_SAMPLE_WEIGHT,
            tilt_interval_ms: TILT_INTERVAL_MS,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read tuning overrides from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let text = fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&text)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Horizontal scale applied to authored level coordinates
    pub fn scale_x(&self) -> f32 {
        self.viewport_width / DESIGN_WIDTH
    }
}
