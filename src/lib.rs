//! Uber Jump - an endless vertical platformer
//!
//! Core modules:
//! - `sim`: Gameplay simulation (objects, contacts, run state machine)
//! - `level`: Pattern-based level layouts (loading and generation)
//! - `persistence`: High score and star count storage
//! - `platform`: Tilt input sampling and handoff
//! - `tuning`: Data-driven game balance
//!
//! Rendering, assets and sound playback are not part of this crate. The
//! presentation layer drives [`sim::RunController`] once per frame and reacts
//! to the [`sim::GameEvent`]s it queues.

pub mod level;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use level::{LevelData, LevelLayout, LoadError};
pub use persistence::PersistentState;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one step per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Width level x coordinates are authored against
    pub const DESIGN_WIDTH: f32 = 320.0;
    /// Default viewport width
    pub const VIEWPORT_WIDTH: f32 = 320.0;
    /// How far the player may leave the viewport before wrapping
    pub const WRAP_MARGIN: f32 = 20.0;

    /// Objects this far below the player are out of reach for good
    pub const CULL_DISTANCE: f32 = 300.0;
    /// Falling this far below the best height ends the run
    pub const FALL_LIMIT: f32 = 800.0;

    /// Height at which the layers start scrolling
    pub const PARALLAX_START: f32 = 200.0;
    pub const BACKGROUND_DIVISOR: f32 = 10.0;
    pub const MIDGROUND_DIVISOR: f32 = 4.0;

    /// Vertical velocity after collecting a star
    pub const STAR_BOOST: f32 = 400.0;
    /// Vertical velocity after landing on a platform
    pub const PLATFORM_BOUNCE: f32 = 250.0;

    /// Horizontal speed at full tilt
    pub const TILT_SPEED: f32 = 400.0;
    /// Weight of a fresh tilt sample in the moving average
    pub const TILT_SAMPLE_WEIGHT: f32 = 0.75;
    /// Tilt sampling interval
    pub const TILT_INTERVAL_MS: u64 = 200;

    /// Upward impulse applied on the first tap
    pub const LAUNCH_IMPULSE: f32 = 20.0;
    pub const PLAYER_START_X: f32 = 160.0;
    pub const PLAYER_START_Y: f32 = 80.0;

    /// Gravity for the reference integrator (-2 m/s² at 150 points per meter)
    pub const GRAVITY: f32 = -300.0;
    pub const PLAYER_MASS: f32 = 0.05;
}
