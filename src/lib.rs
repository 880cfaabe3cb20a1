//! Rail Dash - A three-lane endless runner
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (player motion, spawner, world, collisions)
//! - `projection`: Pseudo-3D lane/depth to screen mapping
//! - `tuning`: Data-driven game balance
//! - `settings`: Host preferences and debug flags
//! - `progress`: Best score / coin totals and their storage seam
//! - `audio`: Event to tone mapping for the host's sound backend

pub mod audio;
pub mod progress;
pub mod projection;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use progress::{Progress, ProgressStore};
pub use projection::{Projection, Projector, Viewport};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Reference frame length in ms; per-frame constants are scaled by `dt / FRAME_MS`
    pub const FRAME_MS: f32 = 16.0;
    /// Longest frame the simulation accepts in one call
    pub const MAX_FRAME_DT: f32 = 250.0;

    /// Number of lanes (indices 0..LANE_COUNT)
    pub const LANE_COUNT: u8 = 3;
    pub const CENTER_LANE: u8 = 1;

    /// Speed (depth units per frame)
    pub const BASE_SPEED: f32 = 8.0;
    pub const MAX_SPEED: f32 = 25.0;
    /// Speed gained per ms
    pub const ACCELERATION: f32 = 0.001;
    /// Effective speed multiplier while boosted
    pub const BOOST_FACTOR: f32 = 2.0;
    /// Score multiplier while the multiplier power-up is active
    pub const SCORE_MULTIPLIER: f64 = 2.0;
    /// Travel units per score point
    pub const SCORE_DIVISOR: f64 = 10.0;

    /// Player kinematics
    pub const JUMP_FORCE: f32 = 15.0;
    pub const GRAVITY: f32 = 0.8;
    pub const LANE_SWITCH_MS: f32 = 140.0;
    pub const LANE_SNAP_EPSILON: f32 = 0.05;
    pub const SLIDE_DURATION: f32 = 40.0; // frame units
    pub const SLIDE_VELOCITY: f32 = -10.0;

    /// Spawner cadence
    pub const SPAWN_INTERVAL_MS: f32 = 1500.0;
    pub const SPAWN_SPEED_FACTOR: f32 = 20.0;
    pub const SPAWN_INTERVAL_FLOOR_MS: f32 = 400.0;
    pub const SPAWN_HORIZON: f32 = 1000.0;

    /// Category weights (normalized at roll time)
    pub const HAZARD_WEIGHT: f32 = 0.55;
    pub const COIN_RUN_WEIGHT: f32 = 0.30;
    pub const POWERUP_WEIGHT: f32 = 0.15;

    /// Hazards
    pub const TRAIN_CHANCE: f32 = 0.5;
    pub const TRAIN_HEIGHT: f32 = 150.0;
    pub const TRAIN_LENGTH: f32 = 300.0;
    pub const TRAIN_CLEARANCE: f32 = 80.0;
    pub const APPROACHING_MIN_DISTANCE: f64 = 500.0;
    pub const APPROACHING_CHANCE: f32 = 0.3;
    pub const APPROACH_BONUS: f32 = 10.0;
    pub const BARRIER_LENGTH: f32 = 20.0;
    pub const BARRIER_LOW_HEIGHT: f32 = 40.0;
    pub const BARRIER_TALL_HEIGHT: f32 = 100.0;
    /// Barriers at or below this height are jumpable, above it slideable
    pub const BARRIER_LOW_THRESHOLD: f32 = 60.0;

    /// Coin runs
    pub const COIN_RUN_LEN: usize = 5;
    pub const COIN_SPACING: f32 = 40.0;
    pub const COIN_ARC_CHANCE: f32 = 0.25;

    /// World window
    pub const PRUNE_DEPTH: f32 = -100.0;
    pub const COLLISION_NEAR: f32 = 100.0;
    pub const LANE_TOLERANCE: f32 = 0.4;
    pub const TRAIN_LANE_TOLERANCE: f32 = 0.6;
    /// Phase advance for coins/power-ups (radians per ms)
    pub const PHASE_RATE: f32 = 0.005;

    /// Magnet
    pub const MAGNET_WINDOW: f32 = 400.0;
    pub const MAGNET_LANE_RATE: f32 = 0.1; // per frame
    pub const MAGNET_DEPTH_PULL: f32 = 6.0; // per frame

    /// Power-ups
    pub const POWERUP_DURATION_MS: f32 = 10_000.0;
    pub const SHIELD_SHAKE: f32 = 5.0;
    pub const SHAKE_DECAY: f32 = 0.1; // per frame

    /// Coin pickup sparkles
    pub const BURST_PARTICLES: usize = 8;
    /// Max offset change per frame along each axis
    pub const PARTICLE_SPEED: f32 = 10.0;
    pub const PARTICLE_FADE: f32 = 0.02; // life lost per frame
    pub const MAX_PARTICLES: usize = 256;

    /// Projection
    pub const DEPTH_HORIZON: f32 = 500.0;
    pub const HORIZON_RATIO: f32 = 0.4;
    pub const LANE_WIDTH: f32 = 120.0;
    pub const WIDTH_MULTIPLIER: f32 = 1.0;
}

/// Per-frame scale factor for a `dt` in ms
#[inline]
pub fn frame_scale(dt: f32) -> f32 {
    dt / consts::FRAME_MS
}

/// Clamp a continuous lane coordinate to the playable band
#[inline]
pub fn clamp_lane(lane: f32) -> f32 {
    lane.clamp(0.0, f32::from(consts::LANE_COUNT - 1))
}
