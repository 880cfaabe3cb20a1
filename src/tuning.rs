//! Data-driven game balance
//!
//! Every simulation constant a run reads goes through [`Tuning`]. Defaults come
//! from [`crate::consts`]; a JSON document may override any subset of fields.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance knobs for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Speed ===
    pub base_speed: f32,
    pub max_speed: f32,
    /// Speed gained per ms
    pub acceleration: f32,
    pub boost_factor: f32,
    pub score_multiplier: f64,
    /// Travel units per score point
    pub score_divisor: f64,

    // === Player ===
    pub jump_force: f32,
    pub gravity: f32,
    pub lane_switch_ms: f32,
    pub lane_snap_epsilon: f32,
    pub slide_duration: f32,
    pub slide_velocity: f32,

    // === Spawner ===
    pub spawn_interval_ms: f32,
    pub spawn_speed_factor: f32,
    pub spawn_interval_floor_ms: f32,
    pub spawn_horizon: f32,
    pub hazard_weight: f32,
    pub coin_run_weight: f32,
    pub powerup_weight: f32,
    pub train_chance: f32,
    pub train_height: f32,
    pub train_length: f32,
    pub barrier_length: f32,
    pub barrier_low_height: f32,
    pub barrier_tall_height: f32,
    /// Barriers at or below this height are jumpable, above it slideable
    pub barrier_low_threshold: f32,
    pub approaching_min_distance: f64,
    pub approaching_chance: f32,
    pub approach_bonus: f32,
    pub coin_run_len: usize,
    pub coin_spacing: f32,
    pub coin_arc_chance: f32,

    // === World ===
    pub prune_depth: f32,
    pub collision_near: f32,
    pub lane_tolerance: f32,
    pub train_lane_tolerance: f32,
    pub magnet_window: f32,
    pub magnet_lane_rate: f32,
    pub magnet_depth_pull: f32,
    pub train_clearance: f32,
    /// Coin/power-up spin, radians per ms
    pub phase_rate: f32,

    // === Power-ups ===
    pub powerup_duration_ms: f32,
    pub shield_shake: f32,
    pub shake_decay: f32,

    // === Particles ===
    pub burst_particles: usize,
    pub particle_speed: f32,
    pub particle_fade: f32,
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            max_speed: MAX_SPEED,
            acceleration: ACCELERATION,
            boost_factor: BOOST_FACTOR,
            score_multiplier: SCORE_MULTIPLIER,
            score_divisor: SCORE_DIVISOR,

            jump_force: JUMP_FORCE,
            gravity: GRAVITY,
            lane_switch_ms: LANE_SWITCH_MS,
            lane_snap_epsilon: LANE_SNAP_EPSILON,
            slide_duration: SLIDE_DURATION,
            slide_velocity: SLIDE_VELOCITY,

            spawn_interval_ms: SPAWN_INTERVAL_MS,
            spawn_speed_factor: SPAWN_SPEED_FACTOR,
            spawn_interval_floor_ms: SPAWN_INTERVAL_FLOOR_MS,
            spawn_horizon: SPAWN_HORIZON,
            hazard_weight: HAZARD_WEIGHT,
            coin_run_weight: COIN_RUN_WEIGHT,
            powerup_weight: POWERUP_WEIGHT,
            train_chance: TRAIN_CHANCE,
            train_height: TRAIN_HEIGHT,
            train_length: TRAIN_LENGTH,
            barrier_length: BARRIER_LENGTH,
            barrier_low_height: BARRIER_LOW_HEIGHT,
            barrier_tall_height: BARRIER_TALL_HEIGHT,
            barrier_low_threshold: BARRIER_LOW_THRESHOLD,
            approaching_min_distance: APPROACHING_MIN_DISTANCE,
            approaching_chance: APPROACHING_CHANCE,
            approach_bonus: APPROACH_BONUS,
            coin_run_len: COIN_RUN_LEN,
            coin_spacing: COIN_SPACING,
            coin_arc_chance: COIN_ARC_CHANCE,

            prune_depth: PRUNE_DEPTH,
            collision_near: COLLISION_NEAR,
            lane_tolerance: LANE_TOLERANCE,
            train_lane_tolerance: TRAIN_LANE_TOLERANCE,
            magnet_window: MAGNET_WINDOW,
            magnet_lane_rate: MAGNET_LANE_RATE,
            magnet_depth_pull: MAGNET_DEPTH_PULL,
            train_clearance: TRAIN_CLEARANCE,
            phase_rate: PHASE_RATE,

            powerup_duration_ms: POWERUP_DURATION_MS,
            shield_shake: SHIELD_SHAKE,
            shake_decay: SHAKE_DECAY,

            burst_particles: BURST_PARTICLES,
            particle_speed: PARTICLE_SPEED,
            particle_fade: PARTICLE_FADE,
            max_particles: MAX_PARTICLES,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document; missing fields keep defaults
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("invalid tuning JSON")?;
        Ok(tuning.sanitized())
    }

    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        let tuning = Self::from_json_str(&json)
            .with_context(|| format!("parsing tuning file {}", path.display()))?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Repair values that would break structural invariants
    pub fn sanitized(mut self) -> Self {
        self.base_speed = self.base_speed.max(0.0);
        self.max_speed = self.max_speed.max(self.base_speed);
        self.acceleration = self.acceleration.max(0.0);
        self.boost_factor = self.boost_factor.max(1.0);
        self.score_divisor = self.score_divisor.max(1e-3);
        self.lane_switch_ms = self.lane_switch_ms.max(1.0);
        self.lane_snap_epsilon = self.lane_snap_epsilon.clamp(1e-4, 0.5);
        self.gravity = self.gravity.max(0.0);
        self.slide_duration = self.slide_duration.max(0.0);
        self.spawn_interval_floor_ms = self.spawn_interval_floor_ms.max(1.0);
        self.hazard_weight = self.hazard_weight.max(0.0);
        self.coin_run_weight = self.coin_run_weight.max(0.0);
        self.powerup_weight = self.powerup_weight.max(0.0);
        self.train_chance = self.train_chance.clamp(0.0, 1.0);
        self.approaching_chance = self.approaching_chance.clamp(0.0, 1.0);
        self.coin_arc_chance = self.coin_arc_chance.clamp(0.0, 1.0);
        self.coin_run_len = self.coin_run_len.max(1);
        self.train_length = self.train_length.max(0.0);
        self.barrier_length = self.barrier_length.max(0.0);
        self.collision_near = self.collision_near.max(0.0);
        // Batches must appear beyond the hit window
        self.spawn_horizon = self.spawn_horizon.max(self.collision_near + 1.0);
        self.magnet_lane_rate = self.magnet_lane_rate.clamp(0.0, 1.0);
        self.powerup_duration_ms = self.powerup_duration_ms.max(0.0);
        self.shield_shake = self.shield_shake.max(0.0);
        // Shake has to reach zero eventually
        self.shake_decay = self.shake_decay.max(1e-3);
        self.particle_speed = self.particle_speed.max(0.0);
        // Particles have to die eventually
        self.particle_fade = self.particle_fade.max(1e-3);
        self
    }

    /// Milliseconds between spawn batches at the given speed
    ///
    /// Tightens as speed rises, never below the configured floor.
    pub fn spawn_interval(&self, speed: f32) -> f32 {
        (self.spawn_interval_ms - speed * self.spawn_speed_factor).max(self.spawn_interval_floor_ms)
    }

    pub fn is_low_barrier(&self, height: f32) -> bool {
        height <= self.barrier_low_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "max_speed": 40.0 }"#).unwrap();
        assert_eq!(tuning.max_speed, 40.0);
        assert_eq!(tuning.base_speed, BASE_SPEED);
        assert_eq!(tuning.coin_run_len, COIN_RUN_LEN);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Tuning::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_sanitize_max_below_base() {
        let tuning = Tuning::from_json_str(r#"{ "base_speed": 30.0, "max_speed": 10.0 }"#).unwrap();
        assert_eq!(tuning.max_speed, 30.0);
    }

    #[test]
    fn test_sanitize_rate_guards() {
        let tuning = Tuning::from_json_str(
            r#"{ "shake_decay": -1.0, "slide_duration": -5.0, "collision_near": -10.0, "spawn_horizon": 50.0 }"#,
        )
        .unwrap();
        assert!(tuning.shake_decay > 0.0);
        assert_eq!(tuning.slide_duration, 0.0);
        assert_eq!(tuning.collision_near, 0.0);
        assert!(tuning.spawn_horizon > tuning.collision_near);

        let tuning = Tuning::from_json_str(r#"{ "spawn_horizon": 50.0 }"#).unwrap();
        assert!(tuning.spawn_horizon > COLLISION_NEAR);
    }

    #[test]
    fn test_barrier_threshold_is_tunable() {
        let mut tuning = Tuning::default();
        assert!(tuning.is_low_barrier(BARRIER_LOW_HEIGHT));
        assert!(!tuning.is_low_barrier(BARRIER_TALL_HEIGHT));
        tuning.barrier_low_threshold = 120.0;
        assert!(tuning.is_low_barrier(BARRIER_TALL_HEIGHT));
    }

    #[test]
    fn test_spawn_interval_floor() {
        let tuning = Tuning::default();
        assert_eq!(tuning.spawn_interval(8.0), 1500.0 - 160.0);
        // Absurd speed would drive the raw formula negative
        assert_eq!(tuning.spawn_interval(500.0), SPAWN_INTERVAL_FLOOR_MS);
    }
}
