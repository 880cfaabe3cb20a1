//! Player lane interpolation and vertical kinematics

use serde::{Deserialize, Serialize};

use super::entity::Lane;
use crate::frame_scale;
use crate::tuning::Tuning;

/// Maximum number of lane samples kept for the motion trail
pub const TRAIL_LENGTH: usize = 12;

/// Player posture and position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Lane the player is moving toward
    pub target_lane: Lane,
    /// Continuous lane position, converges on `target_lane`
    pub lane_x: f32,
    /// Height above the track (never negative)
    pub vertical_offset: f32,
    pub vertical_velocity: f32,
    pub is_jumping: bool,
    pub is_sliding: bool,
    /// Frame units of slide left
    pub slide_time_remaining: f32,
    /// Recent lane positions for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<f32>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            target_lane: Lane::CENTER,
            lane_x: Lane::CENTER.as_f32(),
            vertical_offset: 0.0,
            vertical_velocity: 0.0,
            is_jumping: false,
            is_sliding: false,
            slide_time_remaining: 0.0,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }
}

impl Player {
    /// Retarget one lane left (`dir < 0`) or right; no-op at the boundary
    pub fn request_lane_change(&mut self, dir: i32) {
        self.target_lane = self.target_lane.shifted(dir.signum());
    }

    /// Start a jump. Returns false (and does nothing) if already airborne.
    pub fn request_jump(&mut self, tuning: &Tuning) -> bool {
        if self.is_jumping {
            return false;
        }
        self.is_jumping = true;
        self.is_sliding = false;
        self.slide_time_remaining = 0.0;
        self.vertical_velocity = tuning.jump_force;
        true
    }

    /// Start (or restart) a slide, cancelling any jump
    pub fn request_slide(&mut self, tuning: &Tuning) {
        self.is_sliding = true;
        self.slide_time_remaining = tuning.slide_duration;
        self.is_jumping = false;
        self.vertical_velocity = tuning.slide_velocity;
    }

    /// Integrate one frame of `dt` ms
    pub fn advance(&mut self, dt: f32, tuning: &Tuning) {
        let f = frame_scale(dt);

        // Lane convergence, capped so a long frame cannot overshoot
        let target = self.target_lane.as_f32();
        let blend = (dt / tuning.lane_switch_ms).min(1.0);
        self.lane_x += (target - self.lane_x) * blend;
        if (target - self.lane_x).abs() < tuning.lane_snap_epsilon {
            self.lane_x = target;
        }

        // Semi-implicit Euler
        if self.is_jumping {
            self.vertical_offset += self.vertical_velocity * f;
            self.vertical_velocity -= tuning.gravity * f;
            if self.vertical_offset <= 0.0 {
                self.vertical_offset = 0.0;
                self.vertical_velocity = 0.0;
                self.is_jumping = false;
            }
        } else if self.vertical_offset > 0.0 {
            // Slide cancelled a jump mid-air: drop back onto the track
            self.vertical_offset = (self.vertical_offset + self.vertical_velocity.min(0.0) * f).max(0.0);
        }

        if self.is_sliding {
            self.slide_time_remaining -= f;
            if self.slide_time_remaining <= 0.0 {
                self.slide_time_remaining = 0.0;
                self.is_sliding = false;
            }
        }
        if !self.is_jumping && self.vertical_offset == 0.0 {
            self.vertical_velocity = 0.0;
        }

        self.record_trail();
    }

    fn record_trail(&mut self) {
        self.trail.insert(0, self.lane_x);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }
}
