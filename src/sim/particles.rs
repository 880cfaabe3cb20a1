//! Coin pickup sparkles
//!
//! Particles live in screen space relative to the player's anchor in the lane
//! where the pickup happened, so the host can project them with
//! [`crate::Projector::player_anchor`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::SpawnRng;
use crate::frame_scale;
use crate::tuning::Tuning;

/// A particle for visual effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Lane coordinate the burst is anchored to
    pub lane: f32,
    /// Offset from the anchor in pixels
    pub pos: Vec2,
    /// Offset change per frame
    pub vel: Vec2,
    pub life: f32, // 1 at spawn, gone at 0
}

/// Bounded particle pool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Particles {
    particles: Vec<Particle>,
}

impl Particles {
    /// Emit a burst at `lane`; stops at the `max_particles` cap
    pub fn burst(&mut self, lane: f32, rng: &mut SpawnRng, tuning: &Tuning) {
        let room = tuning.max_particles.saturating_sub(self.particles.len());
        for _ in 0..tuning.burst_particles.min(room) {
            let vel = Vec2::new(rng.unit() - 0.5, rng.unit() - 0.5) * tuning.particle_speed;
            self.particles.push(Particle {
                lane,
                pos: Vec2::ZERO,
                vel,
                life: 1.0,
            });
        }
    }

    /// Move and fade; dead particles are dropped
    pub fn advance(&mut self, dt: f32, tuning: &Tuning) {
        let f = frame_scale(dt);
        for p in &mut self.particles {
            p.pos += p.vel * f;
            p.life -= tuning.particle_fade * f;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
