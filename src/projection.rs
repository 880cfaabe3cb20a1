//! Pseudo-3D perspective projection
//!
//! Maps a (lane, depth) pair onto the screen. The same formula drives draw
//! order, entity placement, train rear faces and the player trail.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEPTH_HORIZON, HORIZON_RATIO, LANE_WIDTH, WIDTH_MULTIPLIER};
use crate::sim::{Entity, EntityKind, Particle};

/// Screen-space placement of a point on the track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub pos: Vec2,
    /// 1 at depth 0, falls toward 0 at the horizon
    pub scale: f32,
}

/// Drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Horizon line as a fraction of height from the top
    pub horizon_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            horizon_ratio: HORIZON_RATIO,
        }
    }

    #[inline]
    pub fn horizon_y(&self) -> f32 {
        self.height * self.horizon_ratio
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }
}

/// One entity laid out for drawing
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    pub entity: &'a Entity,
    pub front: Projection,
    /// Trains only: back face at `depth + length`
    pub rear: Option<Projection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projector {
    pub viewport: Viewport,
    pub lane_width: f32,
    /// Depth at which scale halves
    pub depth_horizon: f32,
    pub width_multiplier: f32,
}

impl Projector {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lane_width: LANE_WIDTH,
            depth_horizon: DEPTH_HORIZON,
            width_multiplier: WIDTH_MULTIPLIER,
        }
    }

    #[inline]
    pub fn scale_at(&self, depth: f32) -> f32 {
        1.0 / (depth / self.depth_horizon + 1.0)
    }

    pub fn project(&self, lane: f32, depth: f32) -> Projection {
        let scale = self.scale_at(depth);
        let horizon_y = self.viewport.horizon_y();
        let x = self.viewport.center_x() + (lane - 1.0) * self.lane_width * scale * self.width_multiplier;
        let y = horizon_y + (self.viewport.height - horizon_y) * scale;
        Projection {
            pos: Vec2::new(x, y),
            scale,
        }
    }

    /// True if the point sits above the horizon line (renderers skip these)
    pub fn above_horizon(&self, p: &Projection) -> bool {
        p.pos.y < self.viewport.horizon_y()
    }

    /// Entities far-to-near, so nearer ones draw on top
    pub fn layout<'a>(&self, entities: &'a [Entity]) -> Vec<DrawItem<'a>> {
        let mut items: Vec<DrawItem<'a>> = entities
            .iter()
            .map(|e| DrawItem {
                entity: e,
                front: self.project(e.lane, e.depth),
                rear: match e.kind {
                    EntityKind::Train { length, .. } => Some(self.project(e.lane, e.depth + length)),
                    _ => None,
                },
            })
            .collect();
        items.sort_by(|a, b| b.entity.depth.total_cmp(&a.entity.depth));
        items
    }

    /// Where the player's feet go, lifted by the jump offset
    pub fn player_anchor(&self, lane_x: f32, vertical_offset: f32, baseline: f32) -> Vec2 {
        let ground = self.project(lane_x, 0.0);
        Vec2::new(ground.pos.x, ground.pos.y - baseline - vertical_offset)
    }

    /// Screen position of a pickup sparkle
    pub fn particle_point(&self, particle: &Particle, baseline: f32) -> Vec2 {
        self.player_anchor(particle.lane, 0.0, baseline) + particle.pos
    }

    /// Trail ghosts for recent lane positions (newest first)
    pub fn trail_points<'a>(&'a self, trail: &'a [f32], baseline: f32) -> impl Iterator<Item = Vec2> + 'a {
        trail
            .iter()
            .map(move |&lane| self.player_anchor(lane, 0.0, baseline))
    }
}
