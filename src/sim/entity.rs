//! Track entities: hazards and collectibles

use serde::{Deserialize, Serialize};

use crate::consts::{CENTER_LANE, LANE_COUNT};

/// A discrete lane index, always in `0..LANE_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Lane(u8);

impl Lane {
    pub const LEFT: Lane = Lane(0);
    pub const CENTER: Lane = Lane(CENTER_LANE);
    pub const RIGHT: Lane = Lane(LANE_COUNT - 1);
    pub const ALL: [Lane; LANE_COUNT as usize] = [Lane::LEFT, Lane::CENTER, Lane::RIGHT];

    /// Build a lane from any signed index, clamping into range
    pub fn clamped(index: i32) -> Self {
        Lane(index.clamp(0, i32::from(LANE_COUNT - 1)) as u8)
    }

    /// Neighbor in direction `dir` (negative = left), clamped at the edges
    pub fn shifted(self, dir: i32) -> Self {
        Self::clamped(i32::from(self.0) + dir)
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn as_f32(self) -> f32 {
        f32::from(self.0)
    }
}

impl Default for Lane {
    fn default() -> Self {
        Lane::CENTER
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Pulls nearby coins into the player's lane
    Magnet,
    /// Absorbs one fatal collision
    Shield,
    /// Doubles score accrual
    Multiplier,
    /// Doubles speed and passes through hazards
    Boost,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::Magnet,
        PowerupKind::Shield,
        PowerupKind::Multiplier,
        PowerupKind::Boost,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PowerupKind::Magnet => 0,
            PowerupKind::Shield => 1,
            PowerupKind::Multiplier => 2,
            PowerupKind::Boost => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::Magnet => "magnet",
            PowerupKind::Shield => "shield",
            PowerupKind::Multiplier => "multiplier",
            PowerupKind::Boost => "boost",
        }
    }
}

/// Kind-specific entity payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Static obstacle; low ones are jumped, tall ones slid under
    Barrier { height: f32, length: f32 },
    /// Long obstacle, only cleared by a high jump
    Train {
        height: f32,
        length: f32,
        /// Closes distance faster than ambient speed
        approaching: bool,
    },
    Coin { phase: f32 },
    Powerup { kind: PowerupKind, phase: f32 },
}

/// An entity on the track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    /// Continuous lane coordinate; magnetized coins drift between lanes
    pub lane: f32,
    /// Distance ahead of the player; negative once passed
    pub depth: f32,
    /// Depth before the latest world advance
    #[serde(default)]
    pub last_depth: f32,
    pub kind: EntityKind,
}

impl Entity {
    pub fn barrier(id: u32, lane: Lane, depth: f32, height: f32, length: f32) -> Self {
        Self {
            id,
            lane: lane.as_f32(),
            depth,
            last_depth: depth,
            kind: EntityKind::Barrier { height, length },
        }
    }

    pub fn train(id: u32, lane: Lane, depth: f32, height: f32, length: f32, approaching: bool) -> Self {
        Self {
            id,
            lane: lane.as_f32(),
            depth,
            last_depth: depth,
            kind: EntityKind::Train {
                height,
                length,
                approaching,
            },
        }
    }

    pub fn coin(id: u32, lane: f32, depth: f32) -> Self {
        Self {
            id,
            lane: crate::clamp_lane(lane),
            depth,
            last_depth: depth,
            kind: EntityKind::Coin { phase: 0.0 },
        }
    }

    pub fn powerup(id: u32, lane: Lane, depth: f32, kind: PowerupKind) -> Self {
        Self {
            id,
            lane: lane.as_f32(),
            depth,
            last_depth: depth,
            kind: EntityKind::Powerup { kind, phase: 0.0 },
        }
    }

    /// Barriers and trains
    pub fn is_hazard(&self) -> bool {
        matches!(self.kind, EntityKind::Barrier { .. } | EntityKind::Train { .. })
    }

    pub fn is_coin(&self) -> bool {
        matches!(self.kind, EntityKind::Coin { .. })
    }

    /// Extent along depth (0 for collectibles)
    pub fn length(&self) -> f32 {
        match self.kind {
            EntityKind::Barrier { length, .. } | EntityKind::Train { length, .. } => length,
            EntityKind::Coin { .. } | EntityKind::Powerup { .. } => 0.0,
        }
    }

    pub fn height(&self) -> Option<f32> {
        match self.kind {
            EntityKind::Barrier { height, .. } | EntityKind::Train { height, .. } => Some(height),
            EntityKind::Coin { .. } | EntityKind::Powerup { .. } => None,
        }
    }

    /// Depth of the entity's far edge
    #[inline]
    pub fn far_depth(&self) -> f32 {
        self.depth + self.length()
    }

    pub fn is_approaching(&self) -> bool {
        matches!(self.kind, EntityKind::Train { approaching: true, .. })
    }

    /// Advance the animation phase (coins and power-ups only)
    pub fn spin(&mut self, delta: f32) {
        match &mut self.kind {
            EntityKind::Coin { phase } | EntityKind::Powerup { phase, .. } => {
                *phase = (*phase + delta) % std::f32::consts::TAU;
            }
            EntityKind::Barrier { .. } | EntityKind::Train { .. } => {}
        }
    }
}
