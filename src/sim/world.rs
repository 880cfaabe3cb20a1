//! The live entity set: advance, magnet attraction, prune, contact checks

use serde::{Deserialize, Serialize};

use super::collision::{Outcome, resolve};
use super::entity::{Entity, EntityKind};
use super::player::Player;
use super::powerups::PowerupTimers;
use crate::tuning::Tuning;
use crate::{clamp_lane, frame_scale};

/// Per-frame inputs for [`World::advance`]
#[derive(Debug, Clone, Copy)]
pub struct WorldStep {
    /// Frame length in ms
    pub dt: f32,
    /// Depth every entity closes this frame at effective speed
    pub travel: f32,
    pub magnet_active: bool,
    /// Debug bypass: hazards never resolve
    pub god_mode: bool,
}

/// A resolved contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub entity_id: u32,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    /// Entities in spawn order
    pub entities: Vec<Entity>,
}

impl World {
    pub fn extend(&mut self, batch: impl IntoIterator<Item = Entity>) {
        self.entities.extend(batch);
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Move entities toward the player
    pub fn advance_entities(&mut self, step: &WorldStep, player_lane_x: f32, tuning: &Tuning) {
        let f = frame_scale(step.dt);
        let magnet_blend = (tuning.magnet_lane_rate * f).min(1.0);

        for e in &mut self.entities {
            e.last_depth = e.depth;
            let bonus = if e.is_approaching() { tuning.approach_bonus * f } else { 0.0 };
            e.depth -= step.travel + bonus;

            if step.magnet_active && e.is_coin() && e.depth < tuning.magnet_window {
                e.lane = clamp_lane(e.lane + (player_lane_x - e.lane) * magnet_blend);
                e.depth -= tuning.magnet_depth_pull * f;
            }

            e.spin(tuning.phase_rate * step.dt);
        }
    }

    /// Drop entities fully behind the camera
    pub fn prune(&mut self, tuning: &Tuning) {
        self.entities.retain(|e| e.far_depth() >= tuning.prune_depth);
    }

    /// Whether an entity crossed the player's hit window during the last advance
    ///
    /// The depth span `[depth, last_depth]` is tested against `(0, collision_near)`
    /// so a long frame cannot carry an entity past the window unseen.
    fn in_contact(e: &Entity, player_lane_x: f32, tuning: &Tuning) -> bool {
        if e.last_depth.max(e.depth) <= 0.0 || e.depth.min(e.last_depth) >= tuning.collision_near {
            return false;
        }
        let tolerance = match e.kind {
            EntityKind::Train { .. } => tuning.train_lane_tolerance,
            EntityKind::Barrier { .. } | EntityKind::Coin { .. } | EntityKind::Powerup { .. } => {
                tuning.lane_tolerance
            }
        };
        (e.lane - player_lane_x).abs() < tolerance
    }

    /// Resolve every entity in the hit window; stops at the first fatal contact
    pub fn resolve_contacts(
        &mut self,
        step: &WorldStep,
        player: &Player,
        timers: &mut PowerupTimers,
        tuning: &Tuning,
    ) -> Vec<Contact> {
        let mut contacts = Vec::new();

        for e in &self.entities {
            if !Self::in_contact(e, player.lane_x, tuning) {
                continue;
            }
            if step.god_mode && e.is_hazard() {
                continue;
            }
            let outcome = resolve(e, player, timers, tuning);
            if outcome != Outcome::Ignored {
                contacts.push(Contact {
                    entity_id: e.id,
                    outcome,
                });
            }
            if outcome == Outcome::Fatal {
                break;
            }
        }

        if contacts.iter().any(|c| c.outcome.removes_entity()) {
            self.entities.retain(|e| {
                !contacts
                    .iter()
                    .any(|c| c.entity_id == e.id && c.outcome.removes_entity())
            });
        }
        contacts
    }

    /// Full world frame: advance, contacts, then prune
    pub fn advance(
        &mut self,
        step: &WorldStep,
        player: &Player,
        timers: &mut PowerupTimers,
        tuning: &Tuning,
    ) -> Vec<Contact> {
        self.advance_entities(step, player.lane_x, tuning);
        let contacts = self.resolve_contacts(step, player, timers, tuning);
        self.prune(tuning);
        contacts
    }
}
