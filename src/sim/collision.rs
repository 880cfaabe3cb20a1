//! Hit resolution between the player and a single entity
//!
//! Geometry (depth window, lane tolerance) is decided by the world; this module
//! only decides what a contact means for the run.

use super::entity::{Entity, EntityKind, PowerupKind};
use super::player::Player;
use super::powerups::PowerupTimers;
use crate::tuning::Tuning;

/// What was picked up on a consumed contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pickup {
    Coin,
    Powerup(PowerupKind),
}

/// Result of resolving one contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Collectible taken; entity is removed
    Consumed(Pickup),
    /// Would have been fatal, shield took it; entity is removed
    Absorbed,
    /// Run ends
    Fatal,
    /// Contact has no effect (evaded or boosted through)
    Ignored,
}

impl Outcome {
    /// Whether the entity leaves the world
    pub fn removes_entity(&self) -> bool {
        matches!(self, Outcome::Consumed(_) | Outcome::Absorbed)
    }
}

/// True if the posture evades the hazard
fn evades(entity: &Entity, player: &Player, tuning: &Tuning) -> bool {
    match entity.kind {
        EntityKind::Barrier { height, .. } => {
            if tuning.is_low_barrier(height) {
                player.is_jumping
            } else {
                player.is_sliding
            }
        }
        EntityKind::Train { .. } => player.vertical_offset > tuning.train_clearance,
        EntityKind::Coin { .. } | EntityKind::Powerup { .. } => true,
    }
}

/// Resolve a contact, updating power-up timers for pickups and shield use
pub fn resolve(entity: &Entity, player: &Player, timers: &mut PowerupTimers, tuning: &Tuning) -> Outcome {
    match entity.kind {
        EntityKind::Coin { .. } => return Outcome::Consumed(Pickup::Coin),
        EntityKind::Powerup { kind, .. } => {
            timers.activate(kind, tuning.powerup_duration_ms);
            return Outcome::Consumed(Pickup::Powerup(kind));
        }
        EntityKind::Barrier { .. } | EntityKind::Train { .. } => {}
    }

    if timers.is_active(PowerupKind::Boost) || evades(entity, player, tuning) {
        return Outcome::Ignored;
    }

    if timers.is_active(PowerupKind::Shield) {
        timers.clear(PowerupKind::Shield);
        Outcome::Absorbed
    } else {
        Outcome::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Lane;

    fn tall_barrier() -> Entity {
        Entity::barrier(1, Lane::CENTER, 50.0, 110.0, 20.0)
    }

    fn low_barrier() -> Entity {
        Entity::barrier(2, Lane::CENTER, 50.0, 40.0, 20.0)
    }

    fn train() -> Entity {
        Entity::train(3, Lane::CENTER, 50.0, 150.0, 300.0, false)
    }

    #[test]
    fn test_tall_barrier_needs_slide() {
        let tuning = Tuning::default();
        let mut timers = PowerupTimers::default();
        let mut player = Player::default();
        assert_eq!(resolve(&tall_barrier(), &player, &mut timers, &tuning), Outcome::Fatal);

        player.request_slide(&tuning);
        assert_eq!(resolve(&tall_barrier(), &player, &mut timers, &tuning), Outcome::Ignored);
    }

    #[test]
    fn test_low_barrier_needs_jump() {
        let tuning = Tuning::default();
        let mut timers = PowerupTimers::default();
        let mut player = Player::default();
        player.request_slide(&tuning);
        assert_eq!(resolve(&low_barrier(), &player, &mut timers, &tuning), Outcome::Fatal);

        player.request_jump(&tuning);
        assert_eq!(resolve(&low_barrier(), &player, &mut timers, &tuning), Outcome::Ignored);
    }

    #[test]
    fn test_train_needs_clearance() {
        let tuning = Tuning::default();
        let mut timers = PowerupTimers::default();
        let mut player = Player::default();
        player.request_slide(&tuning);
        assert_eq!(resolve(&train(), &player, &mut timers, &tuning), Outcome::Fatal);

        player.is_sliding = false;
        player.is_jumping = true;
        player.vertical_offset = tuning.train_clearance - 1.0;
        assert_eq!(resolve(&train(), &player, &mut timers, &tuning), Outcome::Fatal);

        player.vertical_offset = tuning.train_clearance + 1.0;
        assert_eq!(resolve(&train(), &player, &mut timers, &tuning), Outcome::Ignored);
    }

    #[test]
    fn test_boost_passes_through() {
        let tuning = Tuning::default();
        let mut timers = PowerupTimers::default();
        timers.activate(PowerupKind::Boost, 1000.0);
        timers.activate(PowerupKind::Shield, 1000.0);
        let player = Player::default();
        assert_eq!(resolve(&train(), &player, &mut timers, &tuning), Outcome::Ignored);
        // Shield is not spent while boosted
        assert!(timers.is_active(PowerupKind::Shield));
    }

    #[test]
    fn test_shield_absorbs_once() {
        let tuning = Tuning::default();
        let mut timers = PowerupTimers::default();
        timers.activate(PowerupKind::Shield, 1000.0);
        let player = Player::default();
        assert_eq!(resolve(&tall_barrier(), &player, &mut timers, &tuning), Outcome::Absorbed);
        assert_eq!(timers.remaining(PowerupKind::Shield), 0.0);
        assert_eq!(resolve(&tall_barrier(), &player, &mut timers, &tuning), Outcome::Fatal);
    }

    #[test]
    fn test_pickups_consumed() {
        let tuning = Tuning::default();
        let mut timers = PowerupTimers::default();
        let player = Player::default();
        let coin = Entity::coin(4, 1.0, 50.0);
        assert_eq!(
            resolve(&coin, &player, &mut timers, &tuning),
            Outcome::Consumed(Pickup::Coin)
        );

        let magnet = Entity::powerup(5, Lane::CENTER, 50.0, PowerupKind::Magnet);
        assert_eq!(
            resolve(&magnet, &player, &mut timers, &tuning),
            Outcome::Consumed(Pickup::Powerup(PowerupKind::Magnet))
        );
        assert_eq!(timers.remaining(PowerupKind::Magnet), tuning.powerup_duration_ms);
    }
}
