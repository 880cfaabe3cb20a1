//! Procedural entity generation
//!
//! Each time the spawn timer exceeds the (speed-dependent) interval, one batch
//! is rolled: a hazard, a coin run, or a single power-up.

use std::f32::consts::PI;

use super::entity::{Entity, Lane, PowerupKind};
use super::rng::SpawnRng;
use crate::tuning::Tuning;

/// Batch category picked by the weighted roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnCategory {
    Hazard,
    CoinRun,
    Powerup,
}

/// Monotonic entity id source
#[derive(Debug, Clone)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Spawn cadence and rolls
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: SpawnRng,
    /// ms accumulated since the last batch
    timer: f32,
}

impl Spawner {
    pub fn new(rng: SpawnRng) -> Self {
        Self { rng, timer: 0.0 }
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Accumulate `dt` and emit a batch once the interval for `speed` elapses
    pub fn maybe_spawn(
        &mut self,
        dt: f32,
        speed: f32,
        distance: f64,
        ids: &mut EntityIds,
        tuning: &Tuning,
    ) -> Option<Vec<Entity>> {
        self.timer += dt;
        if self.timer <= tuning.spawn_interval(speed) {
            return None;
        }
        self.timer = 0.0;

        let batch = self.spawn_batch(distance, ids, tuning);
        if batch.is_empty() {
            None
        } else {
            log::debug!("Spawned {} entities at distance {:.0}", batch.len(), distance);
            Some(batch)
        }
    }

    /// Roll one batch immediately
    pub fn spawn_batch(&mut self, distance: f64, ids: &mut EntityIds, tuning: &Tuning) -> Vec<Entity> {
        let Some(category) = self.roll_category(tuning) else {
            return Vec::new();
        };
        let lane = Lane::ALL[self.rng.index(Lane::ALL.len())];
        let depth = tuning.spawn_horizon;

        match category {
            SpawnCategory::Hazard => vec![self.roll_hazard(ids.next_id(), lane, depth, distance, tuning)],
            SpawnCategory::CoinRun => self.roll_coin_run(lane, depth, ids, tuning),
            SpawnCategory::Powerup => {
                let kind = PowerupKind::ALL[self.rng.index(PowerupKind::ALL.len())];
                vec![Entity::powerup(ids.next_id(), lane, depth, kind)]
            }
        }
    }

    /// Cumulative-threshold roll over the normalized category weights
    fn roll_category(&mut self, tuning: &Tuning) -> Option<SpawnCategory> {
        let total = tuning.hazard_weight + tuning.coin_run_weight + tuning.powerup_weight;
        if total <= 0.0 {
            return None;
        }
        let roll = self.rng.unit() * total;
        if roll < tuning.hazard_weight {
            Some(SpawnCategory::Hazard)
        } else if roll < tuning.hazard_weight + tuning.coin_run_weight {
            Some(SpawnCategory::CoinRun)
        } else if tuning.powerup_weight > 0.0 {
            Some(SpawnCategory::Powerup)
        } else {
            Some(SpawnCategory::CoinRun)
        }
    }

    fn roll_hazard(&mut self, id: u32, lane: Lane, depth: f32, distance: f64, tuning: &Tuning) -> Entity {
        if self.rng.chance(tuning.train_chance) {
            let approaching =
                distance > tuning.approaching_min_distance && self.rng.chance(tuning.approaching_chance);
            Entity::train(id, lane, depth, tuning.train_height, tuning.train_length, approaching)
        } else {
            let height = if self.rng.chance(0.5) {
                tuning.barrier_low_height
            } else {
                tuning.barrier_tall_height
            };
            Entity::barrier(id, lane, depth, height, tuning.barrier_length)
        }
    }

    fn roll_coin_run(&mut self, lane: Lane, depth: f32, ids: &mut EntityIds, tuning: &Tuning) -> Vec<Entity> {
        let n = tuning.coin_run_len;
        let arc = n > 1 && self.rng.chance(tuning.coin_arc_chance);
        // Arcs always bend toward the middle so they stay on the track
        let bend = match lane {
            Lane::LEFT => 1.0,
            Lane::RIGHT => -1.0,
            _ if self.rng.chance(0.5) => 1.0,
            _ => -1.0,
        };

        (0..n)
            .map(|i| {
                let offset = if arc {
                    bend * (PI * i as f32 / (n - 1) as f32).sin()
                } else {
                    0.0
                };
                Entity::coin(
                    ids.next_id(),
                    lane.as_f32() + offset,
                    depth + i as f32 * tuning.coin_spacing,
                )
            })
            .collect()
    }
}
