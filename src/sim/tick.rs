//! Per-frame simulation update
//!
//! The host's scheduler calls [`RunSession::tick`] once per display frame with
//! the wall-clock ms since the previous call.

use super::collision::{Outcome, Pickup};
use super::entity::{EntityKind, Lane, PowerupKind};
use super::state::{GameEvent, Intent, RunPhase, RunSession};
use super::world::{World, WorldStep};
use crate::consts::{FRAME_MS, MAX_FRAME_DT};
use crate::frame_scale;
use crate::sim::player::Player;
use crate::tuning::Tuning;

/// Depth units covered over `dt` ms while speed ramps linearly from `s0`
/// at `accel` per ms and saturates at `max`.
///
/// Exact for piecewise-linear speed, so total travel does not depend on how the
/// elapsed time was split into frames.
pub fn travel_over(s0: f32, accel: f32, max: f32, dt: f32) -> f32 {
    let area = if accel <= 0.0 || s0 >= max {
        s0 * dt
    } else {
        let t_cap = (max - s0) / accel;
        if t_cap >= dt {
            (s0 + accel * dt * 0.5) * dt
        } else {
            (s0 + max) * 0.5 * t_cap + max * (dt - t_cap)
        }
    };
    area / FRAME_MS
}

impl RunSession {
    /// Advance the run by `dt` ms. No-op unless running.
    pub fn tick(&mut self, dt: f32) {
        if self.phase != RunPhase::Running || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let dt = dt.min(MAX_FRAME_DT);

        if self.autopilot {
            let speed = self.run.effective_speed(&self.tuning);
            if let Some(intent) = autopilot_intent(&self.run.player, &self.run.world, speed, &self.tuning) {
                self.on_intent(intent);
            }
        }

        let tuning = &self.tuning;
        let run = &mut self.run;

        // Speed and travel
        let travel = travel_over(run.speed, tuning.acceleration, tuning.max_speed, dt) * run.boost_factor(tuning);
        run.speed = (run.speed + tuning.acceleration * dt).clamp(tuning.base_speed, tuning.max_speed);
        run.distance += f64::from(travel);
        let multiplier = if run.timers.is_active(PowerupKind::Multiplier) {
            tuning.score_multiplier
        } else {
            1.0
        };
        run.score += f64::from(travel) / tuning.score_divisor * multiplier;

        run.player.advance(dt, tuning);

        let step = WorldStep {
            dt,
            travel,
            magnet_active: run.timers.is_active(PowerupKind::Magnet),
            god_mode: self.god_mode,
        };
        let contacts = run.world.advance(&step, &run.player, &mut run.timers, tuning);

        let mut fatal = false;
        for contact in contacts {
            match contact.outcome {
                Outcome::Consumed(Pickup::Coin) => {
                    run.coins += 1;
                    run.particles.burst(run.player.lane_x, &mut run.fx_rng, tuning);
                    self.events.push(GameEvent::PickupCoin);
                }
                Outcome::Consumed(Pickup::Powerup(kind)) => {
                    log::debug!("Picked up {}", kind.as_str());
                    self.events.push(GameEvent::PickupPowerup(kind));
                }
                Outcome::Absorbed => {
                    log::info!("Shield absorbed crash at distance {:.0}", run.distance);
                    run.screen_shake = tuning.shield_shake;
                    self.events.push(GameEvent::CrashAbsorbedByShield);
                }
                Outcome::Fatal => fatal = true,
                Outcome::Ignored => {}
            }
        }
        if fatal {
            self.crash();
            return;
        }

        run.timers.decay(dt);
        run.particles.advance(dt, tuning);

        if let Some(batch) = run
            .spawner
            .maybe_spawn(dt, run.speed, run.distance, &mut run.ids, tuning)
        {
            run.world.extend(batch);
        }

        run.screen_shake = (run.screen_shake - tuning.shake_decay * frame_scale(dt)).max(0.0);
        run.elapsed_ms += f64::from(dt);
    }
}

/// Nearest hazard depth in `lane` within `lookahead`
fn threat_in_lane(world: &World, lane: Lane, lookahead: f32) -> Option<(f32, EntityKind)> {
    world
        .entities
        .iter()
        .filter(|e| e.is_hazard() && e.far_depth() > 0.0 && e.depth < lookahead)
        .filter(|e| (e.lane - lane.as_f32()).abs() < 0.5)
        .map(|e| (e.depth, e.kind))
        .min_by(|a, b| a.0.total_cmp(&b.0))
}

fn steer(from: Lane, to: Lane) -> Option<Intent> {
    match to.index().cmp(&from.index()) {
        std::cmp::Ordering::Less => Some(Intent::LaneLeft),
        std::cmp::Ordering::Greater => Some(Intent::LaneRight),
        std::cmp::Ordering::Equal => None,
    }
}

/// Idle/demo mode: pick one intent for this frame
pub fn autopilot_intent(player: &Player, world: &World, speed: f32, tuning: &Tuning) -> Option<Intent> {
    // Look further ahead at higher speeds
    let per_frame = speed.max(1.0);
    let lookahead = per_frame * 20.0 + tuning.collision_near;
    let act_depth = per_frame * 6.0 + tuning.collision_near * 0.5;
    let here = player.target_lane;

    let Some((depth, kind)) = threat_in_lane(world, here, lookahead) else {
        // Safe: drift toward the nearest coin in a neighboring safe lane
        let coin_lane = world
            .entities
            .iter()
            .filter(|e| e.is_coin() && e.depth > 0.0 && e.depth < lookahead)
            .min_by(|a, b| a.depth.total_cmp(&b.depth))
            .map(|e| Lane::clamped(e.lane.round() as i32))?;
        let next = here.shifted(i32::from(coin_lane.index()) - i32::from(here.index()));
        if threat_in_lane(world, next, lookahead).is_some() {
            return None;
        }
        return steer(here, next);
    };

    // Prefer dodging sideways, into the free lane with the most open track
    let clearance = |lane: Lane| threat_in_lane(world, lane, f32::INFINITY).map_or(f32::INFINITY, |(d, _)| d);
    if let Some(free) = [here.shifted(-1), here.shifted(1)]
        .into_iter()
        .filter(|&l| l != here && threat_in_lane(world, l, lookahead).is_none())
        .max_by(|a, b| clearance(*a).total_cmp(&clearance(*b)))
    {
        return steer(here, free);
    }

    if depth > act_depth {
        return None;
    }
    match kind {
        EntityKind::Barrier { height, .. } if !tuning.is_low_barrier(height) => {
            (!player.is_sliding).then_some(Intent::Slide)
        }
        EntityKind::Barrier { .. } | EntityKind::Train { .. } => (!player.is_jumping).then_some(Intent::Jump),
        EntityKind::Coin { .. } | EntityKind::Powerup { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Entity;

    fn running(tuning: Tuning) -> RunSession {
        let mut session = RunSession::with_seed(tuning, 12345);
        session.start();
        session.drain_events();
        session
    }

    fn no_spawns() -> Tuning {
        Tuning {
            hazard_weight: 0.0,
            coin_run_weight: 0.0,
            powerup_weight: 0.0,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_travel_over_linear_region() {
        // Constant speed: 8 units per 16 ms frame
        assert_eq!(travel_over(8.0, 0.0, 25.0, 16.0), 8.0);
        let whole = travel_over(8.0, 0.001, 25.0, 1000.0);
        assert!((whole - (8.0 + 0.5) * 1000.0 / 16.0).abs() < 1e-3);
    }

    #[test]
    fn test_travel_over_saturates() {
        // 8 -> 25 takes 17000 ms
        let split = travel_over(8.0, 0.001, 25.0, 17_000.0) + travel_over(25.0, 0.001, 25.0, 3_000.0);
        let whole = travel_over(8.0, 0.001, 25.0, 20_000.0);
        assert!((split - whole).abs() / whole < 1e-5);
    }

    #[test]
    fn test_tick_noop_unless_running() {
        let mut session = RunSession::with_seed(Tuning::default(), 1);
        session.tick(16.0);
        assert_eq!(session.run().distance, 0.0);

        session.start();
        session.toggle_pause();
        session.tick(16.0);
        assert_eq!(session.run().distance, 0.0);

        session.toggle_pause();
        session.tick(16.0);
        assert!(session.run().distance > 0.0);
    }

    #[test]
    fn test_bad_dt_ignored() {
        let mut session = running(no_spawns());
        session.tick(f32::NAN);
        session.tick(-5.0);
        session.tick(0.0);
        assert_eq!(session.run().elapsed_ms, 0.0);
        session.tick(10_000.0);
        assert_eq!(session.run().elapsed_ms, f64::from(MAX_FRAME_DT));
    }

    #[test]
    fn test_speed_ramps_and_caps() {
        let tuning = no_spawns();
        let mut session = running(tuning.clone());
        let mut last = session.run().speed;
        for _ in 0..63 {
            session.tick(16.0);
            let speed = session.run().speed;
            assert!(speed > last);
            assert!(speed <= tuning.max_speed);
            last = speed;
        }
        for _ in 0..2000 {
            session.tick(16.0);
        }
        assert_eq!(session.run().speed, tuning.max_speed);
    }

    #[test]
    fn test_multiplier_doubles_score_rate() {
        let mut plain = running(no_spawns());
        let mut doubled = running(no_spawns());
        doubled.run_mut().timers.activate(PowerupKind::Multiplier, 5_000.0);
        for _ in 0..10 {
            plain.tick(16.0);
            doubled.tick(16.0);
        }
        assert!((doubled.run().score - plain.run().score * 2.0).abs() < 1e-6);
        assert_eq!(doubled.run().distance, plain.run().distance);
    }

    #[test]
    fn test_boost_doubles_travel() {
        let mut plain = running(no_spawns());
        let mut boosted = running(no_spawns());
        boosted.run_mut().timers.activate(PowerupKind::Boost, 5_000.0);
        plain.tick(16.0);
        boosted.tick(16.0);
        assert!((boosted.run().distance - plain.run().distance * 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_fatal_barrier_ends_run() {
        let mut session = running(no_spawns());
        session.insert_entity(|id| Entity::barrier(id, Lane::CENTER, 50.0, 110.0, 20.0));
        session.tick(16.0);
        assert_eq!(session.phase(), RunPhase::GameOver);
        let events = session.drain_events();
        assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_slide_under_tall_barrier() {
        let mut session = running(no_spawns());
        session.insert_entity(|id| Entity::barrier(id, Lane::CENTER, 50.0, 110.0, 20.0));
        session.on_intent(Intent::Slide);
        session.tick(16.0);
        assert_eq!(session.phase(), RunPhase::Running);
    }

    #[test]
    fn test_shield_absorbs_and_shakes() {
        let mut session = running(no_spawns());
        session.run_mut().timers.activate(PowerupKind::Shield, 5_000.0);
        let id = session.insert_entity(|id| Entity::train(id, Lane::CENTER, 50.0, 150.0, 300.0, false));
        session.tick(16.0);
        assert_eq!(session.phase(), RunPhase::Running);
        assert_eq!(session.run().timers.remaining(PowerupKind::Shield), 0.0);
        assert!(session.run().world.get(id).is_none());
        assert!(session.run().screen_shake > 0.0);
        assert_eq!(session.drain_events(), vec![GameEvent::CrashAbsorbedByShield]);

        // Shake decays back to zero
        for _ in 0..100 {
            session.tick(16.0);
        }
        assert_eq!(session.run().screen_shake, 0.0);
    }

    #[test]
    fn test_coin_pickup_counts_once() {
        let mut session = running(no_spawns());
        let id = session.insert_entity(|id| Entity::coin(id, 1.0, 50.0));
        session.tick(16.0);
        assert_eq!(session.run().coins, 1);
        assert_eq!(session.drain_events(), vec![GameEvent::PickupCoin]);
        for _ in 0..10 {
            session.tick(16.0);
            assert!(session.frame_state().entities.iter().all(|e| e.id != id));
        }
        assert_eq!(session.run().coins, 1);
    }

    #[test]
    fn test_god_mode_survives_hazards() {
        let mut session = running(no_spawns());
        session.god_mode = true;
        session.insert_entity(|id| Entity::barrier(id, Lane::CENTER, 50.0, 110.0, 20.0));
        session.insert_entity(|id| Entity::coin(id, 1.0, 55.0));
        session.tick(16.0);
        assert_eq!(session.phase(), RunPhase::Running);
        assert_eq!(session.run().coins, 1);
    }

    #[test]
    fn test_autopilot_dodges_sideways() {
        let tuning = Tuning::default();
        let player = Player::default();
        let mut world = World::default();
        world.extend([Entity::train(1, Lane::CENTER, 150.0, 150.0, 300.0, false)]);
        let intent = autopilot_intent(&player, &world, 8.0, &tuning);
        assert!(matches!(intent, Some(Intent::LaneLeft | Intent::LaneRight)));
    }

    #[test]
    fn test_autopilot_slides_when_boxed_in() {
        let tuning = Tuning::default();
        let player = Player::default();
        let mut world = World::default();
        world.extend([
            Entity::barrier(1, Lane::LEFT, 80.0, 100.0, 20.0),
            Entity::barrier(2, Lane::CENTER, 80.0, 100.0, 20.0),
            Entity::barrier(3, Lane::RIGHT, 80.0, 100.0, 20.0),
        ]);
        let intent = autopilot_intent(&player, &world, 8.0, &tuning);
        assert_eq!(intent, Some(Intent::Slide));
    }

    #[test]
    fn test_autopilot_dodges_toward_open_track() {
        let tuning = Tuning::default();
        let player = Player::default();
        let mut world = World::default();
        // Left is clear only up to the lookahead; right is clear all the way
        world.extend([
            Entity::train(1, Lane::CENTER, 150.0, 150.0, 300.0, false),
            Entity::barrier(2, Lane::LEFT, 600.0, 40.0, 20.0),
        ]);
        assert_eq!(autopilot_intent(&player, &world, 8.0, &tuning), Some(Intent::LaneRight));

        world.entities[1] = Entity::barrier(2, Lane::RIGHT, 600.0, 40.0, 20.0);
        assert_eq!(autopilot_intent(&player, &world, 8.0, &tuning), Some(Intent::LaneLeft));
    }

    #[test]
    fn test_autopilot_clears_scripted_hazards() {
        let mut session = running(no_spawns());
        session.autopilot = true;
        session.insert_entity(|id| Entity::train(id, Lane::CENTER, 400.0, 150.0, 300.0, false));
        session.insert_entity(|id| Entity::barrier(id, Lane::RIGHT, 700.0, 110.0, 20.0));
        for _ in 0..150 {
            session.tick(16.0);
        }
        assert_eq!(session.phase(), RunPhase::Running);
        assert_eq!(session.run().player.target_lane, Lane::LEFT);
    }

    #[test]
    fn test_autopilot_outlasts_passive_runner() {
        let survival = |seed: u64, autopilot: bool| {
            let mut session = RunSession::with_seed(Tuning::default(), seed);
            session.autopilot = autopilot;
            session.start();
            for _ in 0..(60 * 30) {
                session.tick(16.0);
                if session.phase() != RunPhase::Running {
                    break;
                }
            }
            session.run().elapsed_ms
        };
        let auto: f64 = (1..=5).map(|seed| survival(seed, true)).sum();
        let passive: f64 = (1..=5).map(|seed| survival(seed, false)).sum();
        assert!(auto > passive, "autopilot {} ms vs passive {} ms", auto, passive);
    }

    #[test]
    fn test_long_frame_hits_like_short_frames() {
        let mut fine = running(no_spawns());
        let mut coarse = running(no_spawns());
        for session in [&mut fine, &mut coarse] {
            session.insert_entity(|id| Entity::barrier(id, Lane::CENTER, 110.0, 110.0, 20.0));
        }
        for _ in 0..10 {
            fine.tick(25.0);
        }
        coarse.tick(250.0);
        assert_eq!(fine.phase(), RunPhase::GameOver);
        assert_eq!(coarse.phase(), RunPhase::GameOver);
    }

    #[test]
    fn test_boosted_coin_not_skipped_at_30fps() {
        let mut session = running(no_spawns());
        session.run_mut().speed = 25.0;
        session.run_mut().timers.activate(PowerupKind::Boost, 5_000.0);
        // One 33 ms boosted frame covers more than the hit window
        session.insert_entity(|id| Entity::coin(id, 1.0, 101.0));
        session.tick(33.0);
        session.tick(33.0);
        assert_eq!(session.run().coins, 1);
    }

    #[test]
    fn test_coin_pickup_bursts_particles() {
        let tuning = no_spawns();
        let mut session = running(tuning.clone());
        session.insert_entity(|id| Entity::coin(id, 1.0, 50.0));
        session.tick(16.0);
        let frame = session.frame_state();
        assert_eq!(frame.particles.len(), tuning.burst_particles);
        assert!(frame.particles.iter().all(|p| p.life < 1.0 && p.lane == 1.0));

        for _ in 0..60 {
            session.tick(16.0);
        }
        assert!(session.frame_state().particles.is_empty());
    }

    #[test]
    fn test_negative_shake_decay_still_settles() {
        let mut session = running(Tuning {
            shake_decay: -1.0,
            ..no_spawns()
        });
        session.run_mut().timers.activate(PowerupKind::Shield, 5_000.0);
        session.insert_entity(|id| Entity::barrier(id, Lane::CENTER, 50.0, 110.0, 20.0));
        session.tick(16.0);
        let shaken = session.run().screen_shake;
        assert!(shaken > 0.0);
        session.tick(16.0);
        assert!(session.run().screen_shake < shaken);
        for _ in 0..6000 {
            session.tick(16.0);
        }
        assert_eq!(session.run().screen_shake, 0.0);
    }
}
