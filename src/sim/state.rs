//! Run lifecycle and session state
//!
//! A [`RunSession`] is owned by the host. It holds exactly one [`Run`]; starting
//! a new run replaces it with a single assignment, so a renderer can never see
//! a half-reset run.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, PowerupKind};
use super::particles::{Particle, Particles};
use super::player::Player;
use super::powerups::PowerupTimers;
use super::rng::SpawnRng;
use super::spawner::{EntityIds, Spawner};
use super::world::World;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// No run in progress
    #[default]
    Menu,
    /// Active gameplay
    Running,
    /// Frozen mid-run
    Paused,
    /// Run ended by a fatal collision
    GameOver,
}

/// Requested lifecycle change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunTrigger {
    Start,
    TogglePause,
    Crash,
    ExitToMenu,
}

impl RunPhase {
    /// Transition table. `None` means the trigger is not valid here.
    pub fn next(self, trigger: RunTrigger) -> Option<RunPhase> {
        use RunPhase::*;
        use RunTrigger::*;
        match (self, trigger) {
            (Menu | Paused | GameOver, Start) => Some(Running),
            (Running, TogglePause) => Some(Paused),
            (Paused, TogglePause) => Some(Running),
            (Running, Crash) => Some(GameOver),
            (Paused | GameOver, ExitToMenu) => Some(Menu),
            _ => None,
        }
    }
}

/// Decoded player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    LaneLeft,
    LaneRight,
    Jump,
    Slide,
    Pause,
}

/// Notifications for audio/UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { seed: u64 },
    Jump,
    PickupCoin,
    PickupPowerup(PowerupKind),
    CrashAbsorbedByShield,
    GameOver { final_score: u64, final_coins: u32 },
}

const FX_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Everything that belongs to one run
#[derive(Debug, Clone)]
pub struct Run {
    pub player: Player,
    pub world: World,
    pub timers: PowerupTimers,
    pub spawner: Spawner,
    pub ids: EntityIds,
    pub particles: Particles,
    /// Cosmetic randomness, kept apart from the spawn stream
    pub fx_rng: SpawnRng,
    pub score: f64,
    pub coins: u32,
    pub distance: f64,
    /// Ambient speed in `[base_speed, max_speed]`
    pub speed: f32,
    pub screen_shake: f32,
    /// Simulated ms since the run started
    pub elapsed_ms: f64,
}

impl Run {
    pub fn new(tuning: &Tuning, rng: SpawnRng) -> Self {
        let fx_rng = SpawnRng::seeded(rng.seed() ^ FX_SEED_SALT);
        Self {
            player: Player::default(),
            world: World::default(),
            timers: PowerupTimers::default(),
            spawner: Spawner::new(rng),
            ids: EntityIds::default(),
            particles: Particles::default(),
            fx_rng,
            score: 0.0,
            coins: 0,
            distance: 0.0,
            speed: tuning.base_speed,
            screen_shake: 0.0,
            elapsed_ms: 0.0,
        }
    }

    /// Travel multiplier from the boost power-up
    pub fn boost_factor(&self, tuning: &Tuning) -> f32 {
        if self.timers.is_active(PowerupKind::Boost) {
            tuning.boost_factor
        } else {
            1.0
        }
    }

    /// Speed after the boost multiplier
    pub fn effective_speed(&self, tuning: &Tuning) -> f32 {
        self.speed * self.boost_factor(tuning)
    }

    /// Score rounded down for display and records
    pub fn final_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }
}

/// Read-only per-frame view for the renderer
#[derive(Debug, Clone, Copy)]
pub struct FrameState<'a> {
    pub phase: RunPhase,
    pub entities: &'a [Entity],
    pub player: &'a Player,
    pub score: f64,
    pub coins: u32,
    pub distance: f64,
    pub speed: f32,
    pub powerup_timers: &'a PowerupTimers,
    pub particles: &'a [Particle],
    pub shake: f32,
}

/// Host-owned game session
#[derive(Debug, Clone)]
pub struct RunSession {
    pub tuning: Tuning,
    pub(crate) phase: RunPhase,
    pub(crate) run: Run,
    /// Debug bypass: hazards never resolve
    pub god_mode: bool,
    /// Demo/idle mode: the session steers itself
    pub autopilot: bool,
    pub(crate) events: Vec<GameEvent>,
    /// Fixed seed for tests and demos (runs are seeded `seed + run index`)
    seed: Option<u64>,
    runs_started: u64,
}

impl RunSession {
    /// Session whose runs draw from OS entropy
    pub fn new(tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let run = Run::new(&tuning, SpawnRng::seeded(0));
        Self {
            tuning,
            phase: RunPhase::Menu,
            run,
            god_mode: false,
            autopilot: false,
            events: Vec::new(),
            seed: None,
            runs_started: 0,
        }
    }

    /// Session with reproducible spawns
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        let mut session = Self::new(tuning);
        session.seed = Some(seed);
        session
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn run(&self) -> &Run {
        &self.run
    }

    /// Mutable run access for debug tooling and tests
    pub fn run_mut(&mut self) -> &mut Run {
        &mut self.run
    }

    /// Apply a lifecycle trigger; returns false if the table rejects it
    pub(crate) fn transition(&mut self, trigger: RunTrigger) -> bool {
        match self.phase.next(trigger) {
            Some(next) => {
                log::debug!("Run phase {:?} -> {:?} ({:?})", self.phase, next, trigger);
                self.phase = next;
                true
            }
            None => {
                log::debug!("Ignoring {:?} while {:?}", trigger, self.phase);
                false
            }
        }
    }

    /// Begin a fresh run, discarding the current one
    pub fn start(&mut self) -> bool {
        if !self.transition(RunTrigger::Start) {
            return false;
        }
        let rng = match self.seed {
            Some(seed) => SpawnRng::seeded(seed.wrapping_add(self.runs_started)),
            None => SpawnRng::from_entropy(),
        };
        self.runs_started += 1;
        let seed = rng.seed();
        self.run = Run::new(&self.tuning, rng);
        log::info!("Run {} started with seed: {}", self.runs_started, seed);
        self.events.push(GameEvent::RunStarted { seed });
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.transition(RunTrigger::TogglePause)
    }

    pub fn exit_to_menu(&mut self) -> bool {
        self.transition(RunTrigger::ExitToMenu)
    }

    /// End the run after a fatal collision
    pub(crate) fn crash(&mut self) {
        if self.transition(RunTrigger::Crash) {
            let final_score = self.run.final_score();
            let final_coins = self.run.coins;
            log::info!(
                "Game over: score {} coins {} distance {:.0}",
                final_score,
                final_coins,
                self.run.distance
            );
            self.events.push(GameEvent::GameOver {
                final_score,
                final_coins,
            });
        }
    }

    /// Handle a decoded intent. Motion intents only act while running.
    pub fn on_intent(&mut self, intent: Intent) {
        if intent == Intent::Pause {
            self.toggle_pause();
            return;
        }
        if self.phase != RunPhase::Running {
            return;
        }
        let player = &mut self.run.player;
        match intent {
            Intent::LaneLeft => player.request_lane_change(-1),
            Intent::LaneRight => player.request_lane_change(1),
            Intent::Jump => {
                if player.request_jump(&self.tuning) {
                    self.events.push(GameEvent::Jump);
                }
            }
            Intent::Slide => player.request_slide(&self.tuning),
            Intent::Pause => {}
        }
    }

    /// Place an entity built from a fresh id (debug spawns, scripted scenarios)
    pub fn insert_entity(&mut self, build: impl FnOnce(u32) -> Entity) -> u32 {
        let entity = build(self.run.ids.next_id());
        let id = entity.id;
        self.run.world.extend([entity]);
        id
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn frame_state(&self) -> FrameState<'_> {
        FrameState {
            phase: self.phase,
            entities: &self.run.world.entities,
            player: &self.run.player,
            score: self.run.score,
            coins: self.run.coins,
            distance: self.run.distance,
            speed: self.run.speed,
            powerup_timers: &self.run.timers,
            particles: self.run.particles.as_slice(),
            shake: self.run.screen_shake,
        }
    }
}
