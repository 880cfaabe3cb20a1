//! Frame-driven simulation module
//!
//! All gameplay logic lives here:
//! - Wall-clock `dt` in ms, every rate scaled by it
//! - One owner (`RunSession`) for all run state
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod entity;
pub mod particles;
pub mod player;
pub mod powerups;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{Outcome, Pickup, resolve};
pub use entity::{Entity, EntityKind, Lane, PowerupKind};
pub use particles::{Particle, Particles};
pub use player::Player;
pub use powerups::PowerupTimers;
pub use rng::SpawnRng;
pub use spawner::{EntityIds, SpawnCategory, Spawner};
pub use state::{FrameState, GameEvent, Intent, Run, RunPhase, RunSession, RunTrigger};
pub use tick::{autopilot_intent, travel_over};
pub use world::{Contact, World, WorldStep};
