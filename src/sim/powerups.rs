//! Active power-up durations

use serde::{Deserialize, Serialize};

use super::entity::PowerupKind;

/// Remaining duration per power-up kind, in ms (0 = inactive)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerupTimers {
    remaining: [f32; 4],
}

impl PowerupTimers {
    /// Start a timer, overwriting whatever was left (pickups do not stack)
    pub fn activate(&mut self, kind: PowerupKind, duration_ms: f32) {
        self.remaining[kind.index()] = duration_ms.max(0.0);
    }

    pub fn clear(&mut self, kind: PowerupKind) {
        self.remaining[kind.index()] = 0.0;
    }

    #[inline]
    pub fn remaining(&self, kind: PowerupKind) -> f32 {
        self.remaining[kind.index()]
    }

    #[inline]
    pub fn is_active(&self, kind: PowerupKind) -> bool {
        self.remaining(kind) > 0.0
    }

    /// Count every timer down by `dt` ms, clamping at zero
    pub fn decay(&mut self, dt: f32) {
        for t in &mut self.remaining {
            *t = (*t - dt).max(0.0);
        }
    }

    /// Active kinds with their remaining time, in declaration order
    pub fn active(&self) -> impl Iterator<Item = (PowerupKind, f32)> + '_ {
        PowerupKind::ALL
            .into_iter()
            .map(|k| (k, self.remaining(k)))
            .filter(|&(_, t)| t > 0.0)
    }
}
