//! Game settings and preferences
//!
//! Persisted separately from progress by the host.

use serde::{Deserialize, Serialize};

/// Debug overlays and cheats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugFlags {
    /// Draw collision boxes
    pub hitboxes: bool,
    /// Show FPS / speed readout
    pub fps: bool,
    /// Hazards never resolve
    pub god_mode: bool,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Screen shake on shield hits
    pub screen_shake: bool,
    /// Player motion trail
    pub trails: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Onboarding ===
    /// Show the controls overlay at run start
    pub tutorial: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,

    pub debug: DebugFlags,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,
            trails: true,

            master_volume: 0.8,
            sfx_volume: 0.5,
            muted: false,

            tutorial: true,

            reduced_motion: false,

            debug: DebugFlags::default(),
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Shake amplitude the renderer should apply this frame
    pub fn shake_amplitude(&self, shake: f32) -> f32 {
        if self.effective_screen_shake() { shake } else { 0.0 }
    }

    /// Combined gain for sound effects
    pub fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }
}
