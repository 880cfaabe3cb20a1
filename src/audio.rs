//! Sound cues for game events
//!
//! Procedurally generated tones - no external files needed. Playback belongs to
//! the host; this module only says what to play and how loud.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    Jump,
    Coin,
    Powerup,
    /// Shield took a hit
    ShieldBreak,
    /// Run ended
    Crash,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// How the frequency moves from start to end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ramp {
    Linear,
    Exponential,
}

/// One synthesized tone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    pub ramp: Ramp,
    /// Seconds for the frequency sweep
    pub sweep_secs: f32,
    /// Seconds until the gain envelope has decayed
    pub duration_secs: f32,
}

impl SoundEffect {
    pub fn tone(self) -> ToneSpec {
        let (waveform, start_hz, end_hz, ramp, sweep_secs) = match self {
            SoundEffect::Jump => (Waveform::Triangle, 150.0, 400.0, Ramp::Exponential, 0.1),
            SoundEffect::Coin => (Waveform::Sine, 800.0, 1200.0, Ramp::Exponential, 0.1),
            SoundEffect::Powerup => (Waveform::Square, 400.0, 800.0, Ramp::Linear, 0.2),
            SoundEffect::ShieldBreak => (Waveform::Square, 600.0, 200.0, Ramp::Exponential, 0.2),
            SoundEffect::Crash => (Waveform::Sawtooth, 100.0, 20.0, Ramp::Exponential, 0.3),
        };
        ToneSpec {
            waveform,
            start_hz,
            end_hz,
            ramp,
            sweep_secs,
            duration_secs: 0.3,
        }
    }

    /// Map a simulation event to its cue, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jump => Some(SoundEffect::Jump),
            GameEvent::PickupCoin => Some(SoundEffect::Coin),
            GameEvent::PickupPowerup(_) => Some(SoundEffect::Powerup),
            GameEvent::CrashAbsorbedByShield => Some(SoundEffect::ShieldBreak),
            GameEvent::GameOver { .. } => Some(SoundEffect::Crash),
            GameEvent::RunStarted { .. } => None,
        }
    }
}

/// Host-side playback backend
pub trait SoundSink {
    fn play(&mut self, effect: SoundEffect, tone: &ToneSpec, gain: f32);
}

/// Audio manager for the game
#[derive(Debug, Clone, Default)]
pub struct AudioManager {
    gain: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        Self {
            gain: settings.sfx_gain(),
        }
    }

    /// Refresh volume after settings change
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.gain = settings.sfx_gain();
    }

    /// Play cues for a batch of events; returns how many were played
    pub fn dispatch<'a>(&self, events: impl IntoIterator<Item = &'a GameEvent>, sink: &mut dyn SoundSink) -> usize {
        if self.gain <= 0.0 {
            return 0;
        }
        let mut played = 0;
        for effect in events.into_iter().filter_map(SoundEffect::for_event) {
            sink.play(effect, &effect.tone(), self.gain);
            played += 1;
        }
        played
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PowerupKind;

    #[derive(Default)]
    struct Recorder(Vec<(SoundEffect, f32)>);

    impl SoundSink for Recorder {
        fn play(&mut self, effect: SoundEffect, _tone: &ToneSpec, gain: f32) {
            self.0.push((effect, gain));
        }
    }

    #[test]
    fn test_dispatch_maps_events() {
        let audio = AudioManager::new(&Settings::default());
        let mut sink = Recorder::default();
        let events = [
            GameEvent::RunStarted { seed: 1 },
            GameEvent::Jump,
            GameEvent::PickupPowerup(PowerupKind::Boost),
            GameEvent::GameOver {
                final_score: 10,
                final_coins: 1,
            },
        ];
        assert_eq!(audio.dispatch(&events, &mut sink), 3);
        let effects: Vec<_> = sink.0.iter().map(|(e, _)| *e).collect();
        assert_eq!(effects, vec![SoundEffect::Jump, SoundEffect::Powerup, SoundEffect::Crash]);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        let audio = AudioManager::new(&settings);
        let mut sink = Recorder::default();
        assert_eq!(audio.dispatch(&[GameEvent::PickupCoin], &mut sink), 0);
        assert!(sink.0.is_empty());
    }

    #[test]
    fn test_crash_sweeps_down() {
        let tone = SoundEffect::Crash.tone();
        assert!(tone.end_hz < tone.start_hz);
        assert_eq!(tone.waveform, Waveform::Sawtooth);
    }
}
