//! Rail Dash headless runner
//!
//! Drives a session with a fixed frame clock, lets the autopilot play, and
//! records the result to the progress file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use rail_dash::audio::{AudioManager, SoundEffect, SoundSink, ToneSpec};
use rail_dash::progress::{JsonFileStore, MemoryStore, ProgressStore};
use rail_dash::sim::{GameEvent, RunPhase, RunSession};
use rail_dash::{Projector, Settings, Tuning, Viewport};

#[derive(Parser, Debug)]
#[command(version, about = "Headless Rail Dash simulation")]
struct Args {
    /// Spawn seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds before stopping
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,
    /// Frame length in ms
    #[arg(long, default_value_t = 16.0)]
    dt: f32,
    /// JSON tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Progress file (kept in memory if omitted)
    #[arg(long)]
    progress: Option<PathBuf>,
    /// Hazards never resolve
    #[arg(long)]
    god_mode: bool,
    /// Disable the autopilot (the runner will not steer)
    #[arg(long)]
    manual: bool,
}

/// Logs cues instead of playing them
struct LogSink;

impl SoundSink for LogSink {
    fn play(&mut self, effect: SoundEffect, tone: &ToneSpec, gain: f32) {
        log::debug!(
            "sfx {:?}: {:?} {:.0}->{:.0} Hz gain {:.2}",
            effect,
            tone.waveform,
            tone.start_hz,
            tone.end_hz,
            gain
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Rail Dash (headless) starting...");

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let mut store: Box<dyn ProgressStore> = match &args.progress {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::default()),
    };
    let mut progress = store.load().context("loading progress")?;

    let settings = Settings::default();
    let audio = AudioManager::new(&settings);
    let mut sink = LogSink;
    let projector = Projector::new(Viewport::new(1280.0, 720.0));

    let mut session = match args.seed {
        Some(seed) => RunSession::with_seed(tuning, seed),
        None => RunSession::new(tuning),
    };
    session.god_mode = args.god_mode || settings.debug.god_mode;
    session.autopilot = !args.manual;
    session.start();

    let dt = args.dt.max(1.0);
    let frames = (args.seconds.max(0.0) * 1000.0 / dt).ceil() as u64;
    let mut last_report = 0.0;

    for _ in 0..frames {
        session.tick(dt);

        let events = session.drain_events();
        audio.dispatch(&events, &mut sink);

        for event in &events {
            if let GameEvent::GameOver {
                final_score,
                final_coins,
            } = *event
            {
                let summary = progress.record_run(final_score, final_coins);
                if summary.new_high_score {
                    log::info!("New high score: {} (was {})", summary.score, summary.previous_best);
                }
            }
        }

        let frame = session.frame_state();
        if frame.distance - last_report >= 2000.0 {
            last_report = frame.distance;
            let visible = projector
                .layout(frame.entities)
                .iter()
                .filter(|item| !projector.above_horizon(&item.front))
                .count();
            log::info!(
                "distance {:.0} score {:.0} coins {} speed {:.1} entities {} particles {}",
                frame.distance,
                frame.score,
                frame.coins,
                frame.speed,
                visible,
                frame.particles.len()
            );
        }

        if session.phase() == RunPhase::GameOver {
            break;
        }
    }

    if session.phase() == RunPhase::Running {
        let run = session.run();
        let summary = progress.record_run(run.final_score(), run.coins);
        log::info!("Time limit reached with score {}", summary.score);
    }

    store.save(&progress).context("saving progress")?;
    println!(
        "score {} | coins {} | distance {:.0} | best {} | banked coins {}",
        session.run().final_score(),
        session.run().coins,
        session.run().distance,
        progress.high_score,
        progress.total_coins
    );
    Ok(())
}
