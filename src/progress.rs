//! Persistent player progress
//!
//! Best score, banked coins and skin choice. The simulation never reads this;
//! the host consults it once a run ends.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Number of selectable player skins
pub const SKIN_COUNT: usize = 3;

/// Outcome of recording a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub score: u64,
    pub coins: u32,
    pub new_high_score: bool,
    /// Best score before this run
    pub previous_best: u64,
}

/// Saved progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub high_score: u64,
    pub total_coins: u64,
    pub active_skin: usize,
    pub runs_played: u32,
}

impl Progress {
    /// Check if a score beats the stored best
    pub fn is_new_high_score(&self, score: u64) -> bool {
        score > self.high_score
    }

    /// Fold a finished run into the totals
    pub fn record_run(&mut self, score: u64, coins: u32) -> RunSummary {
        let previous_best = self.high_score;
        let new_high_score = self.is_new_high_score(score);
        if new_high_score {
            self.high_score = score;
        }
        self.total_coins += u64::from(coins);
        self.runs_played += 1;
        RunSummary {
            score,
            coins,
            new_high_score,
            previous_best,
        }
    }

    /// Select a skin; out-of-range indices are ignored
    pub fn select_skin(&mut self, index: usize) -> bool {
        if index < SKIN_COUNT {
            self.active_skin = index;
            true
        } else {
            false
        }
    }
}

/// Storage backend for [`Progress`]
pub trait ProgressStore {
    /// Load saved progress, or defaults if nothing is stored
    fn load(&self) -> anyhow::Result<Progress>;
    fn save(&mut self, progress: &Progress) -> anyhow::Result<()>;
    /// Forget everything ("reset progress")
    fn clear(&mut self) -> anyhow::Result<()>;
}

/// Keeps progress in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Option<Progress>,
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> anyhow::Result<Progress> {
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, progress: &Progress) -> anyhow::Result<()> {
        self.saved = Some(progress.clone());
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.saved = None;
        Ok(())
    }
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self) -> anyhow::Result<Progress> {
        if !self.path.exists() {
            log::info!("No progress at {}, starting fresh", self.path.display());
            return Ok(Progress::default());
        }
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading progress {}", self.path.display()))?;
        let progress: Progress = serde_json::from_str(&json)
            .with_context(|| format!("parsing progress {}", self.path.display()))?;
        log::info!("Loaded progress (best {})", progress.high_score);
        Ok(progress)
    }

    fn save(&mut self, progress: &Progress) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(progress).context("serializing progress")?;
        // Write-then-rename so a crash never leaves a truncated file
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        log::info!("Progress saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("removing {}", self.path.display()))?;
        }
        Ok(())
    }
}
