//! Random source for the spawner
//!
//! Runs are not replayable, so the default source is seeded from OS entropy.
//! A fixed seed is still accepted for tests and demos.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Spawner RNG
#[derive(Debug, Clone)]
pub struct SpawnRng {
    seed: u64,
    inner: Pcg32,
}

impl SpawnRng {
    /// Seed from entropy
    pub fn from_entropy() -> Self {
        Self::seeded(rand::rng().random())
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this source was created with (for logs)
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform in [0, 1)
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    /// True with probability `p`
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// Uniform index in `0..n` (n must be non-zero)
    #[inline]
    pub fn index(&mut self, n: usize) -> usize {
        self.inner.random_range(0..n)
    }
}
