//! Math utilities
//!
//! Re-exports glam and adds the seeded jitter source used for batch spawning.

pub use glam::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded random source for spawn jitter.
///
/// Two simulations created with the same seed scatter their batches
/// identically, which keeps scripted sessions reproducible.
#[derive(Debug, Clone)]
pub struct JitterRng {
    seed: u64,
    rng: StdRng,
}

impl JitterRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform offset in `[-extent/2, extent/2)` on every axis.
    pub fn offset(&mut self, extent: f32) -> Vec3 {
        if !(extent > 0.0) {
            return Vec3::ZERO;
        }
        let half = 0.5 * extent;
        Vec3::new(
            self.rng.random_range(-half..half),
            self.rng.random_range(-half..half),
            self.rng.random_range(-half..half),
        )
    }
}
