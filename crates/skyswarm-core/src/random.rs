//! Injectable randomness.
//!
//! Every random decision the engine makes -- initial drone and building
//! placement, the per-tick event roll, and event content -- goes through a
//! [`RandomSource`]. Production code uses [`SeededRandom`]; tests may pass a
//! seeded instance for reproducibility or a scripted implementation to force
//! specific outcomes.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random values.
pub trait RandomSource {
    /// A uniform value in `[0, 1)`.
    fn unit(&mut self) -> f32;

    /// A uniform integer in `[0, upper)`. Returns 0 when `upper` is 0.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn below(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        let scaled = (f64::from(self.unit()) * f64::from(upper)).floor() as u32;
        scaled.min(upper.saturating_sub(1))
    }

    /// A uniform index into a collection of `len` elements. Returns 0 when
    /// `len` is 0.
    fn index(&mut self, len: usize) -> usize {
        let upper = u32::try_from(len).unwrap_or(u32::MAX);
        usize::try_from(self.below(upper)).unwrap_or(0)
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }
}

/// [`RandomSource`] backed by a small, fast, seedable PRNG.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    /// A generator whose whole output stream is determined by `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// A generator seeded from operating-system entropy.
    pub fn from_os_rng() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Seeded when `seed` is present, entropy-seeded otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os_rng, Self::from_seed)
    }
}

impl RandomSource for SeededRandom {
    fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    fn below(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        self.rng.random_range(0..upper)
    }
}
