//! Random source for the fallback move.
//!
//! Seeded sources replay the same sequence of random moves, which is what
//! tests and replays rely on. Unseeded ones draw from OS entropy.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform index source handed to [`crate::moves::random_move`].
pub struct SolverRng {
    inner: SmallRng,
}

impl SolverRng {
    /// Unseeded: draws from OS entropy.
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::new(),
        }
    }

    /// Index in `0..max`. Panics when `max` is zero.
    #[inline(always)]
    pub fn gen_range(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }
}

impl Default for SolverRng {
    fn default() -> Self {
        Self::new()
    }
}
