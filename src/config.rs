//! Engine configuration.
//!
//! Hosts may pass a partial object; missing fields fall back to the
//! classic 8x8 board with an entropy-seeded random source.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Largest grid accepted, in cells. Each cell caches up to eight neighbours.
pub const MAX_CELLS: usize = 1 << 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub height: usize,
    pub width: usize,
    /// Fixed seed for the random-move source. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            height: 8,
            width: 8,
            seed: None,
        }
    }
}

impl SolverConfig {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.height, self.width)
    }
}

pub(crate) fn check_dimensions(height: usize, width: usize) -> Result<()> {
    match height.checked_mul(width) {
        Some(total) if total > 0 && total <= MAX_CELLS => Ok(()),
        _ => Err(Error::InvalidDimensions { height, width }),
    }
}
