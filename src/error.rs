//! Error types for the knowledge-base engine.

use crate::types::Cell;
use thiserror::Error;

/// Status a cell is already known to have when a conflicting mark arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Known {
    Safe,
    Mine,
}

impl std::fmt::Display for Known {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Known::Safe => f.write_str("safe"),
            Known::Mine => f.write_str("a mine"),
        }
    }
}

/// Main error type for the crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("cell ({}, {}) is outside the {height}x{width} grid", .cell.row, .cell.col)]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error(
        "invalid grid dimensions {height}x{width} (need 1..={} cells)",
        crate::config::MAX_CELLS
    )]
    InvalidDimensions { height: usize, width: usize },

    #[error("cell ({}, {}) is already known to be {known}", .cell.row, .cell.col)]
    Contradiction { cell: Cell, known: Known },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
