//! Core data types: cells and the precomputed neighbourhood table.
//!
//! Cells are addressed as `(row, col)` and ordered row-major, so every
//! `BTreeSet<Cell>` in the engine iterates in the same order the grid is read.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A grid position. Immutable identifier used as set element and map key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline(always)]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Pre-computed neighbor cache for all cells.
///
/// Stores the 8-directional neighbors (clipped to grid bounds) for every cell.
/// Indexed by `row * width + col`, each entry is a slice of cells.
#[derive(Debug, Clone)]
pub struct NeighborCache {
    pub height: usize,
    pub width: usize,
    data: Vec<Cell>,
    /// offsets[i]..offsets[i+1] is the slice of `data` owned by cell i.
    offsets: Vec<usize>,
}

impl NeighborCache {
    pub fn new(height: usize, width: usize) -> Self {
        let total = height * width;
        let mut data = Vec::with_capacity(total * 8);
        let mut offsets = Vec::with_capacity(total + 1);

        for row in 0..height {
            for col in 0..width {
                offsets.push(data.len());
                for dr in -1i64..=1 {
                    for dc in -1i64..=1 {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        let nr = row as i64 + dr;
                        let nc = col as i64 + dc;
                        if nr >= 0 && nr < height as i64 && nc >= 0 && nc < width as i64 {
                            data.push(Cell::new(nr as usize, nc as usize));
                        }
                    }
                }
            }
        }
        offsets.push(data.len()); // sentinel

        Self {
            height,
            width,
            data,
            offsets,
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Neighbors of `cell`, excluding the cell itself. Caller checks bounds.
    #[inline(always)]
    pub fn get(&self, cell: Cell) -> &[Cell] {
        let idx = cell.row * self.width + cell.col;
        &self.data[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Every cell of the grid in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Cell::new(row, col)))
    }

    pub fn len(&self) -> usize {
        self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
