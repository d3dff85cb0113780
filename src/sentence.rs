//! A single constraint: exactly `count` of `cells` are mines.

use crate::types::Cell;
use serde::Serialize;
use std::collections::BTreeSet;

/// Logical statement about the board.
///
/// Equality is structural: two sentences over the same cells with the same
/// count are the same sentence, whoever produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    /// Signed so that inconsistent input cannot underflow.
    count: i32,
}

impl Sentence {
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: i32) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            count,
        }
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// Every cell is a mine when the count covers the whole set.
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if self.count != 0 && self.cells.len() == self.count as usize {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Every cell is safe when the count is zero.
    pub fn known_safes(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Removes `cell` and takes one mine off the count. No-op for non-members.
    pub fn mark_mine(&mut self, cell: Cell) -> bool {
        if self.cells.remove(&cell) {
            self.count -= 1;
            true
        } else {
            false
        }
    }

    /// Removes `cell`, count unchanged. No-op for non-members.
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        self.cells.remove(&cell)
    }

    pub fn is_subset(&self, other: &Sentence) -> bool {
        self.cells.is_subset(&other.cells)
    }

    /// `self - other`: the cells only `self` covers hold the remaining mines.
    /// Sound when `other` is a subset of `self`.
    pub fn difference(&self, other: &Sentence) -> Sentence {
        Sentence {
            cells: self.cells.difference(&other.cells).copied().collect(),
            count: self.count - other.count,
        }
    }

    /// `0 <= count <= |cells|`.
    pub fn is_consistent(&self) -> bool {
        self.count >= 0 && self.count as usize <= self.cells.len()
    }
}
