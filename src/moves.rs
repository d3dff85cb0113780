//! Move selection over the knowledge base.
//!
//! Prefers a cell proven safe; the random fallback only ever avoids cells
//! proven to be mines, it does not rank the rest.

use crate::knowledge::KnowledgeBase;
use crate::rng::SolverRng;
use crate::types::Cell;

/// First unprobed known-safe cell in row-major order.
pub fn safe_move(kb: &KnowledgeBase) -> Option<Cell> {
    kb.safe()
        .iter()
        .find(|cell| !kb.probed().contains(*cell))
        .copied()
}

/// Uniform choice among cells neither probed nor known to be mines.
pub fn random_move(kb: &KnowledgeBase, rng: &mut SolverRng) -> Option<Cell> {
    let grid = kb.grid();
    if kb.probed().len() == grid.len() {
        return None;
    }

    let candidates: Vec<Cell> = grid
        .cells()
        .filter(|cell| !kb.probed().contains(cell) && !kb.is_known_mine(*cell))
        .collect();

    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.gen_range(candidates.len())])
}
