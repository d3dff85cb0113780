//! The knowledge base: what is known about the board and how it grows.
//!
//! Each observation `(cell, count)` becomes a [`Sentence`] over the unknown
//! neighbours of `cell`. The base then runs two strategies:
//! - Fixed-point propagation: sentences whose cells are all mines or all
//!   safe resolve, and the result is pushed into every other sentence until
//!   a full pass changes nothing.
//! - Subset inference: for `A ⊆ B`, the cells only `B` covers hold
//!   `B.count - A.count` mines. Run once per observation.
//!
//! Invariants: `safe` and `mines` are disjoint, and no sentence mentions a
//! cell whose status is already known.

use crate::config::{check_dimensions, SolverConfig};
use crate::error::{Error, Known, Result};
use crate::sentence::Sentence;
use crate::types::{Cell, NeighborCache};
use log::{debug, trace};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    neighbors: NeighborCache,
    probed: BTreeSet<Cell>,
    safe: BTreeSet<Cell>,
    mines: BTreeSet<Cell>,
    sentences: Vec<Sentence>,
}

/// Owned copy of the knowledge base for status reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeSnapshot {
    pub height: usize,
    pub width: usize,
    pub probed: Vec<Cell>,
    pub safe: Vec<Cell>,
    pub mines: Vec<Cell>,
    pub sentences: Vec<Sentence>,
}

impl KnowledgeBase {
    pub fn new(height: usize, width: usize) -> Result<Self> {
        check_dimensions(height, width)?;
        Ok(Self {
            neighbors: NeighborCache::new(height, width),
            probed: BTreeSet::new(),
            safe: BTreeSet::new(),
            mines: BTreeSet::new(),
            sentences: Vec::new(),
        })
    }

    pub fn from_config(config: &SolverConfig) -> Result<Self> {
        Self::new(config.height, config.width)
    }

    // ─── Views ──────────────────────────────────────────────────────────────

    pub fn height(&self) -> usize {
        self.neighbors.height
    }

    pub fn width(&self) -> usize {
        self.neighbors.width
    }

    pub fn probed(&self) -> &BTreeSet<Cell> {
        &self.probed
    }

    pub fn safe(&self) -> &BTreeSet<Cell> {
        &self.safe
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn is_known_safe(&self, cell: Cell) -> bool {
        self.safe.contains(&cell)
    }

    pub fn is_known_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    pub(crate) fn grid(&self) -> &NeighborCache {
        &self.neighbors
    }

    /// True when `safe` and `mines` are disjoint and every sentence keeps
    /// `0 <= count <= |cells|` over unknown cells only.
    pub fn is_consistent(&self) -> bool {
        self.safe.is_disjoint(&self.mines)
            && self.sentences.iter().all(|s| {
                s.is_consistent()
                    && s.cells()
                        .iter()
                        .all(|c| !self.safe.contains(c) && !self.mines.contains(c))
            })
    }

    pub fn snapshot(&self) -> KnowledgeSnapshot {
        KnowledgeSnapshot {
            height: self.height(),
            width: self.width(),
            probed: self.probed.iter().copied().collect(),
            safe: self.safe.iter().copied().collect(),
            mines: self.mines.iter().copied().collect(),
            sentences: self.sentences.clone(),
        }
    }

    fn check_bounds(&self, cell: Cell) -> Result<()> {
        if self.neighbors.in_bounds(cell) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                cell,
                height: self.height(),
                width: self.width(),
            })
        }
    }

    // ─── Observation intake ─────────────────────────────────────────────────

    /// Records that `cell` was probed safely and has `count` mines around it,
    /// then draws every conclusion that follows.
    pub fn add_observation(&mut self, cell: Cell, count: u8) -> Result<()> {
        self.check_bounds(cell)?;
        if self.mines.contains(&cell) {
            return Err(Error::Contradiction {
                cell,
                known: Known::Mine,
            });
        }
        debug!("observation {:?} = {}", cell, count);

        self.probed.insert(cell);
        self.mark_safe_unchecked(cell);

        let mut remaining = i32::from(count);
        let mut unknown = BTreeSet::new();
        for &n in self.neighbors.get(cell) {
            if self.probed.contains(&n) {
                continue;
            }
            if self.mines.contains(&n) {
                remaining -= 1;
            } else if !self.safe.contains(&n) {
                unknown.insert(n);
            }
        }

        if unknown.is_empty() {
            if remaining != 0 {
                debug!(
                    "observation {:?} leaves {} mines with no unknown neighbours",
                    cell, remaining
                );
            }
        } else {
            self.sentences.push(Sentence::new(unknown, remaining));
        }

        let passes = self.propagate();
        let derived = self.infer_subsets();
        debug!(
            "after {:?}: {} propagation passes, {} derived, {} sentences, {} safe, {} mines",
            cell,
            passes,
            derived,
            self.sentences.len(),
            self.safe.len(),
            self.mines.len()
        );
        Ok(())
    }

    /// Asserts an externally known constraint. Known cells are folded out;
    /// returns whether a new sentence was stored. Does not propagate.
    pub fn add_sentence(&mut self, sentence: Sentence) -> Result<bool> {
        for &cell in sentence.cells() {
            self.check_bounds(cell)?;
        }
        let mut count = sentence.count();
        let mut unknown = BTreeSet::new();
        for &cell in sentence.cells() {
            if self.mines.contains(&cell) {
                count -= 1;
            } else if !self.safe.contains(&cell) {
                unknown.insert(cell);
            }
        }
        if unknown.is_empty() {
            return Ok(false);
        }
        let sentence = Sentence::new(unknown, count);
        if self.sentences.contains(&sentence) {
            return Ok(false);
        }
        self.sentences.push(sentence);
        Ok(true)
    }

    // ─── Marking ────────────────────────────────────────────────────────────

    /// Records `cell` as a mine everywhere. Idempotent.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<()> {
        self.check_bounds(cell)?;
        if self.safe.contains(&cell) {
            return Err(Error::Contradiction {
                cell,
                known: Known::Safe,
            });
        }
        self.mark_mine_unchecked(cell);
        Ok(())
    }

    /// Records `cell` as safe everywhere. Idempotent.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<()> {
        self.check_bounds(cell)?;
        if self.mines.contains(&cell) {
            return Err(Error::Contradiction {
                cell,
                known: Known::Mine,
            });
        }
        self.mark_safe_unchecked(cell);
        Ok(())
    }

    fn mark_mine_unchecked(&mut self, cell: Cell) {
        if self.mines.insert(cell) {
            trace!("mine {:?}", cell);
        }
        for sentence in &mut self.sentences {
            sentence.mark_mine(cell);
        }
    }

    fn mark_safe_unchecked(&mut self, cell: Cell) {
        if self.safe.insert(cell) {
            trace!("safe {:?}", cell);
        }
        for sentence in &mut self.sentences {
            sentence.mark_safe(cell);
        }
    }

    // ─── Strategy 1: fixed-point propagation ────────────────────────────────

    /// Resolves sentences until a full pass yields nothing. Returns the
    /// number of passes that made progress.
    ///
    /// Within a pass only the visited sentence can be removed and nothing is
    /// appended, so walking the live list by index visits exactly the
    /// sentences present when the pass began.
    pub fn propagate(&mut self) -> usize {
        let mut passes = 0;
        loop {
            let mut updated = false;
            let mut i = 0;
            while i < self.sentences.len() {
                let mines = self.sentences[i].known_mines();
                let safes = self.sentences[i].known_safes();
                if !mines.is_empty() || !safes.is_empty() {
                    updated = true;
                }
                for cell in mines {
                    self.mark_mine_unchecked(cell);
                }
                for cell in safes {
                    self.mark_safe_unchecked(cell);
                }

                if self.sentences[i].is_empty() {
                    self.sentences.remove(i);
                } else {
                    i += 1;
                }
            }

            if !updated {
                return passes;
            }
            passes += 1;
        }
    }

    // ─── Strategy 2: subset inference ───────────────────────────────────────

    /// One pass of subset elimination over every ordered pair of distinct
    /// sentences. Returns how many new sentences were appended.
    pub fn infer_subsets(&mut self) -> usize {
        let mut inferred: Vec<Sentence> = Vec::new();

        for a in &self.sentences {
            for b in &self.sentences {
                if a == b || !a.is_subset(b) {
                    continue;
                }
                let derived = b.difference(a);
                if self.sentences.contains(&derived) || inferred.contains(&derived) {
                    continue;
                }
                trace!("derived {:?}", derived);
                inferred.push(derived);
            }
        }

        let added = inferred.len();
        self.sentences.extend(inferred);
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: usize, col: usize) -> Cell {
        Cell::new(row, col)
    }

    fn set(cells: &[(usize, usize)]) -> BTreeSet<Cell> {
        cells.iter().map(|&p| Cell::from(p)).collect()
    }

    #[test]
    fn test_new_rejects_bad_dimensions() {
        assert_eq!(
            KnowledgeBase::new(0, 8).unwrap_err(),
            Error::InvalidDimensions { height: 0, width: 8 }
        );
        assert!(matches!(
            KnowledgeBase::new(0xFFFF, 0xFFFF),
            Err(Error::InvalidDimensions { .. })
        ));
        let kb = KnowledgeBase::from_config(&SolverConfig::default()).unwrap();
        assert_eq!((kb.height(), kb.width()), (8, 8));
        assert!(kb.sentences().is_empty());
    }

    #[test]
    fn test_observation_out_of_bounds() {
        let mut kb = KnowledgeBase::new(4, 4).unwrap();
        let err = kb.add_observation(c(4, 0), 0).unwrap_err();
        assert_eq!(
            err,
            Error::OutOfBounds {
                cell: c(4, 0),
                height: 4,
                width: 4
            }
        );
        assert!(kb.probed().is_empty());
        assert!(kb.safe().is_empty());
    }

    #[test]
    fn test_zero_observation_clears_neighbourhood() {
        let mut kb = KnowledgeBase::new(8, 8).unwrap();
        kb.add_observation(c(0, 0), 0).unwrap();
        assert_eq!(kb.safe(), &set(&[(0, 0), (0, 1), (1, 0), (1, 1)]));
        assert!(kb.sentences().is_empty());
        assert!(kb.mines().is_empty());
    }

    #[test]
    fn test_observation_builds_sentence() {
        let mut kb = KnowledgeBase::new(3, 3).unwrap();
        kb.add_observation(c(0, 0), 1).unwrap();
        assert_eq!(kb.sentences(), &[Sentence::new(set(&[(0, 1), (1, 0), (1, 1)]), 1)]);
        assert_eq!(kb.safe(), &set(&[(0, 0)]));
    }

    #[test]
    fn test_observation_folds_known_mine() {
        let mut kb = KnowledgeBase::new(3, 3).unwrap();
        kb.mark_mine(c(1, 1)).unwrap();
        kb.add_observation(c(0, 0), 2).unwrap();
        assert_eq!(kb.sentences(), &[Sentence::new(set(&[(0, 1), (1, 0)]), 1)]);
    }

    #[test]
    fn test_observation_on_known_mine_is_rejected() {
        let mut kb = KnowledgeBase::new(3, 3).unwrap();
        kb.mark_mine(c(1, 1)).unwrap();
        assert_eq!(
            kb.add_observation(c(1, 1), 0),
            Err(Error::Contradiction {
                cell: c(1, 1),
                known: Known::Mine
            })
        );
        assert!(kb.probed().is_empty());
    }

    #[test]
    fn test_reobserving_appends_duplicate_sentence() {
        let mut kb = KnowledgeBase::new(5, 5).unwrap();
        kb.add_observation(c(2, 2), 1).unwrap();
        let before = kb.snapshot();
        kb.add_observation(c(2, 2), 1).unwrap();
        let after = kb.snapshot();
        assert_eq!(after.probed, before.probed);
        assert_eq!(after.safe, before.safe);
        assert_eq!(after.mines, before.mines);
        assert_eq!(after.sentences.len(), before.sentences.len() + 1);
        assert_eq!(after.sentences[0], after.sentences[1]);
    }

    #[test]
    fn test_observation_runs_subset_inference_once() {
        let mut kb = KnowledgeBase::new(3, 3).unwrap();
        kb.mark_safe(c(1, 2)).unwrap();
        kb.add_sentence(Sentence::new(set(&[(0, 0), (0, 2), (1, 0)]), 1)).unwrap();
        // unknown neighbours of (0,1): the seeded three plus (1,1)
        kb.add_observation(c(0, 1), 2).unwrap();

        let derived = Sentence::new(set(&[(1, 1)]), 1);
        assert!(kb.sentences().contains(&derived));
        assert!(!kb.is_known_mine(c(1, 1)));

        assert!(kb.propagate() > 0);
        assert!(kb.is_known_mine(c(1, 1)));
        assert!(!kb.sentences().contains(&derived));
    }

    #[test]
    fn test_direct_resolution() {
        let mut kb = KnowledgeBase::new(4, 4).unwrap();
        assert!(kb.add_sentence(Sentence::new(set(&[(1, 1), (1, 2)]), 0)).unwrap());
        assert_eq!(kb.propagate(), 1);
        assert!(kb.is_known_safe(c(1, 1)));
        assert!(kb.is_known_safe(c(1, 2)));
        assert!(kb.sentences().is_empty());
    }

    #[test]
    fn test_resolution_spreads_to_other_sentences() {
        let mut kb = KnowledgeBase::new(4, 4).unwrap();
        kb.add_sentence(Sentence::new(set(&[(0, 0), (0, 1), (0, 2)]), 1)).unwrap();
        kb.add_sentence(Sentence::new(set(&[(0, 1), (0, 2)]), 0)).unwrap();
        kb.propagate();
        assert!(kb.is_known_mine(c(0, 0)));
        assert_eq!(kb.safe(), &set(&[(0, 1), (0, 2)]));
        assert!(kb.sentences().is_empty());
    }

    #[test]
    fn test_subset_inference_soundness() {
        let mut kb = KnowledgeBase::new(4, 4).unwrap();
        let a = Sentence::new(set(&[(0, 0), (0, 1), (0, 2)]), 1);
        let b = Sentence::new(set(&[(0, 0), (0, 1), (0, 2), (1, 0)]), 2);
        kb.add_sentence(a).unwrap();
        kb.add_sentence(b).unwrap();

        assert_eq!(kb.infer_subsets(), 1);
        assert!(kb.sentences().contains(&Sentence::new(set(&[(1, 0)]), 1)));
        assert!(kb.mines().is_empty());

        kb.propagate();
        assert_eq!(kb.mines(), &set(&[(1, 0)]));
        assert!(kb.is_consistent());
    }

    #[test]
    fn test_subset_inference_dedupes() {
        let mut kb = KnowledgeBase::new(4, 4).unwrap();
        kb.add_sentence(Sentence::new(set(&[(0, 0)]), 0)).unwrap();
        kb.add_sentence(Sentence::new(set(&[(0, 0), (0, 1)]), 1)).unwrap();
        kb.add_sentence(Sentence::new(set(&[(0, 1)]), 1)).unwrap();
        // {0,1}-{0} = {(0,1)}=1 is already present; {0,1}-{(0,1)} = {(0,0)}=0 too
        assert_eq!(kb.infer_subsets(), 0);
        assert_eq!(kb.sentences().len(), 3);
    }

    #[test]
    fn test_subset_inference_runs_once() {
        let mut kb = KnowledgeBase::new(1, 4).unwrap();
        kb.add_sentence(Sentence::new(set(&[(0, 0)]), 0)).unwrap();
        kb.add_sentence(Sentence::new(set(&[(0, 0), (0, 1)]), 1)).unwrap();
        kb.add_sentence(Sentence::new(set(&[(0, 0), (0, 1), (0, 2), (0, 3)]), 2)).unwrap();
        let first = kb.infer_subsets();
        assert_eq!(first, 3);
        // a second pass finds pairs involving the new sentences
        assert!(kb.infer_subsets() > 0);
    }

    #[test]
    fn test_add_sentence_folds_known_cells() {
        let mut kb = KnowledgeBase::new(3, 3).unwrap();
        kb.mark_safe(c(0, 0)).unwrap();
        kb.mark_mine(c(0, 1)).unwrap();
        assert!(kb
            .add_sentence(Sentence::new(set(&[(0, 0), (0, 1), (0, 2)]), 2))
            .unwrap());
        assert_eq!(kb.sentences(), &[Sentence::new(set(&[(0, 2)]), 1)]);
        // duplicate and fully-known sentences are not stored
        assert!(!kb.add_sentence(Sentence::new(set(&[(0, 2)]), 1)).unwrap());
        assert!(!kb.add_sentence(Sentence::new(set(&[(0, 0)]), 0)).unwrap());
        assert!(kb.add_sentence(Sentence::new(set(&[(9, 9)]), 0)).is_err());
    }

    #[test]
    fn test_marking_is_idempotent() {
        let mut kb = KnowledgeBase::new(3, 3).unwrap();
        kb.add_sentence(Sentence::new(set(&[(0, 0), (0, 1), (1, 1)]), 2)).unwrap();
        kb.mark_mine(c(0, 0)).unwrap();
        kb.mark_safe(c(2, 2)).unwrap();
        let once = kb.snapshot();
        kb.mark_mine(c(0, 0)).unwrap();
        kb.mark_safe(c(2, 2)).unwrap();
        assert_eq!(kb.snapshot(), once);
        assert_eq!(kb.sentences(), &[Sentence::new(set(&[(0, 1), (1, 1)]), 1)]);
    }

    #[test]
    fn test_contradicting_marks_rejected() {
        let mut kb = KnowledgeBase::new(3, 3).unwrap();
        kb.mark_safe(c(1, 1)).unwrap();
        assert!(matches!(
            kb.mark_mine(c(1, 1)),
            Err(Error::Contradiction { known: Known::Safe, .. })
        ));
        kb.mark_mine(c(0, 0)).unwrap();
        assert!(kb.mark_safe(c(0, 0)).is_err());
        assert!(kb.safe().is_disjoint(kb.mines()));
    }

    #[test]
    fn test_unsatisfiable_observation_is_kept_silently() {
        let mut kb = KnowledgeBase::new(1, 2).unwrap();
        kb.add_observation(c(0, 0), 0).unwrap();
        // (0,1) is already safe, so a count of 1 has nowhere to go
        kb.add_observation(c(0, 1), 1).unwrap();
        assert!(kb.sentences().is_empty());
        assert!(kb.mines().is_empty());
    }

    #[test]
    fn test_snapshot_lists_state() {
        let mut kb = KnowledgeBase::new(3, 3).unwrap();
        kb.add_observation(c(0, 0), 1).unwrap();
        let snap = kb.snapshot();
        assert_eq!(snap.probed, vec![c(0, 0)]);
        assert_eq!(snap.safe, vec![c(0, 0)]);
        assert!(snap.mines.is_empty());
        assert_eq!(snap.sentences.len(), 1);
        assert_eq!((snap.height, snap.width), (3, 3));
    }
}
