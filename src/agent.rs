//! A playing agent: a knowledge base plus the random source it falls back on.

use crate::config::SolverConfig;
use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::moves;
use crate::rng::SolverRng;
use crate::types::Cell;
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    /// Proven safe by the knowledge base.
    Safe,
    /// Uniform pick among cells not known to be mines.
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Move {
    pub cell: Cell,
    pub kind: MoveKind,
}

pub struct Agent {
    knowledge: KnowledgeBase,
    rng: SolverRng,
}

impl Agent {
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            knowledge: KnowledgeBase::from_config(&config)?,
            rng: SolverRng::from_optional_seed(config.seed),
        })
    }

    /// Agent with an explicit random source, for hosts that own seeding.
    pub fn with_rng(knowledge: KnowledgeBase, rng: SolverRng) -> Self {
        Self { knowledge, rng }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn add_observation(&mut self, cell: Cell, count: u8) -> Result<()> {
        self.knowledge.add_observation(cell, count)
    }

    pub fn safe_move(&self) -> Option<Cell> {
        moves::safe_move(&self.knowledge)
    }

    pub fn random_move(&mut self) -> Option<Cell> {
        moves::random_move(&self.knowledge, &mut self.rng)
    }

    /// Safe move when one is proven, random fallback otherwise.
    pub fn next_move(&mut self) -> Option<Move> {
        if let Some(cell) = self.safe_move() {
            return Some(Move {
                cell,
                kind: MoveKind::Safe,
            });
        }
        let cell = self.random_move()?;
        debug!("no safe move, falling back to random {:?}", cell);
        Some(Move {
            cell,
            kind: MoveKind::Random,
        })
    }

    /// Every mine located and every other cell probed.
    pub fn is_solved(&self, total_mines: usize) -> bool {
        let kb = &self.knowledge;
        kb.mines().len() == total_mines
            && kb.probed().len() + total_mines == kb.height() * kb.width()
    }
}
