//! Knowledge-base inference engine for Minesweeper.
//!
//! Observations `(cell, count)` are turned into sentences ("exactly `count`
//! of these cells are mines") and propagated to a fixed point; the engine
//! only ever reports conclusions that are logically certain.
//! On `wasm32` the [`agent::Agent`] is also exported to JavaScript.

pub mod agent;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod moves;
pub mod rng;
pub mod sentence;
pub mod types;

pub use agent::{Agent, Move, MoveKind};
pub use config::SolverConfig;
pub use error::{Error, Result};
pub use knowledge::{KnowledgeBase, KnowledgeSnapshot};
pub use rng::SolverRng;
pub use sentence::Sentence;
pub use types::Cell;

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use crate::{Agent, Cell, SolverConfig};
    use wasm_bindgen::prelude::*;

    fn cell_object(cell: Cell) -> Result<JsValue, JsValue> {
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"row".into(), &(cell.row as u32).into())?;
        js_sys::Reflect::set(&obj, &"col".into(), &(cell.col as u32).into())?;
        Ok(obj.into())
    }

    fn optional_cell(cell: Option<Cell>) -> Result<JsValue, JsValue> {
        match cell {
            Some(cell) => cell_object(cell),
            None => Ok(JsValue::NULL),
        }
    }

    /// JS handle around a playing agent.
    #[wasm_bindgen(js_name = "MinesweeperAi")]
    pub struct WasmAgent {
        inner: Agent,
    }

    #[wasm_bindgen(js_class = "MinesweeperAi")]
    impl WasmAgent {
        /// `config` is `{ height?, width?, seed? }`; `undefined` gives an 8x8 board.
        #[wasm_bindgen(constructor)]
        pub fn new(config: JsValue) -> Result<WasmAgent, JsError> {
            let config: SolverConfig = if config.is_undefined() || config.is_null() {
                SolverConfig::default()
            } else {
                serde_wasm_bindgen::from_value(config)?
            };
            Ok(WasmAgent {
                inner: Agent::new(config)?,
            })
        }

        #[wasm_bindgen(js_name = "addObservation")]
        pub fn add_observation(
            &mut self,
            row: usize,
            col: usize,
            count: u8,
        ) -> Result<(), JsError> {
            self.inner.add_observation(Cell::new(row, col), count)?;
            Ok(())
        }

        /// `{ row, col }` or `null`.
        #[wasm_bindgen(js_name = "safeMove")]
        pub fn safe_move(&self) -> Result<JsValue, JsValue> {
            optional_cell(self.inner.safe_move())
        }

        /// `{ row, col }` or `null`.
        #[wasm_bindgen(js_name = "randomMove")]
        pub fn random_move(&mut self) -> Result<JsValue, JsValue> {
            optional_cell(self.inner.random_move())
        }

        /// `{ cell: { row, col }, kind: "safe" | "random" }` or `null`.
        #[wasm_bindgen(js_name = "nextMove")]
        pub fn next_move(&mut self) -> Result<JsValue, JsError> {
            match self.inner.next_move() {
                Some(mv) => Ok(serde_wasm_bindgen::to_value(&mv)?),
                None => Ok(JsValue::NULL),
            }
        }

        /// `{ height, width, probed, safe, mines, sentences }`.
        pub fn snapshot(&self) -> Result<JsValue, JsError> {
            Ok(serde_wasm_bindgen::to_value(&self.inner.knowledge().snapshot())?)
        }

        #[wasm_bindgen(js_name = "isSolved")]
        pub fn is_solved(&self, total_mines: usize) -> bool {
            self.inner.is_solved(total_mines)
        }
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM knowledge base ready".to_string()
    }
}
