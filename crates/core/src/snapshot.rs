use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::puzzle::Puzzle;
use crate::types::{Difficulty, GamePhase, ShapeId, TOTAL_STAGES};

/// Immutable copy of the game state.
///
/// The puzzle and the placed-id set are shared with the state they were taken
/// from; the state copies them on its next write, so a snapshot never changes
/// after it is taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub difficulty: Difficulty,
    pub current_stage: u32,
    pub total_stages: u32,
    pub phase: GamePhase,
    pub puzzle: Option<Arc<Puzzle>>,
    pub placed_shape_ids: Arc<BTreeSet<ShapeId>>,
}

impl GameSnapshot {
    pub fn progress(&self) -> (u32, u32) {
        (self.current_stage, self.total_stages)
    }

    pub fn placed_count(&self) -> usize {
        self.placed_shape_ids.len()
    }

    pub fn is_all_placed(&self) -> bool {
        self.puzzle.as_ref().is_some_and(|p| {
            p.shapes
                .iter()
                .all(|s| self.placed_shape_ids.contains(&s.shape.id))
        })
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            current_stage: 1,
            total_stages: TOTAL_STAGES,
            phase: GamePhase::Menu,
            puzzle: None,
            placed_shape_ids: Arc::new(BTreeSet::new()),
        }
    }
}
