//! Game events - notifications for observers (sound, effects, drivers)
//!
//! Transitions queue events on the state; observers drain them with
//! [`crate::GameState::take_events`]. The core never plays audio itself.

use serde::{Deserialize, Serialize};

use crate::types::{ShapeId, TargetId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A puzzle was generated for the stage.
    PuzzleReady { stage: u32 },
    /// A dropped shape attached to a target.
    ShapeSnapped {
        shape_id: ShapeId,
        target_id: TargetId,
    },
    /// Every shape of the stage is placed.
    StageCleared { stage: u32 },
    /// The last stage was cleared.
    GameCleared,
}

impl GameEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameEvent::PuzzleReady { .. } => "puzzle_ready",
            GameEvent::ShapeSnapped { .. } => "shape_snapped",
            GameEvent::StageCleared { .. } => "stage_cleared",
            GameEvent::GameCleared => "game_cleared",
        }
    }
}
