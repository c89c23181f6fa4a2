//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains puzzle generation, snap matching and the stage
//! progression state machine. It has **no dependencies** on terminals, files
//! or stdin/stdout, making it:
//!
//! - **Deterministic**: every random choice goes through [`RandomSource`], so a
//!   seed reproduces a whole game
//! - **Testable**: transitions are plain method calls returning `bool`
//! - **Portable**: drives the terminal game and the headless JSON driver alike
//!
//! # Module Structure
//!
//! - [`catalog`]: canonical shape sizes, rotated footprints and outlines
//! - [`templates`]: hand-authored silhouette layouts
//! - [`generator`]: grid and template puzzle layouts, ids, colors, tray
//! - [`snap`]: the type → rotation → distance drop check
//! - [`game_state`]: phases, stages, placement and drop handling
//! - [`events`]: notifications for sound/effects observers
//! - [`rng`]: injectable random source
//!
//! # Example
//!
//! ```
//! use shape_snap_core::{DropPoint, GameState, SimpleRng};
//! use shape_snap_types::{Difficulty, GameCommand, GamePhase, Viewport, DEFAULT_SNAP_THRESHOLD};
//!
//! let mut game = GameState::new();
//! game.apply(GameCommand::SetDifficulty { difficulty: Difficulty::Easy });
//! game.apply(GameCommand::Start);
//! game.ensure_puzzle(Viewport::new(1000.0, 800.0), &mut SimpleRng::new(7));
//!
//! // Drop every shape right onto the target it was generated for.
//! let puzzle = game.puzzle().unwrap().clone();
//! for (slot, target) in puzzle.shapes.iter().zip(&puzzle.targets) {
//!     let point = DropPoint { x: target.x, y: target.y, rotation: Default::default() };
//!     assert!(game.drop_shape(slot.shape.id, point, DEFAULT_SNAP_THRESHOLD).is_snapped());
//! }
//!
//! assert_eq!(game.phase(), GamePhase::StageClear);
//! ```

pub use shape_snap_types as types;

pub mod catalog;
pub mod events;
pub mod game_state;
pub mod generator;
pub mod puzzle;
pub mod rng;
pub mod snap;
pub mod snapshot;
pub mod templates;

pub use catalog::{anchor_to_box_center, footprint, outline, size_of, ShapeSize};
pub use events::GameEvent;
pub use game_state::{DropOutcome, DropPoint, GameState};
pub use generator::{generate, generate_with_config};
pub use puzzle::{DraggableShapeSlot, Puzzle, Shape, TargetSlot};
pub use rng::{RandomSource, SimpleRng};
pub use snap::{check_shape_match, evaluate, Offset, SnapCandidate, SnapFailure, SnapResult, SnapTarget};
pub use snapshot::GameSnapshot;
pub use templates::{pick_template, random_template, template_by_name, TemplateLayout, TemplateShape, TEMPLATES};
