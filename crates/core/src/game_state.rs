//! Game state module - phase, stage and placement progression
//!
//! ```text
//!  menu --start--> playing --(all placed)--> stageClear --next--> playing (stage + 1)
//!                                                       \--next--> gameClear (last stage)
//!  any --reset--> menu
//! ```
//!
//! Every transition is a synchronous method returning `true` when the state
//! changed. Commands that do not apply to the current phase are ignored.
//! Stage completion is decided inside [`GameState::place`] itself, so a
//! placement and the completion check it triggers are one step.
//!
//! The puzzle and the placed-id set are reference counted and copied on
//! write, which keeps [`GameState::snapshot`] cheap and every snapshot
//! unaffected by later transitions.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::events::GameEvent;
use crate::generator::generate;
use crate::puzzle::Puzzle;
use crate::rng::RandomSource;
use crate::snap::{distance, evaluate, SnapCandidate, SnapResult, SnapTarget};
use crate::snapshot::GameSnapshot;
use crate::types::*;

/// Where a dragged shape was released.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropPoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub rotation: Rotation,
}

/// Result of [`GameState::drop_shape`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropOutcome {
    /// The shape attached to this target and was placed.
    Snapped {
        target_id: TargetId,
        result: SnapResult,
    },
    /// No target accepted the shape; `result` is measured against the
    /// nearest free target.
    Missed {
        target_id: TargetId,
        result: SnapResult,
    },
    /// Not playing, unknown or already placed shape, or no free target.
    Ignored,
}

impl DropOutcome {
    pub fn is_snapped(&self) -> bool {
        matches!(self, DropOutcome::Snapped { .. })
    }

    pub fn target_id(&self) -> Option<TargetId> {
        match self {
            DropOutcome::Snapped { target_id, .. } | DropOutcome::Missed { target_id, .. } => {
                Some(*target_id)
            }
            DropOutcome::Ignored => None,
        }
    }

    pub fn result(&self) -> Option<&SnapResult> {
        match self {
            DropOutcome::Snapped { result, .. } | DropOutcome::Missed { result, .. } => {
                Some(result)
            }
            DropOutcome::Ignored => None,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    difficulty: Difficulty,
    /// 1..=TOTAL_STAGES
    current_stage: u32,
    phase: GamePhase,
    puzzle: Option<Arc<Puzzle>>,
    placed_shape_ids: Arc<BTreeSet<ShapeId>>,
    /// Pending notifications (drained by observers).
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            difficulty: Difficulty::default(),
            current_stage: 1,
            phase: GamePhase::Menu,
            puzzle: None,
            placed_shape_ids: Arc::new(BTreeSet::new()),
            events: Vec::new(),
        }
    }

    /// Rebuild a state from a snapshot.
    ///
    /// The stage is clamped into range, placements that name no shape of the
    /// puzzle are dropped, and slot/target occupancy is brought in line with
    /// the placed set. A restored `Playing` state whose shapes are all placed
    /// moves straight to `StageClear`.
    pub fn restore(snapshot: GameSnapshot) -> Self {
        let current_stage = snapshot.current_stage.clamp(1, TOTAL_STAGES);
        if current_stage != snapshot.current_stage {
            warn!(
                stage = snapshot.current_stage,
                clamped = current_stage,
                "restored stage out of range"
            );
        }

        let mut puzzle = snapshot.puzzle;
        let mut placed_shape_ids = snapshot.placed_shape_ids;
        let known = |id: &ShapeId| puzzle.as_ref().is_some_and(|p| p.slot(*id).is_some());
        if !placed_shape_ids.iter().all(known) {
            let kept: BTreeSet<ShapeId> = placed_shape_ids.iter().copied().filter(known).collect();
            warn!(
                dropped = placed_shape_ids.len() - kept.len(),
                "restored placements without a matching shape"
            );
            placed_shape_ids = Arc::new(kept);
        }
        if let Some(puzzle) = puzzle.as_mut() {
            sync_occupancy(puzzle, &placed_shape_ids);
        }

        let mut state = Self {
            difficulty: snapshot.difficulty,
            current_stage,
            phase: snapshot.phase,
            puzzle,
            placed_shape_ids,
            events: Vec::new(),
        };
        state.check_stage_complete();
        state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> &'static DifficultyConfig {
        self.difficulty.config()
    }

    pub fn current_stage(&self) -> u32 {
        self.current_stage
    }

    /// `(current_stage, TOTAL_STAGES)`
    pub fn progress(&self) -> (u32, u32) {
        (self.current_stage, TOTAL_STAGES)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn puzzle(&self) -> Option<&Puzzle> {
        self.puzzle.as_deref()
    }

    pub fn placed_shape_ids(&self) -> &BTreeSet<ShapeId> {
        &self.placed_shape_ids
    }

    pub fn is_placed(&self, shape_id: ShapeId) -> bool {
        self.placed_shape_ids.contains(&shape_id)
    }

    /// True when every shape of the current puzzle is in the placed set.
    pub fn is_all_placed(&self) -> bool {
        self.puzzle.as_ref().is_some_and(|p| {
            p.shapes
                .iter()
                .all(|s| self.placed_shape_ids.contains(&s.shape.id))
        })
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            difficulty: self.difficulty,
            current_stage: self.current_stage,
            total_stages: TOTAL_STAGES,
            phase: self.phase,
            puzzle: self.puzzle.clone(),
            placed_shape_ids: Arc::clone(&self.placed_shape_ids),
        }
    }

    /// Drain pending events, oldest first.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply a command. Returns true if the state changed.
    pub fn apply(&mut self, command: GameCommand) -> bool {
        let changed = match command {
            GameCommand::SetDifficulty { difficulty } => self.set_difficulty(difficulty),
            GameCommand::Start => self.start(),
            GameCommand::Place { shape_id } => self.place(shape_id),
            GameCommand::Next => self.next(),
            GameCommand::Reset => self.reset(),
        };
        if !changed {
            debug!(command = command.as_str(), phase = self.phase.as_str(), "command ignored");
        }
        changed
    }

    /// Change the difficulty. Allowed in any phase; takes effect on the next
    /// generated puzzle.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.difficulty == difficulty {
            return false;
        }
        debug!(from = %self.difficulty, to = %difficulty, "difficulty changed");
        self.difficulty = difficulty;
        true
    }

    /// menu -> playing at stage 1
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.current_stage = 1;
        self.puzzle = None;
        self.placed_shape_ids = Arc::new(BTreeSet::new());
        debug!(difficulty = %self.difficulty, "game started");
        true
    }

    /// Install the stage's puzzle.
    ///
    /// Accepted once per stage: only while playing and before a puzzle is
    /// present.
    pub fn puzzle_ready(&mut self, puzzle: Puzzle) -> bool {
        if self.phase != GamePhase::Playing {
            warn!(phase = self.phase.as_str(), "puzzle_ready outside of play ignored");
            return false;
        }
        if self.puzzle.is_some() {
            warn!(stage = self.current_stage, "duplicate puzzle_ready ignored");
            return false;
        }
        debug!(stage = self.current_stage, shapes = puzzle.len(), "puzzle ready");
        self.puzzle = Some(Arc::new(puzzle));
        self.placed_shape_ids = Arc::new(BTreeSet::new());
        self.events.push(GameEvent::PuzzleReady {
            stage: self.current_stage,
        });
        self.check_stage_complete();
        true
    }

    /// Generate and install a puzzle if one is needed.
    ///
    /// Does nothing unless playing without a puzzle, so repeated calls never
    /// generate twice for the same stage.
    pub fn ensure_puzzle<R: RandomSource>(&mut self, viewport: Viewport, rng: &mut R) -> bool {
        if self.phase != GamePhase::Playing || self.puzzle.is_some() {
            return false;
        }
        if !viewport.is_valid() {
            warn!(
                width = viewport.width,
                height = viewport.height,
                "invalid viewport, puzzle not generated"
            );
            return false;
        }
        let puzzle = generate(self.difficulty, viewport, rng);
        self.puzzle_ready(puzzle)
    }

    /// Mark a shape as placed and check for stage completion.
    ///
    /// A shape that does not occupy a target yet takes the one generated for
    /// it, or the first free target of its type when that one is taken.
    /// Placing an id twice is a no-op.
    pub fn place(&mut self, shape_id: ShapeId) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let Some(puzzle) = self.puzzle.as_mut() else {
            return false;
        };
        if puzzle.slot(shape_id).is_none() || self.placed_shape_ids.contains(&shape_id) {
            return false;
        }

        let puzzle = Arc::make_mut(puzzle);
        let shape_type = match puzzle.slot_mut(shape_id) {
            Some(slot) => {
                slot.is_placed = true;
                slot.shape.shape_type
            }
            None => return false,
        };
        if !puzzle.targets.iter().any(|t| t.placed_shape_id == Some(shape_id)) {
            let own = TargetId::from(shape_id);
            let free = puzzle
                .targets
                .iter_mut()
                .filter(|t| !t.is_occupied() && t.shape_type == shape_type)
                .min_by_key(|t| t.id != own);
            match free {
                Some(target) => target.placed_shape_id = Some(shape_id),
                None => debug!(shape = %shape_id, "placed shape occupies no target"),
            }
        }
        Arc::make_mut(&mut self.placed_shape_ids).insert(shape_id);
        debug!(
            shape = %shape_id,
            placed = self.placed_shape_ids.len(),
            "shape placed"
        );

        self.check_stage_complete();
        true
    }

    /// Evaluate a drop against the free targets and place the shape on the
    /// first one it snaps to.
    pub fn drop_shape(&mut self, shape_id: ShapeId, point: DropPoint, threshold: f32) -> DropOutcome {
        if self.phase != GamePhase::Playing || self.is_placed(shape_id) {
            return DropOutcome::Ignored;
        }
        let Some(puzzle) = self.puzzle.as_ref() else {
            return DropOutcome::Ignored;
        };
        let Some(slot) = puzzle.slot(shape_id) else {
            return DropOutcome::Ignored;
        };

        let candidate = SnapCandidate {
            x: point.x,
            y: point.y,
            shape_type: slot.shape.shape_type,
            rotation: Some(point.rotation),
        };

        let mut snapped: Option<(TargetId, SnapResult)> = None;
        let mut nearest: Option<(f32, TargetId, SnapResult)> = None;
        for target in puzzle.targets.iter().filter(|t| !t.is_occupied()) {
            let snap_target = SnapTarget::from(target);
            let result = evaluate(&candidate, &snap_target, threshold);
            if result.should_snap {
                snapped = Some((target.id, result));
                break;
            }
            let d = distance(&candidate, &snap_target);
            if nearest.as_ref().map_or(true, |(best, _, _)| d < *best) {
                nearest = Some((d, target.id, result));
            }
        }

        let Some((target_id, result)) = snapped else {
            return match nearest {
                Some((_, target_id, result)) => DropOutcome::Missed { target_id, result },
                None => DropOutcome::Ignored,
            };
        };

        if let Some(puzzle) = self.puzzle.as_mut() {
            if let Some(target) = Arc::make_mut(puzzle).target_mut(target_id) {
                target.placed_shape_id = Some(shape_id);
            }
        }
        self.events.push(GameEvent::ShapeSnapped {
            shape_id,
            target_id,
        });
        self.place(shape_id);
        DropOutcome::Snapped { target_id, result }
    }

    /// stageClear -> playing (next stage) or gameClear (after the last one)
    pub fn next(&mut self) -> bool {
        if self.phase != GamePhase::StageClear {
            return false;
        }
        if self.current_stage >= TOTAL_STAGES {
            self.phase = GamePhase::GameClear;
            self.events.push(GameEvent::GameCleared);
            debug!("game cleared");
        } else {
            self.current_stage += 1;
            self.phase = GamePhase::Playing;
            self.puzzle = None;
            self.placed_shape_ids = Arc::new(BTreeSet::new());
            debug!(stage = self.current_stage, "next stage");
        }
        true
    }

    /// Back to the initial state from any phase.
    pub fn reset(&mut self) -> bool {
        *self = Self::new();
        debug!("game reset");
        true
    }

    fn check_stage_complete(&mut self) {
        if self.phase == GamePhase::Playing && self.is_all_placed() {
            self.phase = GamePhase::StageClear;
            self.events.push(GameEvent::StageCleared {
                stage: self.current_stage,
            });
            debug!(stage = self.current_stage, "stage cleared");
        }
    }
}

/// Make slot `is_placed` flags and target occupants agree with `placed`.
fn sync_occupancy(puzzle: &mut Arc<Puzzle>, placed: &BTreeSet<ShapeId>) {
    let slots_agree = puzzle
        .shapes
        .iter()
        .all(|s| s.is_placed == placed.contains(&s.shape.id));
    let targets_agree = puzzle
        .targets
        .iter()
        .all(|t| t.placed_shape_id.map_or(true, |id| placed.contains(&id)));
    if slots_agree && targets_agree {
        return;
    }

    let puzzle = Arc::make_mut(puzzle);
    for slot in &mut puzzle.shapes {
        slot.is_placed = placed.contains(&slot.shape.id);
    }
    for target in &mut puzzle.targets {
        if target.placed_shape_id.is_some_and(|id| !placed.contains(&id)) {
            target.placed_shape_id = None;
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 800.0)
    }

    fn playing(difficulty: Difficulty, seed: u32) -> GameState {
        let mut state = GameState::new();
        state.set_difficulty(difficulty);
        assert!(state.start());
        assert!(state.ensure_puzzle(viewport(), &mut SimpleRng::new(seed)));
        state.take_events();
        state
    }

    fn at_stage_clear(stage: u32) -> GameState {
        GameState::restore(GameSnapshot {
            current_stage: stage,
            phase: GamePhase::StageClear,
            ..GameSnapshot::default()
        })
    }

    /// Drop point exactly on the target generated for the shape at `index`.
    fn exact_drop(state: &GameState, index: usize) -> (ShapeId, DropPoint) {
        let puzzle = state.puzzle().unwrap();
        let target = &puzzle.targets[index];
        (
            puzzle.shapes[index].shape.id,
            DropPoint {
                x: target.x,
                y: target.y,
                rotation: target.required_rotation.unwrap_or_default(),
            },
        )
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::new();
        assert_eq!(state.phase(), GamePhase::Menu);
        assert_eq!(state.current_stage(), 1);
        assert_eq!(state.difficulty(), Difficulty::Easy);
        assert!(state.puzzle().is_none());
        assert!(state.placed_shape_ids().is_empty());
        assert_eq!(state.progress(), (1, TOTAL_STAGES));
    }

    #[test]
    fn test_start_only_from_menu() {
        let mut state = GameState::new();
        assert!(state.apply(GameCommand::Start));
        assert_eq!(state.phase(), GamePhase::Playing);
        assert!(!state.apply(GameCommand::Start));
    }

    #[test]
    fn test_set_difficulty_in_any_phase() {
        let mut state = playing(Difficulty::Easy, 1);
        assert!(state.apply(GameCommand::SetDifficulty {
            difficulty: Difficulty::Hard
        }));
        assert_eq!(state.difficulty(), Difficulty::Hard);
        // The current puzzle is untouched.
        assert_eq!(state.puzzle().unwrap().len(), 3);
        assert!(!state.set_difficulty(Difficulty::Hard));
    }

    #[test]
    fn test_ensure_puzzle_generates_once() {
        let mut state = GameState::new();
        let mut rng = SimpleRng::new(3);
        assert!(!state.ensure_puzzle(viewport(), &mut rng));

        state.start();
        assert!(state.ensure_puzzle(viewport(), &mut rng));
        let first = state.puzzle().cloned();
        assert!(!state.ensure_puzzle(viewport(), &mut rng));
        assert_eq!(state.puzzle().cloned(), first);
        assert_eq!(
            state.take_events(),
            vec![GameEvent::PuzzleReady { stage: 1 }]
        );
    }

    #[test]
    fn test_ensure_puzzle_rejects_invalid_viewport() {
        let mut state = GameState::new();
        state.start();
        assert!(!state.ensure_puzzle(Viewport::new(0.0, 600.0), &mut SimpleRng::new(1)));
        assert!(state.puzzle().is_none());
    }

    #[test]
    fn test_duplicate_puzzle_ready_ignored() {
        let mut state = playing(Difficulty::Easy, 4);
        let before = state.snapshot();
        let other = generate(Difficulty::Easy, viewport(), &mut SimpleRng::new(99));
        assert!(!state.puzzle_ready(other));
        assert_eq!(state.snapshot(), before);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_place_is_idempotent() {
        let mut state = playing(Difficulty::Easy, 5);
        let id = state.puzzle().unwrap().shapes[0].shape.id;
        assert!(state.apply(GameCommand::Place { shape_id: id }));
        assert!(!state.apply(GameCommand::Place { shape_id: id }));
        assert_eq!(state.placed_shape_ids().len(), 1);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert!(state.puzzle().unwrap().slot(id).unwrap().is_placed);
    }

    #[test]
    fn test_place_occupies_generated_target() {
        let mut state = playing(Difficulty::Easy, 5);
        let id = state.puzzle().unwrap().shapes[1].shape.id;
        assert!(state.place(id));
        let puzzle = state.puzzle().unwrap();
        assert_eq!(
            puzzle.target(TargetId::from(id)).unwrap().placed_shape_id,
            Some(id)
        );
        assert_eq!(puzzle.targets.iter().filter(|t| t.is_occupied()).count(), 1);
    }

    #[test]
    fn test_drop_cannot_take_target_of_placed_shape() {
        // Easy picks types with replacement, so some seed repeats a type.
        let (mut state, a, b) = (0..200)
            .find_map(|seed| {
                let state = playing(Difficulty::Easy, seed);
                let shapes = &state.puzzle().unwrap().shapes;
                let (i, j) = (0..shapes.len())
                    .flat_map(|i| (i + 1..shapes.len()).map(move |j| (i, j)))
                    .find(|&(i, j)| shapes[i].shape.shape_type == shapes[j].shape.shape_type)?;
                let (a, b) = (shapes[i].shape.id, shapes[j].shape.id);
                Some((state, a, b))
            })
            .expect("a puzzle with a repeated shape type");

        assert!(state.apply(GameCommand::Place { shape_id: a }));
        let taken = state.puzzle().unwrap().target(TargetId::from(a)).unwrap().clone();
        let outcome = state.drop_shape(
            b,
            DropPoint {
                x: taken.x,
                y: taken.y,
                rotation: Rotation::Deg0,
            },
            DEFAULT_SNAP_THRESHOLD,
        );
        assert_ne!(outcome.target_id(), Some(taken.id));

        let puzzle = state.puzzle().unwrap();
        assert_eq!(puzzle.target(taken.id).unwrap().placed_shape_id, Some(a));
        let occupied = puzzle.targets.iter().filter(|t| t.is_occupied()).count();
        assert_eq!(occupied, state.placed_shape_ids().len());
    }

    #[test]
    fn test_restore_completes_fully_placed_stage() {
        let state = playing(Difficulty::Easy, 13);
        let ids: BTreeSet<ShapeId> = state
            .puzzle()
            .unwrap()
            .shapes
            .iter()
            .map(|s| s.shape.id)
            .collect();
        let mut restored = GameState::restore(GameSnapshot {
            placed_shape_ids: Arc::new(ids),
            ..state.snapshot()
        });
        assert_eq!(restored.phase(), GamePhase::StageClear);
        assert!(restored.puzzle().unwrap().shapes.iter().all(|s| s.is_placed));
        assert_eq!(
            restored.take_events(),
            vec![GameEvent::StageCleared { stage: 1 }]
        );
        assert!(restored.next());
        assert_eq!(restored.current_stage(), 2);
    }

    #[test]
    fn test_restore_drops_unknown_placements() {
        let state = playing(Difficulty::Easy, 14);
        let shapes = &state.puzzle().unwrap().shapes;
        let mut ids: BTreeSet<ShapeId> = shapes[1..].iter().map(|s| s.shape.id).collect();
        ids.insert(ShapeId(0xfeed_f00d));
        let restored = GameState::restore(GameSnapshot {
            placed_shape_ids: Arc::new(ids),
            ..state.snapshot()
        });
        assert_eq!(restored.phase(), GamePhase::Playing);
        assert!(!restored.is_all_placed());
        assert_eq!(restored.placed_shape_ids().len(), shapes.len() - 1);
        assert!(!restored.is_placed(ShapeId(0xfeed_f00d)));
    }

    #[test]
    fn test_place_unknown_or_out_of_phase_ignored() {
        let mut state = GameState::new();
        assert!(!state.place(ShapeId(1)));

        let mut state = playing(Difficulty::Easy, 6);
        assert!(!state.place(ShapeId(0xdead_beef)));
        assert!(state.placed_shape_ids().is_empty());
    }

    #[test]
    fn test_last_place_clears_stage_atomically() {
        let mut state = playing(Difficulty::Normal, 7);
        let ids: Vec<ShapeId> = state
            .puzzle()
            .unwrap()
            .shapes
            .iter()
            .map(|s| s.shape.id)
            .collect();
        for id in &ids[..ids.len() - 1] {
            assert!(state.place(*id));
            assert_eq!(state.phase(), GamePhase::Playing);
        }
        assert!(state.place(ids[ids.len() - 1]));
        assert_eq!(state.phase(), GamePhase::StageClear);
        assert!(state.is_all_placed());

        // A repeat placement neither changes anything nor re-triggers completion.
        assert!(!state.place(ids[0]));
        let cleared: Vec<_> = state
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::StageCleared { .. }))
            .collect();
        assert_eq!(cleared, vec![GameEvent::StageCleared { stage: 1 }]);
    }

    #[test]
    fn test_next_after_last_stage_is_game_clear() {
        let mut state = at_stage_clear(5);
        assert!(state.apply(GameCommand::Next));
        assert_eq!(state.phase(), GamePhase::GameClear);
        assert_eq!(state.take_events(), vec![GameEvent::GameCleared]);
        // Terminal until reset.
        assert!(!state.apply(GameCommand::Next));
        assert!(!state.apply(GameCommand::Start));
    }

    #[test]
    fn test_next_advances_stage() {
        let mut state = at_stage_clear(2);
        assert!(state.next());
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.current_stage(), 3);
        assert!(state.puzzle().is_none());
        assert!(state.placed_shape_ids().is_empty());
    }

    #[test]
    fn test_next_ignored_while_playing() {
        let mut state = playing(Difficulty::Easy, 8);
        assert!(!state.next());
        assert_eq!(state.current_stage(), 1);
    }

    #[test]
    fn test_reset_from_every_phase() {
        let states = [
            GameState::new(),
            playing(Difficulty::Hard, 9),
            at_stage_clear(3),
            GameState::restore(GameSnapshot {
                phase: GamePhase::GameClear,
                current_stage: 5,
                difficulty: Difficulty::Normal,
                ..GameSnapshot::default()
            }),
        ];
        for mut state in states {
            assert!(state.apply(GameCommand::Reset));
            assert_eq!(state, GameState::new());
        }
    }

    #[test]
    fn test_restore_clamps_stage() {
        let low = GameState::restore(GameSnapshot {
            current_stage: 0,
            ..GameSnapshot::default()
        });
        assert_eq!(low.current_stage(), 1);

        let high = GameState::restore(GameSnapshot {
            current_stage: 42,
            ..GameSnapshot::default()
        });
        assert_eq!(high.current_stage(), TOTAL_STAGES);
    }

    #[test]
    fn test_drop_on_target_snaps_and_places() {
        let mut state = playing(Difficulty::Easy, 10);
        let (id, point) = exact_drop(&state, 0);
        let outcome = state.drop_shape(id, point, DEFAULT_SNAP_THRESHOLD);
        assert!(outcome.is_snapped());
        assert!(state.is_placed(id));

        let target_id = outcome.target_id().unwrap();
        let target = state.puzzle().unwrap().target(target_id).unwrap();
        assert_eq!(target.placed_shape_id, Some(id));
        assert_eq!(
            state.take_events(),
            vec![GameEvent::ShapeSnapped {
                shape_id: id,
                target_id
            }]
        );

        // A placed shape cannot be dropped again.
        assert_eq!(
            state.drop_shape(id, point, DEFAULT_SNAP_THRESHOLD),
            DropOutcome::Ignored
        );
    }

    #[test]
    fn test_drop_far_away_misses() {
        let mut state = playing(Difficulty::Easy, 11);
        let (id, _) = exact_drop(&state, 0);
        let point = DropPoint {
            x: 5000.0,
            y: 5000.0,
            rotation: Rotation::Deg0,
        };
        let outcome = state.drop_shape(id, point, DEFAULT_SNAP_THRESHOLD);
        assert!(!outcome.is_snapped());
        assert!(outcome.result().unwrap().failure_reason.is_some());
        assert!(!state.is_placed(id));
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_drop_with_wrong_rotation_misses() {
        // Hard layouts use each shape type once and some targets are turned.
        for seed in 0..20 {
            let mut state = playing(Difficulty::Hard, seed);
            let puzzle = state.puzzle().unwrap().clone();
            let Some(index) = puzzle
                .targets
                .iter()
                .position(|t| t.required_rotation != Some(Rotation::Deg0))
            else {
                continue;
            };
            let (id, mut point) = exact_drop(&state, index);
            point.rotation = Rotation::Deg0;
            let outcome = state.drop_shape(id, point, DEFAULT_SNAP_THRESHOLD);
            assert_eq!(
                outcome.result().unwrap().failure_reason,
                Some(crate::snap::SnapFailure::RotationMismatch)
            );

            let (id, point) = exact_drop(&state, index);
            assert!(state.drop_shape(id, point, DEFAULT_SNAP_THRESHOLD).is_snapped());
            return;
        }
        panic!("no rotated target found");
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_placements() {
        let mut state = playing(Difficulty::Easy, 12);
        let before = state.snapshot();
        let (id, point) = exact_drop(&state, 0);
        assert!(state.drop_shape(id, point, DEFAULT_SNAP_THRESHOLD).is_snapped());

        assert!(before.placed_shape_ids.is_empty());
        let puzzle = before.puzzle.as_ref().unwrap();
        assert!(puzzle.targets.iter().all(|t| t.placed_shape_id.is_none()));
        assert_ne!(state.snapshot(), before);
    }

    #[test]
    fn test_full_game() {
        let mut state = GameState::new();
        let mut rng = SimpleRng::new(2024);
        state.set_difficulty(Difficulty::Hard);
        state.start();

        for stage in 1..=TOTAL_STAGES {
            assert_eq!(state.current_stage(), stage);
            assert!(state.ensure_puzzle(viewport(), &mut rng));
            let n = state.puzzle().unwrap().len();
            for index in 0..n {
                let (id, point) = exact_drop(&state, index);
                assert!(state.drop_shape(id, point, DEFAULT_SNAP_THRESHOLD).is_snapped());
            }
            assert_eq!(state.phase(), GamePhase::StageClear);
            assert!(state.next());
        }
        assert_eq!(state.phase(), GamePhase::GameClear);

        let events = state.take_events();
        let cleared = events
            .iter()
            .filter(|e| matches!(e, GameEvent::StageCleared { .. }))
            .count();
        assert_eq!(cleared, TOTAL_STAGES as usize);
        assert_eq!(events.last(), Some(&GameEvent::GameCleared));
    }
}
