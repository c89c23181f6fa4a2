//! Mouse drag-and-drop controller for terminal environments.
//!
//! Owns the on-screen pose of every shape (position and rotation), which is
//! presentation state: the game state only learns about a shape when it is
//! dropped. Terminal cells are converted to pixels at the cell center.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::core::catalog::{outline, outline_contains};
use crate::core::{DropOutcome, DropPoint, Puzzle};
use crate::types::{Rotation, ShapeId, TERM_PX_PER_COL, TERM_PX_PER_ROW};

/// Where a shape is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapePose {
    pub x: f32,
    pub y: f32,
    pub rotation: Rotation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Grabbed(ShapeId),
    Moved(ShapeId),
    Rotated(ShapeId, Rotation),
    /// The pointer let go of a shape; the point is the shape's anchor.
    Released { shape_id: ShapeId, point: DropPoint },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Grab {
    shape_id: ShapeId,
    /// Shape anchor minus pointer at grab time
    offset_x: f32,
    offset_y: f32,
}

/// Tracks shape poses and the current drag gesture.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    poses: BTreeMap<ShapeId, ShapePose>,
    /// Draw order, topmost last
    order: Vec<ShapeId>,
    grab: Option<Grab>,
    pointer: (f32, f32),
}

/// Pixel position of a terminal cell's center.
pub fn cell_to_px(column: u16, row: u16) -> (f32, f32) {
    (
        (column as f32 + 0.5) * TERM_PX_PER_COL,
        (row as f32 + 0.5) * TERM_PX_PER_ROW,
    )
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow the current puzzle. A different set of shapes resets every pose
    /// to its tray position; the same puzzle keeps the poses.
    pub fn sync(&mut self, puzzle: Option<&Puzzle>) {
        let Some(puzzle) = puzzle else {
            self.clear();
            return;
        };
        let same = self.order.len() == puzzle.shapes.len()
            && puzzle.shapes.iter().all(|s| self.poses.contains_key(&s.shape.id));
        if same {
            return;
        }

        self.clear();
        for slot in &puzzle.shapes {
            self.poses.insert(
                slot.shape.id,
                ShapePose {
                    x: slot.initial_x,
                    y: slot.initial_y,
                    rotation: slot.shape.rotation,
                },
            );
            self.order.push(slot.shape.id);
        }
    }

    pub fn clear(&mut self) {
        self.poses.clear();
        self.order.clear();
        self.grab = None;
    }

    pub fn pose(&self, shape_id: ShapeId) -> Option<ShapePose> {
        self.poses.get(&shape_id).copied()
    }

    /// Shape ids in draw order (topmost last).
    pub fn draw_order(&self) -> &[ShapeId] {
        &self.order
    }

    pub fn grabbed(&self) -> Option<ShapeId> {
        self.grab.map(|g| g.shape_id)
    }

    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    /// Topmost unplaced shape whose outline contains the point.
    pub fn shape_at(&self, puzzle: &Puzzle, x: f32, y: f32) -> Option<ShapeId> {
        self.order.iter().rev().copied().find(|id| {
            let (Some(slot), Some(pose)) = (puzzle.slot(*id), self.poses.get(id)) else {
                return false;
            };
            !slot.is_placed
                && outline_contains(
                    &outline(slot.shape.shape_type, pose.rotation),
                    x - pose.x,
                    y - pose.y,
                )
        })
    }

    pub fn handle_mouse(
        &mut self,
        event: MouseEvent,
        puzzle: &Puzzle,
        enable_rotation: bool,
    ) -> ArrayVec<DragEvent, 2> {
        let mut events = ArrayVec::<DragEvent, 2>::new();
        self.pointer = cell_to_px(event.column, event.row);
        let (px, py) = self.pointer;

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // A missed Up event leaves a stale grab behind.
                if let Some(released) = self.release() {
                    events.push(released);
                }
                if let Some(shape_id) = self.shape_at(puzzle, px, py) {
                    if let Some(pose) = self.poses.get(&shape_id) {
                        self.grab = Some(Grab {
                            shape_id,
                            offset_x: pose.x - px,
                            offset_y: pose.y - py,
                        });
                        self.raise(shape_id);
                        events.push(DragEvent::Grabbed(shape_id));
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(grab) = self.grab {
                    if let Some(pose) = self.poses.get_mut(&grab.shape_id) {
                        pose.x = px + grab.offset_x;
                        pose.y = py + grab.offset_y;
                        events.push(DragEvent::Moved(grab.shape_id));
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(released) = self.release() {
                    events.push(released);
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                if let Some(rotated) = self.rotate(puzzle, enable_rotation) {
                    events.push(rotated);
                }
            }
            _ => {}
        }

        events
    }

    /// Rotate the grabbed shape, or else the one under the pointer.
    pub fn rotate(&mut self, puzzle: &Puzzle, enable_rotation: bool) -> Option<DragEvent> {
        if !enable_rotation {
            return None;
        }
        let (px, py) = self.pointer;
        let shape_id = self
            .grabbed()
            .or_else(|| self.shape_at(puzzle, px, py))?;
        let pose = self.poses.get_mut(&shape_id)?;
        pose.rotation = pose.rotation.rotate_cw();
        Some(DragEvent::Rotated(shape_id, pose.rotation))
    }

    /// Move a snapped shape onto its target; a miss leaves it where dropped.
    pub fn apply_outcome(&mut self, shape_id: ShapeId, outcome: &DropOutcome, puzzle: &Puzzle) {
        let DropOutcome::Snapped { target_id, .. } = outcome else {
            return;
        };
        let (Some(target), Some(pose)) = (puzzle.target(*target_id), self.poses.get_mut(&shape_id))
        else {
            return;
        };
        pose.x = target.x;
        pose.y = target.y;
    }

    fn release(&mut self) -> Option<DragEvent> {
        let grab = self.grab.take()?;
        let pose = self.poses.get(&grab.shape_id)?;
        Some(DragEvent::Released {
            shape_id: grab.shape_id,
            point: DropPoint {
                x: pose.x,
                y: pose.y,
                rotation: pose.rotation,
            },
        })
    }

    fn raise(&mut self, shape_id: ShapeId) {
        if let Some(i) = self.order.iter().position(|id| *id == shape_id) {
            let id = self.order.remove(i);
            self.order.push(id);
        }
    }
}
