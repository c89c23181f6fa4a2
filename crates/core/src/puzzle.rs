//! Puzzle data model - shapes, target slots and their pairing
//!
//! A [`Puzzle`] holds one draggable slot per shape and one target slot per
//! shape. `shapes[i]` was generated for `targets[i]`, but matching is decided
//! by type (and rotation), never by index.

use serde::{Deserialize, Serialize};

use crate::catalog::{footprint, ShapeSize};
use crate::types::*;

/// A draggable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub shape_type: ShapeType,
    pub width: f32,
    pub height: f32,
    pub rotation: Rotation,
    pub color: ShapeColor,
}

/// A fixed location that accepts one shape type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSlot {
    pub id: TargetId,
    pub shape_type: ShapeType,
    /// Anchor position (px)
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Present only when the difficulty enables rotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_rotation: Option<Rotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placed_shape_id: Option<ShapeId>,
}

impl TargetSlot {
    /// Bounding box as the outline is drawn (rotated when a rotation is required).
    pub fn footprint(&self) -> ShapeSize {
        footprint(self.shape_type, self.required_rotation.unwrap_or_default())
    }

    pub fn is_occupied(&self) -> bool {
        self.placed_shape_id.is_some()
    }
}

/// A shape plus its starting position in the tray.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraggableShapeSlot {
    pub shape: Shape,
    pub initial_x: f32,
    pub initial_y: f32,
    pub is_placed: bool,
}

/// One generated puzzle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Puzzle {
    pub shapes: Vec<DraggableShapeSlot>,
    pub targets: Vec<TargetSlot>,
    /// Silhouette name when the layout came from a template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Viewport the layout was computed for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

impl Puzzle {
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn slot(&self, id: ShapeId) -> Option<&DraggableShapeSlot> {
        self.shapes.iter().find(|s| s.shape.id == id)
    }

    pub fn slot_mut(&mut self, id: ShapeId) -> Option<&mut DraggableShapeSlot> {
        self.shapes.iter_mut().find(|s| s.shape.id == id)
    }

    pub fn target(&self, id: TargetId) -> Option<&TargetSlot> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn target_mut(&mut self, id: TargetId) -> Option<&mut TargetSlot> {
        self.targets.iter_mut().find(|t| t.id == id)
    }

    /// Shape types of the draggable shapes, sorted.
    pub fn shape_types(&self) -> Vec<ShapeType> {
        let mut v: Vec<ShapeType> = self.shapes.iter().map(|s| s.shape.shape_type).collect();
        v.sort();
        v
    }

    /// Shape types of the target slots, sorted.
    pub fn target_types(&self) -> Vec<ShapeType> {
        let mut v: Vec<ShapeType> = self.targets.iter().map(|t| t.shape_type).collect();
        v.sort();
        v
    }
}
