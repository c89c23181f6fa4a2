//! Snap matcher - decides whether a dropped shape attaches to a target
//!
//! Checks run in a fixed order and stop at the first failure, which decides
//! the reported [`SnapFailure`]:
//!
//! 1. shape type must match (regardless of distance or rotation)
//! 2. rotation must match, if the target requires one
//! 3. Euclidean distance must be within the threshold (inclusive)
//!
//! On success the relative offset is `(0, 0)`: the shape moves onto the target
//! center. On failure it is `current - target`, the position the shape was
//! dropped at relative to the target.

use serde::{Deserialize, Serialize};

use crate::puzzle::TargetSlot;
use crate::types::*;

/// Why a drop did not snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapFailure {
    TypeMismatch,
    RotationMismatch,
    DistanceExceeded,
}

impl SnapFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapFailure::TypeMismatch => "type_mismatch",
            SnapFailure::RotationMismatch => "rotation_mismatch",
            SnapFailure::DistanceExceeded => "distance_exceeded",
        }
    }
}

/// Offset in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

/// The dragged shape at the moment of the drop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapCandidate {
    pub x: f32,
    pub y: f32,
    pub shape_type: ShapeType,
    /// `None` never satisfies a required rotation.
    pub rotation: Option<Rotation>,
}

/// The target a drop is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub x: f32,
    pub y: f32,
    pub shape_type: ShapeType,
    pub required_rotation: Option<Rotation>,
}

impl From<&TargetSlot> for SnapTarget {
    fn from(slot: &TargetSlot) -> Self {
        Self {
            x: slot.x,
            y: slot.y,
            shape_type: slot.shape_type,
            required_rotation: slot.required_rotation,
        }
    }
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    pub should_snap: bool,
    pub relative_offset: Offset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<SnapFailure>,
}

impl SnapResult {
    fn snapped() -> Self {
        Self {
            should_snap: true,
            relative_offset: Offset::default(),
            failure_reason: None,
        }
    }

    fn failed(current: &SnapCandidate, target: &SnapTarget, reason: SnapFailure) -> Self {
        Self {
            should_snap: false,
            relative_offset: Offset {
                x: current.x - target.x,
                y: current.y - target.y,
            },
            failure_reason: Some(reason),
        }
    }
}

/// Euclidean distance between the candidate and target anchors.
pub fn distance(current: &SnapCandidate, target: &SnapTarget) -> f32 {
    let dx = current.x - target.x;
    let dy = current.y - target.y;
    (dx * dx + dy * dy).sqrt()
}

/// Evaluate one drop against one target.
pub fn evaluate(current: &SnapCandidate, target: &SnapTarget, threshold: f32) -> SnapResult {
    if current.shape_type != target.shape_type {
        return SnapResult::failed(current, target, SnapFailure::TypeMismatch);
    }

    if let Some(required) = target.required_rotation {
        if current.rotation != Some(required) {
            return SnapResult::failed(current, target, SnapFailure::RotationMismatch);
        }
    }

    if distance(current, target) > threshold {
        return SnapResult::failed(current, target, SnapFailure::DistanceExceeded);
    }

    SnapResult::snapped()
}

/// Type and rotation check without distance.
pub fn check_shape_match(shape_type: ShapeType, target: &TargetSlot, rotation: Rotation) -> bool {
    shape_type == target.shape_type
        && target
            .required_rotation
            .map_or(true, |required| required == rotation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_at(x: f32, y: f32) -> SnapCandidate {
        SnapCandidate {
            x,
            y,
            shape_type: ShapeType::Square,
            rotation: Some(Rotation::Deg0),
        }
    }

    fn square_target(required_rotation: Option<Rotation>) -> SnapTarget {
        SnapTarget {
            x: 500.0,
            y: 400.0,
            shape_type: ShapeType::Square,
            required_rotation,
        }
    }

    #[test]
    fn test_snap_within_threshold() {
        let r = evaluate(&square_at(512.0, 384.0), &square_target(None), 50.0);
        assert!(r.should_snap);
        assert_eq!(r.relative_offset, Offset::default());
        assert_eq!(r.failure_reason, None);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        // 3-4-5 triangle: exactly 50px away.
        let r = evaluate(&square_at(530.0, 440.0), &square_target(None), 50.0);
        assert!(r.should_snap);

        let r = evaluate(&square_at(530.0, 440.5), &square_target(None), 50.0);
        assert_eq!(r.failure_reason, Some(SnapFailure::DistanceExceeded));
        assert_eq!(r.relative_offset, Offset { x: 30.0, y: 40.5 });
    }

    #[test]
    fn test_type_checked_before_rotation() {
        let mut current = square_at(900.0, 900.0);
        current.shape_type = ShapeType::Rectangle;
        current.rotation = Some(Rotation::Deg180);
        let r = evaluate(&current, &square_target(Some(Rotation::Deg90)), 50.0);
        assert_eq!(r.failure_reason, Some(SnapFailure::TypeMismatch));
    }

    #[test]
    fn test_rotation_checked_before_distance() {
        let r = evaluate(
            &square_at(900.0, 900.0),
            &square_target(Some(Rotation::Deg90)),
            50.0,
        );
        assert_eq!(r.failure_reason, Some(SnapFailure::RotationMismatch));
    }

    #[test]
    fn test_missing_rotation_never_satisfies_requirement() {
        let mut current = square_at(500.0, 400.0);
        current.rotation = None;
        let r = evaluate(&current, &square_target(Some(Rotation::Deg0)), 50.0);
        assert_eq!(r.failure_reason, Some(SnapFailure::RotationMismatch));

        let r = evaluate(&current, &square_target(None), 50.0);
        assert!(r.should_snap);
    }

    #[test]
    fn test_failure_reason_wire_names() {
        assert_eq!(
            serde_json::to_string(&SnapFailure::RotationMismatch).unwrap(),
            "\"rotation_mismatch\""
        );
        let r = evaluate(&square_at(500.0, 400.0), &square_target(None), 50.0);
        let json = serde_json::to_string(&r).unwrap();
        assert!(!json.contains("failure_reason"));
    }

    #[test]
    fn test_check_shape_match() {
        let target = TargetSlot {
            id: TargetId(1),
            shape_type: ShapeType::Rectangle,
            x: 400.0,
            y: 300.0,
            width: 140.0,
            height: 70.0,
            required_rotation: None,
            placed_shape_id: None,
        };
        assert!(check_shape_match(ShapeType::Rectangle, &target, Rotation::Deg180));
        assert!(!check_shape_match(ShapeType::Square, &target, Rotation::Deg0));

        let rotated = TargetSlot {
            required_rotation: Some(Rotation::Deg90),
            ..target
        };
        assert!(check_shape_match(ShapeType::Rectangle, &rotated, Rotation::Deg90));
        assert!(!check_shape_match(ShapeType::Rectangle, &rotated, Rotation::Deg0));
    }
}
