//! Shape catalog - canonical sizes and outlines for each shape type
//!
//! Positions throughout the game refer to a shape's *anchor*: the center of
//! the bounding box for quadrilaterals and the centroid for triangles. A
//! triangle's centroid sits height/3 above its base and 2·height/3 below its
//! apex, so its bounding box center is height/6 away from the anchor, towards
//! the apex.
//!
//! Rotations are clockwise in screen coordinates (y grows downwards). An
//! unrotated triangle points up; at 90° it points right.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeSize {
    pub width: f32,
    pub height: f32,
}

impl ShapeSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Canonical (unrotated) size of a shape type.
///
/// For triangles, width is the base and height the apex height.
pub fn size_of(shape_type: ShapeType) -> ShapeSize {
    match shape_type {
        ShapeType::Square => ShapeSize::new(SQUARE_SIZE, SQUARE_SIZE),
        ShapeType::Rectangle => ShapeSize::new(RECTANGLE_WIDTH, RECTANGLE_HEIGHT),
        ShapeType::Parallelogram => ShapeSize::new(PARALLELOGRAM_WIDTH, PARALLELOGRAM_HEIGHT),
        ShapeType::EquilateralTriangle => {
            ShapeSize::new(EQUILATERAL_TRIANGLE_BASE, EQUILATERAL_TRIANGLE_HEIGHT)
        }
        ShapeType::IsoscelesTriangle => {
            ShapeSize::new(ISOSCELES_TRIANGLE_BASE, ISOSCELES_TRIANGLE_HEIGHT)
        }
    }
}

/// Bounding box after rotation.
pub fn footprint(shape_type: ShapeType, rotation: Rotation) -> ShapeSize {
    let size = size_of(shape_type);
    if rotation.is_quarter_turn() {
        ShapeSize::new(size.height, size.width)
    } else {
        size
    }
}

/// Rotate an offset clockwise around the origin (screen coordinates).
pub fn rotate_offset(x: f32, y: f32, rotation: Rotation) -> (f32, f32) {
    match rotation {
        Rotation::Deg0 => (x, y),
        Rotation::Deg90 => (-y, x),
        Rotation::Deg180 => (-x, -y),
        Rotation::Deg270 => (y, -x),
    }
}

/// Offset from the anchor to the bounding box center.
pub fn anchor_to_box_center(shape_type: ShapeType, rotation: Rotation) -> (f32, f32) {
    if !shape_type.is_triangle() {
        return (0.0, 0.0);
    }
    let h = size_of(shape_type).height;
    rotate_offset(0.0, -h / 6.0, rotation)
}

/// Polygon outline around the anchor, clockwise on screen.
pub fn outline(shape_type: ShapeType, rotation: Rotation) -> ArrayVec<(f32, f32), 4> {
    let ShapeSize { width: w, height: h } = size_of(shape_type);
    let (hw, hh) = (w / 2.0, h / 2.0);

    let mut points = ArrayVec::<(f32, f32), 4>::new();
    match shape_type {
        ShapeType::Square | ShapeType::Rectangle => {
            points.push((-hw, -hh));
            points.push((hw, -hh));
            points.push((hw, hh));
            points.push((-hw, hh));
        }
        ShapeType::Parallelogram => {
            // Top edge leans right.
            points.push((-hw + PARALLELOGRAM_SKEW, -hh));
            points.push((hw, -hh));
            points.push((hw - PARALLELOGRAM_SKEW, hh));
            points.push((-hw, hh));
        }
        ShapeType::EquilateralTriangle | ShapeType::IsoscelesTriangle => {
            points.push((0.0, -2.0 * h / 3.0));
            points.push((hw, h / 3.0));
            points.push((-hw, h / 3.0));
        }
    }

    for p in points.iter_mut() {
        *p = rotate_offset(p.0, p.1, rotation);
    }
    points
}

/// Point-in-polygon test for a convex outline (relative coordinates).
pub fn outline_contains(points: &[(f32, f32)], x: f32, y: f32) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut sign = 0i8;
    for i in 0..points.len() {
        let (ax, ay) = points[i];
        let (bx, by) = points[(i + 1) % points.len()];
        let cross = (bx - ax) * (y - ay) - (by - ay) * (x - ax);
        let s = if cross > 0.0 {
            1
        } else if cross < 0.0 {
            -1
        } else {
            0
        };
        if s == 0 {
            continue;
        }
        if sign == 0 {
            sign = s;
        } else if sign != s {
            return false;
        }
    }
    true
}
