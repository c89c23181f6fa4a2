//! Template library - hand-authored silhouette layouts
//!
//! Offsets are relative to the template center and refer to shape anchors
//! (see [`crate::catalog`]). They are pre-computed so that neighbouring shapes
//! share an edge without overlapping. For a triangle the anchor sits height/3
//! above the base and 2·height/3 below the apex; every offset below that
//! involves a triangle is derived from that rule.
//!
//! Normal-tier layouts use four shapes and no isosceles triangle; hard-tier
//! layouts use five shapes. `rotation` is only enforced by tiers that enable
//! rotation.

use tracing::debug;

use crate::rng::RandomSource;
use crate::types::*;

/// One shape placement within a template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateShape {
    pub shape_type: ShapeType,
    pub relative_x: f32,
    pub relative_y: f32,
    pub rotation: Option<Rotation>,
}

/// A named silhouette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateLayout {
    pub name: &'static str,
    pub shapes: &'static [TemplateShape],
}

impl TemplateLayout {
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Same shape count and only allowed shape types.
    pub fn fits(&self, config: &DifficultyConfig) -> bool {
        self.shapes.len() == config.shape_count
            && self.shapes.iter().all(|s| config.allows(s.shape_type))
    }
}

const fn at(shape_type: ShapeType, relative_x: f32, relative_y: f32) -> TemplateShape {
    TemplateShape {
        shape_type,
        relative_x,
        relative_y,
        rotation: None,
    }
}

const fn turned(
    shape_type: ShapeType,
    relative_x: f32,
    relative_y: f32,
    rotation: Rotation,
) -> TemplateShape {
    TemplateShape {
        shape_type,
        relative_x,
        relative_y,
        rotation: Some(rotation),
    }
}

use crate::types::ShapeType::{
    EquilateralTriangle as Equilateral, IsoscelesTriangle as Isosceles, Parallelogram, Rectangle,
    Square,
};

// Walls, roof on top, doorstep below, chimney-side annex.
const HOUSE: [TemplateShape; 4] = [
    at(Square, 0.0, 0.0),
    at(Equilateral, 0.0, -79.0),
    at(Rectangle, 0.0, 85.0),
    at(Parallelogram, 120.0, 10.0),
];

// Hull with two sails and a pennant.
const SAILBOAT: [TemplateShape; 4] = [
    at(Parallelogram, 0.0, 40.0),
    at(Square, -20.0, -50.0),
    turned(Equilateral, 59.0, -50.0, Rotation::Deg90),
    at(Equilateral, -20.0, -129.0),
];

// Body, nose pointing right, upright tail, dorsal fin.
const FISH: [TemplateShape; 4] = [
    at(Square, 0.0, 0.0),
    turned(Equilateral, 79.0, 0.0, Rotation::Deg90),
    turned(Rectangle, -85.0, 0.0, Rotation::Deg90),
    at(Parallelogram, 20.0, -90.0),
];

// Upright fuselage, nose cone, fins either side, exhaust block.
const ROCKET: [TemplateShape; 5] = [
    turned(Rectangle, 0.0, 0.0, Rotation::Deg90),
    at(Isosceles, 0.0, -103.33),
    turned(Equilateral, -64.0, 20.0, Rotation::Deg270),
    turned(Parallelogram, 75.0, 0.0, Rotation::Deg90),
    at(Square, 0.0, 120.0),
];

// Shell, head, flippers, tail.
const TURTLE: [TemplateShape; 5] = [
    at(Square, 0.0, 0.0),
    at(Equilateral, 0.0, -79.0),
    turned(Parallelogram, -90.0, 0.0, Rotation::Deg90),
    turned(Rectangle, 85.0, 0.0, Rotation::Deg90),
    turned(Isosceles, 0.0, 83.33, Rotation::Deg180),
];

// Trunk, crown, tip, and two branches.
const TREE: [TemplateShape; 5] = [
    turned(Rectangle, 0.0, 90.0, Rotation::Deg90),
    at(Square, 0.0, -30.0),
    at(Equilateral, 0.0, -109.0),
    turned(Isosceles, -83.33, -30.0, Rotation::Deg270),
    at(Parallelogram, 120.0, -30.0),
];

/// Every layout in the library.
pub const TEMPLATES: [TemplateLayout; 6] = [
    TemplateLayout {
        name: "house",
        shapes: &HOUSE,
    },
    TemplateLayout {
        name: "sailboat",
        shapes: &SAILBOAT,
    },
    TemplateLayout {
        name: "fish",
        shapes: &FISH,
    },
    TemplateLayout {
        name: "rocket",
        shapes: &ROCKET,
    },
    TemplateLayout {
        name: "turtle",
        shapes: &TURTLE,
    },
    TemplateLayout {
        name: "tree",
        shapes: &TREE,
    },
];

/// Uniform choice over the whole library.
pub fn random_template<R: RandomSource>(rng: &mut R) -> &'static TemplateLayout {
    &TEMPLATES[rng.next_index(TEMPLATES.len())]
}

/// Uniform choice over the layouts that fit a difficulty.
///
/// Returns `None` when no layout fits (the caller falls back to grid mode).
pub fn pick_template<R: RandomSource>(
    config: &DifficultyConfig,
    rng: &mut R,
) -> Option<&'static TemplateLayout> {
    let mut compatible = [0usize; TEMPLATES.len()];
    let mut count = 0;
    for (i, t) in TEMPLATES.iter().enumerate() {
        if t.fits(config) {
            compatible[count] = i;
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }
    let layout = &TEMPLATES[compatible[rng.next_index(count)]];
    debug!(template = layout.name, candidates = count, "picked template");
    Some(layout)
}

pub fn template_by_name(name: &str) -> Option<&'static TemplateLayout> {
    TEMPLATES.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}
