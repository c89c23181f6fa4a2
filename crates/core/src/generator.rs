//! Puzzle generator - lays out targets and the shape tray for one stage
//!
//! Two layout strategies, selected by [`DifficultyConfig::layout`]:
//!
//! - **Grid**: shape types drawn uniformly (with replacement) from the tier's
//!   allowed list, each target centered in a cell of a
//!   `ceil(sqrt(n))`-column grid.
//! - **Template**: a silhouette from [`crate::templates`] placed around the
//!   target-area center. Targets carry the template rotation as
//!   `required_rotation` only when the tier enables rotation.
//!
//! Both then assign ids and colors and spread the shapes over a shuffled
//! horizontal tray near the bottom of the viewport.
//!
//! All randomness is drawn from the supplied [`RandomSource`], in a fixed
//! order (layout, then ids and colors, then tray order), so the same seed
//! always yields the same puzzle.

use tracing::{debug, warn};

use crate::catalog::size_of;
use crate::puzzle::{DraggableShapeSlot, Puzzle, Shape, TargetSlot};
use crate::rng::RandomSource;
use crate::templates::pick_template;
use crate::types::*;

/// A target position before ids and colors are assigned.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlannedTarget {
    shape_type: ShapeType,
    x: f32,
    y: f32,
    rotation: Rotation,
}

/// Center of the target area.
pub fn target_area_center(viewport: Viewport) -> (f32, f32) {
    (
        viewport.width / 2.0,
        viewport.height / 2.0 - TARGET_AREA_LIFT,
    )
}

/// Width and height of the target area.
pub fn target_area_size(viewport: Viewport) -> (f32, f32) {
    (
        (viewport.width * 0.8).min(TARGET_AREA_MAX_WIDTH),
        (viewport.height * 0.5).min(TARGET_AREA_MAX_HEIGHT),
    )
}

/// Columns and rows of the grid layout for `n` shapes.
pub fn grid_dimensions(n: usize) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let cols = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);
    (cols, rows)
}

/// Generate a puzzle for a difficulty tier.
pub fn generate<R: RandomSource>(difficulty: Difficulty, viewport: Viewport, rng: &mut R) -> Puzzle {
    generate_with_config(difficulty.config(), viewport, rng)
}

/// Generate a puzzle from an explicit configuration.
///
/// The viewport must be valid (see [`Viewport::is_valid`]); callers guard it.
pub fn generate_with_config<R: RandomSource>(
    config: &DifficultyConfig,
    viewport: Viewport,
    rng: &mut R,
) -> Puzzle {
    let (plan, template) = match config.layout {
        LayoutStrategy::Grid => (grid_plan(config, viewport, rng), None),
        LayoutStrategy::Template => match pick_template(config, rng) {
            Some(layout) => {
                let (cx, cy) = target_area_center(viewport);
                let plan = layout
                    .shapes
                    .iter()
                    .map(|s| PlannedTarget {
                        shape_type: s.shape_type,
                        x: cx + s.relative_x,
                        y: cy + s.relative_y,
                        rotation: s.rotation.unwrap_or_default(),
                    })
                    .collect();
                (plan, Some(layout.name.to_string()))
            }
            None => {
                warn!(
                    shape_count = config.shape_count,
                    difficulty = config.label,
                    "no template fits, falling back to grid layout"
                );
                (grid_plan(config, viewport, rng), None)
            }
        },
    };

    let mut shapes = Vec::with_capacity(plan.len());
    let mut targets = Vec::with_capacity(plan.len());
    let mut used_ids: Vec<u32> = Vec::with_capacity(plan.len());

    for planned in &plan {
        let id = loop {
            let candidate = rng.next_u32();
            if !used_ids.contains(&candidate) {
                used_ids.push(candidate);
                break ShapeId(candidate);
            }
        };
        let color = rng
            .choose(&ShapeColor::ALL)
            .copied()
            .unwrap_or(ShapeColor::Pink);
        let size = size_of(planned.shape_type);

        shapes.push(DraggableShapeSlot {
            shape: Shape {
                id,
                shape_type: planned.shape_type,
                width: size.width,
                height: size.height,
                rotation: Rotation::Deg0,
                color,
            },
            initial_x: 0.0,
            initial_y: 0.0,
            is_placed: false,
        });
        targets.push(TargetSlot {
            id: TargetId::from(id),
            shape_type: planned.shape_type,
            x: planned.x,
            y: planned.y,
            width: size.width,
            height: size.height,
            required_rotation: config.enable_rotation.then_some(planned.rotation),
            placed_shape_id: None,
        });
    }

    for (slot, (x, y)) in shapes.iter_mut().zip(tray_positions(plan.len(), viewport, rng)) {
        slot.initial_x = x;
        slot.initial_y = y;
    }

    debug!(
        shapes = shapes.len(),
        layout = ?config.layout,
        template = template.as_deref().unwrap_or("-"),
        "generated puzzle"
    );

    Puzzle {
        shapes,
        targets,
        template,
        viewport: Some(viewport),
    }
}

fn grid_plan<R: RandomSource>(
    config: &DifficultyConfig,
    viewport: Viewport,
    rng: &mut R,
) -> Vec<PlannedTarget> {
    let n = config.shape_count;
    if n == 0 {
        return Vec::new();
    }
    let (cols, rows) = grid_dimensions(n);
    let (cx, cy) = target_area_center(viewport);
    let (area_w, area_h) = target_area_size(viewport);
    let cell_w = area_w / cols as f32;
    let cell_h = area_h / rows as f32;
    let left = cx - area_w / 2.0;
    let top = cy - area_h / 2.0;

    (0..n)
        .map(|i| {
            let shape_type = rng
                .choose(config.available_shapes)
                .copied()
                .unwrap_or(ShapeType::Square);
            let (col, row) = (i % cols, i / cols);
            PlannedTarget {
                shape_type,
                x: left + (col as f32 + 0.5) * cell_w,
                y: top + (row as f32 + 0.5) * cell_h,
                rotation: Rotation::Deg0,
            }
        })
        .collect()
}

/// Evenly spaced tray positions in shuffled order.
///
/// With more than one shape the order is never the identity, so the tray
/// never lines up with the target order.
fn tray_positions<R: RandomSource>(n: usize, viewport: Viewport, rng: &mut R) -> Vec<(f32, f32)> {
    let spacing = viewport.width / (n as f32 + 1.0);
    let y = viewport.height - TRAY_BOTTOM_MARGIN;

    let mut order: Vec<usize> = (0..n).collect();
    rng.shuffle(&mut order);
    if n > 1 && order.iter().enumerate().all(|(i, &o)| i == o) {
        order.rotate_left(1);
    }

    order
        .into_iter()
        .map(|slot| (spacing * (slot as f32 + 1.0), y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;

    fn vp() -> Viewport {
        Viewport::new(1000.0, 800.0)
    }

    #[test]
    fn test_grid_dimensions() {
        assert_eq!(grid_dimensions(0), (0, 0));
        assert_eq!(grid_dimensions(1), (1, 1));
        assert_eq!(grid_dimensions(3), (2, 2));
        assert_eq!(grid_dimensions(4), (2, 2));
        assert_eq!(grid_dimensions(5), (3, 2));
    }

    #[test]
    fn test_target_area_is_capped() {
        assert_eq!(target_area_size(Viewport::new(2000.0, 2000.0)), (500.0, 400.0));
        assert_eq!(target_area_size(Viewport::new(400.0, 600.0)), (320.0, 300.0));
        assert_eq!(target_area_center(vp()), (500.0, 350.0));
    }

    #[test]
    fn test_counts_match_difficulty() {
        let mut rng = SimpleRng::new(1);
        for d in Difficulty::ALL {
            let p = generate(d, vp(), &mut rng);
            assert_eq!(p.shapes.len(), d.config().shape_count);
            assert_eq!(p.targets.len(), d.config().shape_count);
            assert_eq!(p.shape_types(), p.target_types());
            for s in &p.shapes {
                assert!(d.config().allows(s.shape.shape_type));
                assert_eq!(s.shape.rotation, Rotation::Deg0);
                assert!(!s.is_placed);
            }
        }
    }

    #[test]
    fn test_easy_grid_positions() {
        let mut rng = SimpleRng::new(5);
        let p = generate(Difficulty::Easy, vp(), &mut rng);
        assert!(p.template.is_none());
        // 2x2 grid over a 500x400 area centered at (500, 350).
        let expected = [(375.0, 250.0), (625.0, 250.0), (375.0, 450.0)];
        for (t, (x, y)) in p.targets.iter().zip(expected) {
            assert_eq!((t.x, t.y), (x, y));
            assert!(t.required_rotation.is_none());
        }
    }

    #[test]
    fn test_template_targets_follow_offsets() {
        let mut rng = SimpleRng::new(9);
        let p = generate(Difficulty::Normal, vp(), &mut rng);
        let name = p.template.clone().unwrap();
        let layout = crate::templates::template_by_name(&name).unwrap();
        for (t, s) in p.targets.iter().zip(layout.shapes) {
            assert_eq!(t.shape_type, s.shape_type);
            assert_eq!(t.x, 500.0 + s.relative_x);
            assert_eq!(t.y, 350.0 + s.relative_y);
            assert!(t.required_rotation.is_none());
        }
    }

    #[test]
    fn test_hard_targets_require_template_rotation() {
        let mut rng = SimpleRng::new(13);
        let p = generate(Difficulty::Hard, vp(), &mut rng);
        let layout = crate::templates::template_by_name(p.template.as_deref().unwrap()).unwrap();
        for (t, s) in p.targets.iter().zip(layout.shapes) {
            assert_eq!(t.required_rotation, Some(s.rotation.unwrap_or_default()));
        }
    }

    #[test]
    fn test_ids_unique_and_shared_with_targets() {
        let mut rng = SimpleRng::new(77);
        let p = generate(Difficulty::Hard, vp(), &mut rng);
        let mut ids: Vec<u32> = p.shapes.iter().map(|s| s.shape.id.0).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), p.shapes.len());
        for (s, t) in p.shapes.iter().zip(&p.targets) {
            assert_eq!(TargetId::from(s.shape.id), t.id);
            assert_eq!(s.shape.width, t.width);
            assert_eq!(s.shape.height, t.height);
        }
    }

    #[test]
    fn test_tray_is_shuffled_band() {
        for seed in 0..30 {
            let mut rng = SimpleRng::new(seed);
            let p = generate(Difficulty::Hard, vp(), &mut rng);
            let n = p.shapes.len() as f32;
            let mut xs: Vec<f32> = p.shapes.iter().map(|s| s.initial_x).collect();
            assert!(p.shapes.iter().all(|s| s.initial_y == 700.0));

            let in_order = xs.windows(2).all(|w| w[0] < w[1]);
            assert!(!in_order, "seed {} left the tray unshuffled", seed);

            xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
            for (i, x) in xs.iter().enumerate() {
                assert_eq!(*x, 1000.0 / (n + 1.0) * (i as f32 + 1.0));
            }
        }
    }

    #[test]
    fn test_same_seed_same_puzzle() {
        let a = generate(Difficulty::Hard, vp(), &mut SimpleRng::new(4242));
        let b = generate(Difficulty::Hard, vp(), &mut SimpleRng::new(4242));
        assert_eq!(a, b);
    }

    #[test]
    fn test_template_fallback_to_grid() {
        let config = DifficultyConfig {
            shape_count: 2,
            ..NORMAL_CONFIG
        };
        let p = generate_with_config(&config, vp(), &mut SimpleRng::new(3));
        assert!(p.template.is_none());
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_zero_shapes() {
        let config = DifficultyConfig {
            shape_count: 0,
            ..EASY_CONFIG
        };
        let p = generate_with_config(&config, vp(), &mut SimpleRng::new(3));
        assert!(p.is_empty());
        assert!(p.targets.is_empty());
    }
}
