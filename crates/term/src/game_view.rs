//! GameView: maps a game snapshot and the on-screen shape poses into a
//! terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Shapes are rasterized in the game's pixel plane: a terminal cell is painted
//! when its center (see [`crate::input::cell_to_px`]) lies inside the shape's
//! outline.

use crate::core::catalog::{anchor_to_box_center, footprint, outline, outline_contains};
use crate::core::generator::{grid_dimensions, target_area_center, target_area_size};
use crate::core::{GameSnapshot, Puzzle};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::input::{cell_to_px, DragController, ShapePose};
use crate::types::{
    Difficulty, GamePhase, Rotation, ShapeType, Viewport, TERM_PX_PER_COL, TERM_PX_PER_ROW,
};

const BG: Rgb = Rgb::new(18, 18, 28);
const TEXT: Rgb = Rgb::new(220, 220, 220);
const MUTED: Rgb = Rgb::new(120, 120, 140);
const TARGET: Rgb = Rgb::new(90, 90, 110);
const GRID: Rgb = Rgb::new(50, 50, 66);
const ACCENT: Rgb = Rgb::new(250, 204, 21);

/// Terminal size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    pub width: u16,
    pub height: u16,
}

impl TermSize {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// The pixel plane the generator lays puzzles out in.
    pub fn viewport(&self) -> Viewport {
        Viewport::from_terminal(self.width, self.height)
    }
}

/// A lightweight terminal renderer for the puzzle.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameView {
    /// Draw the footer key hints
    hide_hints: bool,
}

impl GameView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_hints(mut self) -> Self {
        self.hide_hints = true;
        self
    }

    /// Render into an existing framebuffer, resizing it to `size`.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        drag: &DragController,
        size: TermSize,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(size.width, size.height);
        fb.clear(CellStyle::fg(TEXT).on(BG).cell(' '));

        match snap.phase {
            GamePhase::Menu => self.draw_menu(fb, snap.difficulty),
            GamePhase::Playing | GamePhase::StageClear | GamePhase::GameClear => {
                self.draw_header(fb, snap);
                if let Some(puzzle) = snap.puzzle.as_deref() {
                    if snap.difficulty.config().show_grid_lines {
                        // Targets stay where they were laid out, even after a resize.
                        let viewport = puzzle.viewport.unwrap_or_else(|| size.viewport());
                        self.draw_grid_lines(fb, snap.difficulty, viewport);
                    }
                    self.draw_targets(fb, puzzle);
                    self.draw_shapes(fb, puzzle, drag);
                }
                match snap.phase {
                    GamePhase::StageClear => self.draw_overlay(
                        fb,
                        &format!("STAGE {} CLEAR!", snap.current_stage),
                        "Enter: next stage",
                    ),
                    GamePhase::GameClear => self.draw_overlay(
                        fb,
                        &format!("ALL {} STAGES CLEAR!", snap.total_stages),
                        "Enter: back to menu",
                    ),
                    _ => {}
                }
            }
        }

        if !self.hide_hints {
            self.draw_hints(fb, snap);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, drag: &DragController, size: TermSize) -> FrameBuffer {
        let mut fb = FrameBuffer::new(size.width, size.height);
        self.render_into(snap, drag, size, &mut fb);
        fb
    }

    fn draw_menu(&self, fb: &mut FrameBuffer, selected: Difficulty) {
        let text = CellStyle::fg(TEXT).on(BG);
        let muted = CellStyle::fg(MUTED).on(BG);
        let accent = CellStyle::fg(ACCENT).on(BG).bold();

        let mut y = fb.height() / 3;
        fb.put_str_centered(y, "SHAPE SNAP", accent);
        y = y.saturating_add(1);
        fb.put_str_centered(y, "drag each shape onto its outline", muted);
        y = y.saturating_add(2);

        for (i, d) in Difficulty::ALL.iter().enumerate() {
            let config = d.config();
            let marker = if *d == selected { '>' } else { ' ' };
            let line = format!(
                "{} [{}] {:<6} {} shapes{}",
                marker,
                i + 1,
                config.label,
                config.shape_count,
                if config.enable_rotation { ", rotation" } else { "" }
            );
            let style = if *d == selected { text.bold() } else { text };
            fb.put_str_centered(y, &line, style);
            y = y.saturating_add(1);
        }

        y = y.saturating_add(1);
        fb.put_str_centered(y, "Enter: start", muted);
    }

    fn draw_header(&self, fb: &mut FrameBuffer, snap: &GameSnapshot) {
        let text = CellStyle::fg(TEXT).on(BG).bold();
        let muted = CellStyle::fg(MUTED).on(BG);

        let (stage, total) = snap.progress();
        let stage_text = format!(" Stage {}/{} ", stage, total);
        fb.put_str(0, 0, &stage_text, text);

        let mut x = stage_text.chars().count() as u16;
        // One pip per stage.
        for s in 1..=total {
            let (ch, style) = if s < stage || (s == stage && snap.phase != GamePhase::Playing) {
                ('●', CellStyle::fg(ACCENT).on(BG))
            } else if s == stage {
                ('◉', CellStyle::fg(TEXT).on(BG))
            } else {
                ('○', muted)
            };
            fb.put_char(x, 0, ch, style);
            x = x.saturating_add(2);
        }

        let label = snap.difficulty.config().label;
        fb.put_str(x.saturating_add(1), 0, label, muted);
        x = x.saturating_add(label.len() as u16 + 3);

        if let Some(puzzle) = snap.puzzle.as_deref() {
            fb.put_str(x, 0, "placed ", muted);
            x = x.saturating_add(7);
            fb.put_u32(x, 0, snap.placed_count() as u32, muted);
            x = x.saturating_add(digits(snap.placed_count() as u32));
            fb.put_char(x, 0, '/', muted);
            fb.put_u32(x.saturating_add(1), 0, puzzle.len() as u32, muted);
        }
    }

    fn draw_grid_lines(&self, fb: &mut FrameBuffer, difficulty: Difficulty, viewport: Viewport) {
        let (cols, rows) = grid_dimensions(difficulty.config().shape_count);
        if cols == 0 || rows == 0 {
            return;
        }
        let (cx, cy) = target_area_center(viewport);
        let (w, h) = target_area_size(viewport);
        let (left, top) = (cx - w / 2.0, cy - h / 2.0);

        let col_of = |px: f32| (px / TERM_PX_PER_COL).max(0.0) as u16;
        let row_of = |py: f32| (py / TERM_PX_PER_ROW).max(0.0) as u16;

        let xs: Vec<u16> = (0..=cols)
            .map(|i| col_of(left + w * i as f32 / cols as f32))
            .collect();
        let ys: Vec<u16> = (0..=rows)
            .map(|i| row_of(top + h * i as f32 / rows as f32))
            .collect();
        let (x0, x1) = (xs[0], xs[xs.len() - 1]);
        let (y0, y1) = (ys[0], ys[ys.len() - 1]);

        let style = CellStyle::fg(GRID).on(BG);
        for &y in &ys {
            for x in x0..=x1 {
                fb.put_char(x, y, '─', style);
            }
        }
        for &x in &xs {
            for y in y0..=y1 {
                let ch = if ys.contains(&y) { '┼' } else { '│' };
                fb.put_char(x, y, ch, style);
            }
        }
    }

    fn draw_targets(&self, fb: &mut FrameBuffer, puzzle: &Puzzle) {
        let style = CellStyle::fg(TARGET).on(BG).dim();
        for target in &puzzle.targets {
            let rotation = target.required_rotation.unwrap_or_default();
            raster(fb, target.shape_type, rotation, target.x, target.y, |fb, x, y| {
                fb.put_char(x, y, '░', style);
            });
        }
    }

    fn draw_shapes(&self, fb: &mut FrameBuffer, puzzle: &Puzzle, drag: &DragController) {
        let grabbed = drag.grabbed();
        // Shapes the controller does not know yet are drawn in the tray.
        let fallback = puzzle
            .shapes
            .iter()
            .filter(|s| drag.pose(s.shape.id).is_none())
            .map(|s| s.shape.id);
        let order: Vec<_> = fallback.chain(drag.draw_order().iter().copied()).collect();

        for id in order {
            let Some(slot) = puzzle.slot(id) else {
                continue;
            };
            let pose = drag.pose(id).unwrap_or(ShapePose {
                x: slot.initial_x,
                y: slot.initial_y,
                rotation: slot.shape.rotation,
            });
            let color = Rgb::from(slot.shape.color);
            let style = if grabbed == Some(id) {
                CellStyle::fg(color).on(color.mix(BG, 0.6)).bold()
            } else {
                CellStyle::fg(color).on(BG)
            };
            raster(fb, slot.shape.shape_type, pose.rotation, pose.x, pose.y, |fb, x, y| {
                fb.put_char(x, y, '█', style);
            });
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, title: &str, hint: &str) {
        let w = (title.chars().count().max(hint.chars().count()) as u16).saturating_add(6);
        let h = 5;
        let x = fb.width().saturating_sub(w) / 2;
        let y = fb.height().saturating_sub(h) / 2;

        let panel = CellStyle::fg(TEXT);
        fb.fill_rect(x, y, w, h, ' ', panel);
        draw_border(fb, x, y, w, h, CellStyle::fg(ACCENT));
        fb.put_str_centered(y + 1, title, CellStyle::fg(ACCENT).bold());
        fb.put_str_centered(y + 3, hint, CellStyle::fg(MUTED));
    }

    fn draw_hints(&self, fb: &mut FrameBuffer, snap: &GameSnapshot) {
        let hint = match snap.phase {
            GamePhase::Menu => " 1/2/3: difficulty   Enter: start   q: quit",
            GamePhase::Playing if snap.difficulty.config().enable_rotation => {
                " drag: mouse   rotate: right-click or r   Esc: menu   q: quit"
            }
            GamePhase::Playing => " drag: mouse   Esc: menu   q: quit",
            GamePhase::StageClear | GamePhase::GameClear => " Enter: continue   Esc: menu   q: quit",
        };
        let y = fb.height().saturating_sub(1);
        fb.put_str(0, y, hint, CellStyle::fg(MUTED).on(BG).dim());
    }
}

/// Paint every cell whose center lies inside a shape anchored at `(ax, ay)`.
fn raster(
    fb: &mut FrameBuffer,
    shape_type: ShapeType,
    rotation: Rotation,
    ax: f32,
    ay: f32,
    mut paint: impl FnMut(&mut FrameBuffer, u16, u16),
) {
    let size = footprint(shape_type, rotation);
    let (bx, by) = anchor_to_box_center(shape_type, rotation);
    let left = ax + bx - size.width / 2.0;
    let top = ay + by - size.height / 2.0;

    let c0 = (left / TERM_PX_PER_COL).floor().max(0.0) as u16;
    let r0 = (top / TERM_PX_PER_ROW).floor().max(0.0) as u16;
    let c1 = (((left + size.width) / TERM_PX_PER_COL).ceil().max(0.0) as u16).min(fb.width());
    let r1 = (((top + size.height) / TERM_PX_PER_ROW).ceil().max(0.0) as u16).min(fb.height());

    let points = outline(shape_type, rotation);
    for row in r0..r1 {
        for col in c0..c1 {
            let (px, py) = cell_to_px(col, row);
            if outline_contains(&points, px - ax, py - ay) {
                paint(fb, col, row);
            }
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn digits(mut n: u32) -> u16 {
    let mut d = 1;
    while n >= 10 {
        n /= 10;
        d += 1;
    }
    d
}
