//! Terminal Shape Snap runner (default binary).
//!
//! Mouse drag-and-drop over crossterm, drawn with the framebuffer renderer.
//! Logs go to `SHAPE_SNAP_LOG_PATH` when it is set and nowhere otherwise.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;

use shape_snap::adapter::RuntimeConfig;
use shape_snap::core::{GameEvent, GameState, SimpleRng};
use shape_snap::input::{command_for, handle_key_event, should_quit, DragController, DragEvent, UiIntent};
use shape_snap::logging;
use shape_snap::term::{FrameBuffer, GameView, TermSize, TerminalRenderer};
use shape_snap::types::GamePhase;

const FRAME_MS: u64 = 33;

fn main() -> Result<()> {
    let config = RuntimeConfig::from_env();
    if let Some(path) = &config.log_path {
        logging::init_file(path)?;
    }

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, config: &RuntimeConfig) -> Result<()> {
    let mut rng = match config.seed {
        Some(seed) => SimpleRng::new(seed),
        None => SimpleRng::from_entropy(),
    };
    info!(seed = rng.seed(), threshold = config.snap_threshold, "starting");

    let mut state = GameState::new();
    state.set_difficulty(config.difficulty);

    let view = GameView::new();
    let mut drag = DragController::new();
    let mut fb = FrameBuffer::new(0, 0);

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let size = TermSize::new(w, h);

        // The generator collaborator: at most one puzzle per stage.
        state.ensure_puzzle(size.viewport(), &mut rng);
        drag.sync(state.puzzle());

        // The audio collaborator: ring the bell on success.
        for event in state.take_events() {
            info!(event = event.as_str(), "game event");
            if matches!(
                event,
                GameEvent::ShapeSnapped { .. } | GameEvent::StageCleared { .. }
            ) {
                term.bell()?;
            }
        }

        view.render_into(&state.snapshot(), &drag, size, &mut fb);
        term.draw_swap(&mut fb)?;

        if !event::poll(Duration::from_millis(FRAME_MS))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    return Ok(());
                }
                let Some(intent) = handle_key_event(key) else {
                    continue;
                };
                if intent == UiIntent::Rotate {
                    if let (GamePhase::Playing, Some(puzzle)) = (state.phase(), state.puzzle()) {
                        drag.rotate(puzzle, state.config().enable_rotation);
                    }
                } else if let Some(cmd) = command_for(intent, state.phase()) {
                    state.apply(cmd);
                }
            }
            Event::Mouse(mouse) => {
                if state.phase() != GamePhase::Playing {
                    continue;
                }
                let Some(puzzle) = state.puzzle() else {
                    continue;
                };
                let enable_rotation = state.config().enable_rotation;
                for drag_event in drag.handle_mouse(mouse, puzzle, enable_rotation) {
                    let DragEvent::Released { shape_id, point } = drag_event else {
                        continue;
                    };
                    let outcome = state.drop_shape(shape_id, point, config.snap_threshold);
                    if let Some(puzzle) = state.puzzle() {
                        drag.apply_outcome(shape_id, &outcome, puzzle);
                    }
                }
            }
            Event::Resize(..) => term.invalidate(),
            _ => {}
        }
    }
}
