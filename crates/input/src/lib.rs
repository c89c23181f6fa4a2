//! Terminal input: key mapping and the drag controller.
//!
//! This module is independent of any rendering code. It maps `crossterm` key
//! events into [`UiIntent`]s (and, per phase, into
//! [`crate::types::GameCommand`]s) and provides a mouse drag-and-drop
//! controller that turns press/drag/release gestures into drop points.

pub mod drag;
pub mod map;

pub use shape_snap_core as core;
pub use shape_snap_types as types;

pub use drag::{cell_to_px, DragController, DragEvent, ShapePose};
pub use map::{command_for, handle_key_event, should_quit, UiIntent};
