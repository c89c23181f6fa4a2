//! Terminal renderer for the shape puzzle.
//!
//! Rendering goes through a small framebuffer instead of a widget toolkit:
//! [`GameView`] rasterizes targets and shapes from their pixel coordinates into
//! cells, and [`TerminalRenderer`] flushes only the cells that changed.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Keep the view pure so screens can be asserted on in tests

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use shape_snap_core as core;
pub use shape_snap_input as input;
pub use shape_snap_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, TermSize};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
