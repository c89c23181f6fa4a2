//! Adapter module - headless control of the puzzle over line-delimited JSON.
//!
//! External drivers (scripts, test harnesses, bots) play the game without a
//! terminal: they send abstract commands and drop positions, and receive the
//! game snapshot plus the notifications raised since the last reply.
//!
//! # Message Types
//!
//! ## Client → Game
//!
//! - **command**: apply state machine commands in order
//! - **drop**: release a shape at a pixel position (optional rotation)
//! - **viewport**: set the screen size puzzles are laid out in
//! - **observe**: request an observation
//!
//! ## Game → Client
//!
//! - **observation**: snapshot and drained events
//! - **drop_result**: outcome of a `drop`, sent before its observation
//! - **error**: `invalid_json`, `unknown_shape` or `invalid_viewport`
//!
//! # Environment Variables
//!
//! - `SHAPE_SNAP_SEED`: seed for puzzle generation (default: OS entropy)
//! - `SHAPE_SNAP_THRESHOLD`: snap distance in px (default: 50)
//! - `SHAPE_SNAP_DIFFICULTY`: `easy`, `normal` or `hard` (default: easy)
//! - `SHAPE_SNAP_LOG_PATH`: write logs to this file
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Game: {"type":"command","commands":[{"cmd":"setDifficulty","difficulty":"normal"},{"cmd":"start"}]}
//! Game -> Client: {"type":"observation","seq":1,"snapshot":{...},"events":[{"event":"puzzle_ready","stage":1}]}
//! Client -> Game: {"type":"drop","shape_id":3735928559,"x":412.0,"y":305.5}
//! Game -> Client: {"type":"drop_result","seq":2,"shape_id":3735928559,"outcome":{"outcome":"snapped",...}}
//! Game -> Client: {"type":"observation","seq":3,"snapshot":{...},"events":[{"event":"shape_snapped",...}]}
//! ```

pub mod config;
pub mod protocol;
pub mod session;

pub use shape_snap_core as core;
pub use shape_snap_types as types;

pub use config::RuntimeConfig;
pub use protocol::{
    parse_message, CommandList, ErrorCode, InboundMessage, OutboundMessage, ProtocolError,
};
pub use session::{Session, DEFAULT_VIEWPORT};
