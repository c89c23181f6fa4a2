//! Shape Snap (workspace facade crate).
//!
//! A shape-matching drag-and-drop puzzle. The implementation lives in
//! dedicated crates under `crates/`; this package re-exports them as
//! `shape_snap::{core,adapter,term,input,types}` and hosts the binaries.

pub use shape_snap_adapter as adapter;
pub use shape_snap_core as core;
pub use shape_snap_input as input;
pub use shape_snap_term as term;
pub use shape_snap_types as types;

pub mod logging;
