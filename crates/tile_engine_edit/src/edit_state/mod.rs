//! Tile edit state
//!
//! - `state.rs` - struct definition, accessors, gesture boundaries
//! - `shape_operations.rs` - pixel, line, rectangle and flood fill drawing
//! - `undo.rs` - undo/redo system

mod shape_operations;
mod state;
mod undo;

pub use state::TileEditState;
