#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::too_many_arguments
)]
//! Editing layer on top of `tile_engine`
//!
//! Provides the model side of a tile editor:
//! - `EditOperationTracker` - snapshots tiles on first touch and emits per-tile diffs
//! - `TileEditAction` / `TileUndoStack` - reversible actions built from those diffs
//! - `TileEditState` - surface, tracker and undo stack wired together with drawing tools

pub mod brushes;
mod edit_state;
mod tracker;
mod undo_operation;
mod undo_stack;

pub use edit_state::TileEditState;
pub use tracker::{EditDiff, EditOperationTracker, GestureState};
pub use undo_operation::TileEditAction;
pub use undo_stack::{TileUndoStack, TileUndoState};

pub use tile_engine::{EngineError, Result, TileGridSurface};
