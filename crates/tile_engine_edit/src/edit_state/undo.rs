//! Undo/Redo system for the tile editor

use tile_engine::Result;

use crate::{TileEditAction, TileUndoState};

use super::TileEditState;

impl TileEditState {
    /// Push an already applied action
    pub(super) fn push_plain_undo(&mut self, action: TileEditAction) {
        if action.changes_data() {
            self.is_dirty = true;
        }
        self.undo_stack.push(action);
    }

    pub fn undo_stack_len(&self) -> usize {
        self.undo_stack.undo_len()
    }

    pub fn redo_stack_len(&self) -> usize {
        self.undo_stack.redo_len()
    }

    /// Mark as saved (clears dirty flag and marks save point in undo stack)
    pub fn mark_saved(&mut self) {
        self.is_dirty = false;
        self.undo_stack.mark_saved();
    }

    pub(super) fn commit_open_gesture(&mut self) -> Result<()> {
        if self.tracker.is_open() {
            self.end_gesture()?;
        }
        Ok(())
    }
}

impl TileUndoState for TileEditState {
    fn undo_description(&self) -> Option<String> {
        self.undo_stack.undo_description()
    }

    fn can_undo(&self) -> bool {
        self.undo_stack.can_undo()
    }

    fn undo(&mut self) -> Result<()> {
        self.commit_open_gesture()?;
        let Some(action) = self.undo_stack.pop_undo() else {
            return Ok(());
        };
        if let Err(err) = action.undo(&mut self.surface) {
            self.undo_stack.push_undo(action);
            return Err(err);
        }
        self.undo_stack.push_redo(action);
        self.is_dirty = !self.undo_stack.is_at_save_point();
        Ok(())
    }

    fn redo_description(&self) -> Option<String> {
        self.undo_stack.redo_description()
    }

    fn can_redo(&self) -> bool {
        self.undo_stack.can_redo()
    }

    fn redo(&mut self) -> Result<()> {
        self.commit_open_gesture()?;
        let Some(action) = self.undo_stack.pop_redo() else {
            return Ok(());
        };
        if let Err(err) = action.redo(&mut self.surface) {
            self.undo_stack.push_redo(action);
            return Err(err);
        }
        self.undo_stack.push_undo(action);
        self.is_dirty = !self.undo_stack.is_at_save_point();
        Ok(())
    }
}
