//! Undo stack for tile editing

use tile_engine::Result;

use crate::TileEditAction;

/// Trait for types that support undo/redo operations
pub trait TileUndoState {
    /// Get description of the next undo operation
    fn undo_description(&self) -> Option<String>;

    /// Check if undo is available
    fn can_undo(&self) -> bool;

    /// Perform undo operation
    fn undo(&mut self) -> Result<()>;

    /// Get description of the next redo operation
    fn redo_description(&self) -> Option<String>;

    /// Check if redo is available
    fn can_redo(&self) -> bool;

    /// Perform redo operation
    fn redo(&mut self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct TileUndoStack {
    undo_stack: Vec<TileEditAction>,
    redo_stack: Vec<TileEditAction>,
    /// Undo depth at the last save, `None` once that state can't be reached anymore
    save_point: Option<usize>,
}

impl TileUndoStack {
    pub fn new() -> Self {
        Self {
            save_point: Some(0),
            ..Default::default()
        }
    }

    /// Push a new action. Clears the redo stack.
    pub fn push(&mut self, action: TileEditAction) {
        if self.save_point.is_some_and(|depth| depth > self.undo_stack.len()) {
            self.save_point = None;
        }
        self.undo_stack.push(action);
        self.redo_stack.clear();
    }

    /// Push an action coming back from the redo stack
    pub fn push_undo(&mut self, action: TileEditAction) {
        self.undo_stack.push(action);
    }

    pub fn pop_undo(&mut self) -> Option<TileEditAction> {
        self.undo_stack.pop()
    }

    pub fn push_redo(&mut self, action: TileEditAction) {
        self.redo_stack.push(action);
    }

    pub fn pop_redo(&mut self) -> Option<TileEditAction> {
        self.redo_stack.pop()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(TileEditAction::get_description)
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(TileEditAction::get_description)
    }

    pub fn mark_saved(&mut self) {
        self.save_point = Some(self.undo_stack.len());
    }

    pub fn is_at_save_point(&self) -> bool {
        self.save_point == Some(self.undo_stack.len())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.save_point = Some(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(name: &str) -> TileEditAction {
        TileEditAction::new(name, Vec::new())
    }

    #[test]
    fn test_push_clears_redo() {
        let mut stack = TileUndoStack::new();
        stack.push(action("a"));
        let a = stack.pop_undo().unwrap();
        stack.push_redo(a);
        assert!(stack.can_redo());

        stack.push(action("b"));
        assert!(!stack.can_redo());
        assert_eq!(Some("b".to_string()), stack.undo_description());
    }

    #[test]
    fn test_save_point() {
        let mut stack = TileUndoStack::new();
        assert!(stack.is_at_save_point());
        stack.push(action("a"));
        assert!(!stack.is_at_save_point());
        stack.mark_saved();
        assert!(stack.is_at_save_point());

        // undo below the save point, then branch off
        let a = stack.pop_undo().unwrap();
        stack.push_redo(a);
        stack.push(action("b"));
        stack.pop_undo();
        assert!(!stack.is_at_save_point());
    }
}
