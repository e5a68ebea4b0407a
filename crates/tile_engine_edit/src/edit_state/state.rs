//! Surface plus change tracking plus undo history
//!
//! Every raster write goes through the `EditOperationTracker`, so each gesture ends up as
//! exactly one `TileEditAction` on the undo stack.

use std::path::Path;

use tile_engine::{BufferTransfer, Result, TileGridSurface, TransferKind};

use crate::{EditOperationTracker, TileUndoStack};

pub struct TileEditState {
    pub(super) surface: TileGridSurface,
    pub(super) tracker: EditOperationTracker,
    pub(super) undo_stack: TileUndoStack,
    pub(super) is_dirty: bool,
}

impl TileEditState {
    pub fn new(surface: TileGridSurface) -> Self {
        Self {
            surface,
            tracker: EditOperationTracker::new(),
            undo_stack: TileUndoStack::new(),
            is_dirty: false,
        }
    }

    pub fn surface(&self) -> &TileGridSurface {
        &self.surface
    }

    /// Mutable surface access for format and navigation changes.
    ///
    /// Raster writes made through this handle bypass the undo history. Loads, saves and buffer
    /// replacement go through [`TileEditState::begin_load`], [`TileEditState::begin_save`] and
    /// [`TileEditState::replace_buffer`] so the history stays consistent with the bytes.
    pub fn surface_mut(&mut self) -> &mut TileGridSurface {
        &mut self.surface
    }

    pub fn into_surface(self) -> TileGridSurface {
        self.surface
    }

    pub fn tracker(&self) -> &EditOperationTracker {
        &self.tracker
    }

    pub fn undo_stack(&self) -> &TileUndoStack {
        &self.undo_stack
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn set_dirty(&mut self, is_dirty: bool) {
        self.is_dirty = is_dirty;
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Gesture boundaries
    // ═══════════════════════════════════════════════════════════════════════

    /// Opens a gesture. Drawing calls until `end_gesture` form a single undo step.
    pub fn begin_gesture(&mut self, description: impl Into<String>) {
        self.tracker.begin_gesture(description);
    }

    pub fn is_gesture_open(&self) -> bool {
        self.tracker.is_open()
    }

    /// Commits the open gesture to the bytes and the undo stack.
    pub fn end_gesture(&mut self) -> Result<()> {
        if let Some(action) = self.tracker.end_gesture(&mut self.surface)? {
            self.push_plain_undo(action);
        }
        Ok(())
    }

    /// Reverts the raster to the state before the open gesture.
    pub fn cancel_gesture(&mut self) {
        self.tracker.cancel_gesture(&mut self.surface);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Buffer transfer
    // ═══════════════════════════════════════════════════════════════════════

    /// Commits any open gesture and starts loading `path`. Drawing and undo fail with
    /// `BufferInFlight` until [`TileEditState::finish_transfer`].
    pub fn begin_load(&mut self, path: impl AsRef<Path>) -> Result<BufferTransfer> {
        self.commit_open_gesture()?;
        self.surface.begin_load(path)
    }

    /// Commits any open gesture and starts writing the bytes to `path`.
    pub fn begin_save(&mut self, path: impl AsRef<Path>) -> Result<BufferTransfer> {
        self.commit_open_gesture()?;
        self.surface.begin_save(path)
    }

    /// Takes the bytes back from `transfer`.
    ///
    /// A completed load starts a fresh history, a completed save becomes the save point. Any
    /// gesture still tracked when a load returns is discarded since the raster was re-decoded.
    pub fn finish_transfer(&mut self, transfer: BufferTransfer) -> Result<()> {
        let kind = transfer.kind();
        let result = self.surface.finish_transfer(transfer);
        if kind == TransferKind::Load {
            self.discard_gesture();
        }
        result?;

        match kind {
            TransferKind::Load => self.reset_history(),
            TransferKind::Save => self.mark_saved(),
        }
        Ok(())
    }

    /// Commits any open gesture, installs `buffer` and returns the previous bytes. The history
    /// starts over on the new bytes.
    pub fn replace_buffer(&mut self, buffer: Vec<u8>) -> Result<Vec<u8>> {
        self.commit_open_gesture()?;
        let old = self.surface.replace_buffer(buffer)?;
        self.reset_history();
        Ok(old)
    }

    fn discard_gesture(&mut self) {
        if self.tracker.is_open() {
            log::debug!("discarding {} tracked tile(s) after buffer replacement", self.tracker.snapshot_count());
        }
        self.tracker = EditOperationTracker::new();
    }

    fn reset_history(&mut self) {
        self.discard_gesture();
        self.undo_stack.clear();
        self.is_dirty = false;
    }
}
