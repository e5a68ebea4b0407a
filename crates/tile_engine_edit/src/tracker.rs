//! Per-gesture change tracking
//!
//! A gesture starts `Idle`. The first pixel write moves it to `Accumulating`; from then on
//! every tile is snapshotted the first time one of its pixels is written. Ending the gesture
//! re-encodes each touched tile, captures its post-image and hands the diffs out as one
//! `TileEditAction`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};
use tile_engine::{EngineError, Result, TileGridSurface};

use crate::TileEditAction;

const DEFAULT_DESCRIPTION: &str = "Edit pixels";

/// Pre- and post-image of one tile, in canvas pixels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDiff {
    pub col: usize,
    pub row: usize,
    /// Canvas rectangle of the tile when it was snapshotted.
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub before: Vec<u32>,
    pub after: Vec<u32>,
}

impl EditDiff {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    Accumulating,
}

#[derive(Debug, Default)]
pub struct EditOperationTracker {
    state: GestureState,
    description: Option<String>,
    /// tile coordinate -> index into `snapshots`
    touched: HashMap<(usize, usize), usize>,
    snapshots: Vec<EditDiff>,
}

impl EditOperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// True between `begin_gesture` (or the first write) and `end_gesture` / `cancel_gesture`.
    pub fn is_open(&self) -> bool {
        self.description.is_some() || self.state == GestureState::Accumulating
    }

    /// Names the upcoming gesture. Ignored while a gesture is already accumulating.
    pub fn begin_gesture(&mut self, description: impl Into<String>) {
        let description = description.into();
        if self.is_open() {
            log::warn!("begin_gesture('{description}') while a gesture is open, ignored");
            return;
        }
        self.description = Some(description);
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_touched(&self, col: usize, row: usize) -> bool {
        self.touched.contains_key(&(col, row))
    }

    /// Pre-image captured for a tile in the running gesture.
    pub fn pre_image(&self, col: usize, row: usize) -> Option<&[u32]> {
        let index = *self.touched.get(&(col, row))?;
        self.snapshots.get(index).map(|diff| diff.before.as_slice())
    }

    /// Touched tiles in first-touch order.
    pub fn touched_tiles(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.snapshots.iter().map(|diff| (diff.col, diff.row))
    }

    /// Registers an upcoming write to canvas pixel (`x`, `y`), snapshotting its tile on first touch.
    ///
    /// Returns `false` for pixels outside the canvas. Fails without snapshotting while the
    /// surface's bytes are out on a load or save.
    pub fn record_write(&mut self, surface: &TileGridSurface, x: usize, y: usize) -> Result<bool> {
        if surface.is_transfer_in_flight() {
            return Err(EngineError::BufferInFlight);
        }
        let Some((col, row)) = surface.tile_at(x, y) else {
            return Ok(false);
        };
        self.state = GestureState::Accumulating;

        if let Entry::Vacant(entry) = self.touched.entry((col, row)) {
            let (width, height) = (surface.format().width(), surface.format().height());
            let (x, y) = (col * width, row * height);
            entry.insert(self.snapshots.len());
            self.snapshots.push(EditDiff {
                col,
                row,
                x,
                y,
                width,
                height,
                before: surface.read_rect(x, y, width, height),
                after: Vec::new(),
            });
        }
        Ok(true)
    }

    pub fn set_pixel(&mut self, surface: &mut TileGridSurface, x: usize, y: usize, color: u32) -> Result<bool> {
        Ok(self.record_write(surface, x, y)? && surface.set_pixel(x, y, color))
    }

    /// Commits the gesture: packs every touched tile and bundles one diff per tile.
    ///
    /// Returns `None` if nothing was written. On error the gesture stays open.
    pub fn end_gesture(&mut self, surface: &mut TileGridSurface) -> Result<Option<TileEditAction>> {
        for diff in &mut self.snapshots {
            surface.pack_tile(diff.col, diff.row)?;
            diff.after = surface.read_rect(diff.x, diff.y, diff.width, diff.height);
        }

        let description = self.description.take().unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
        let diffs = std::mem::take(&mut self.snapshots);
        self.reset();

        if diffs.is_empty() {
            return Ok(None);
        }
        log::debug!("gesture '{description}' committed {} tile(s)", diffs.len());
        Ok(Some(TileEditAction::new(description, diffs)))
    }

    /// Drops the gesture and writes every pre-image back into the raster.
    ///
    /// The byte buffer is untouched since nothing is packed before `end_gesture`.
    pub fn cancel_gesture(&mut self, surface: &mut TileGridSurface) -> usize {
        let restored = self.snapshots.len();
        for diff in self.snapshots.drain(..) {
            surface.write_rect(diff.x, diff.y, diff.width, diff.height, &diff.before);
        }
        self.description = None;
        self.reset();
        if restored > 0 {
            log::debug!("gesture cancelled, restored {restored} tile(s)");
        }
        restored
    }

    fn reset(&mut self) {
        self.touched.clear();
        self.snapshots.clear();
        self.state = GestureState::Idle;
    }
}
