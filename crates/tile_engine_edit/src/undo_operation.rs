//! Reversible tile edit actions
//!
//! Undo and redo write the stored raster images back and re-encode every tile they
//! intersect with the codec and layout active at that moment, so an action stays exact
//! even when the tile format changed after it was recorded.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tile_engine::{EngineError, Result, TileGridSurface};

use crate::EditDiff;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileEditAction {
    description: String,
    diffs: Vec<EditDiff>,
}

impl TileEditAction {
    pub fn new(description: impl Into<String>, diffs: Vec<EditDiff>) -> Self {
        Self {
            description: description.into(),
            diffs,
        }
    }

    pub fn get_description(&self) -> String {
        self.description.clone()
    }

    pub fn diffs(&self) -> &[EditDiff] {
        &self.diffs
    }

    /// Whether this action changes data (affects dirty flag)
    pub fn changes_data(&self) -> bool {
        self.diffs.iter().any(EditDiff::changed)
    }

    pub fn undo(&self, surface: &mut TileGridSurface) -> Result<()> {
        apply_images(surface, &self.diffs, |diff| &diff.before)
    }

    pub fn redo(&self, surface: &mut TileGridSurface) -> Result<()> {
        apply_images(surface, &self.diffs, |diff| &diff.after)
    }
}

fn apply_images<'a>(surface: &mut TileGridSurface, diffs: &'a [EditDiff], image: impl Fn(&'a EditDiff) -> &'a Vec<u32>) -> Result<()> {
    // the raster must not change unless the bytes can follow
    if surface.is_transfer_in_flight() {
        return Err(EngineError::BufferInFlight);
    }

    let mut tiles = BTreeSet::new();
    for diff in diffs {
        surface.write_rect(diff.x, diff.y, diff.width, diff.height, image(diff));
        tiles.extend(intersecting_tiles(surface, diff));
    }
    for (col, row) in tiles {
        surface.pack_tile(col, row)?;
    }
    Ok(())
}

/// Cells of the current grid covered by the diff rectangle.
fn intersecting_tiles(surface: &TileGridSurface, diff: &EditDiff) -> Vec<(usize, usize)> {
    let (tile_width, tile_height) = (surface.format().width(), surface.format().height());
    if diff.width == 0 || diff.height == 0 || diff.x >= surface.canvas_width() || diff.y >= surface.canvas_height() {
        return Vec::new();
    }
    let last_col = ((diff.x + diff.width - 1) / tile_width).min(surface.cols() - 1);
    let last_row = ((diff.y + diff.height - 1) / tile_height).min(surface.rows() - 1);

    let mut tiles = Vec::new();
    for row in diff.y / tile_height..=last_row {
        for col in diff.x / tile_width..=last_col {
            tiles.push((col, row));
        }
    }
    tiles
}
