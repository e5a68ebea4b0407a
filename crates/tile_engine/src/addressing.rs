//! Grid coordinate → byte offset mapping.

use serde::{Deserialize, Serialize};

use crate::{EngineError, Result, TileFormat};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressingKind {
    /// Tiles follow each other in raster order.
    #[default]
    Contiguous1D,
    /// The grid is split into blocks of `block_width × block_height` tiles, each block stored
    /// as one unit.
    BlockGrouped2D,
}

/// How tiles of a grid are laid out in the source buffer.
///
/// The block fields are only meaningful for [`AddressingKind::BlockGrouped2D`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressingMode {
    pub kind: AddressingKind,
    pub block_width: usize,
    pub block_height: usize,
    /// Even and odd tile rows of a block are stored as (even, odd) pairs.
    pub row_interleaved: bool,
    /// The rows of the tiles on one block line are interleaved with each other
    /// (tile stride = `block_width - 1`).
    pub packed_2d: bool,
}

impl Default for AddressingMode {
    fn default() -> Self {
        Self::contiguous()
    }
}

impl AddressingMode {
    pub fn contiguous() -> Self {
        Self {
            kind: AddressingKind::Contiguous1D,
            block_width: 1,
            block_height: 1,
            row_interleaved: false,
            packed_2d: false,
        }
    }

    pub fn block_grouped(block_width: usize, block_height: usize) -> Self {
        Self {
            kind: AddressingKind::BlockGrouped2D,
            block_width,
            block_height,
            row_interleaved: false,
            packed_2d: false,
        }
    }

    pub fn with_row_interleave(mut self, row_interleaved: bool) -> Self {
        self.row_interleaved = row_interleaved;
        self
    }

    pub fn with_packed_2d(mut self, packed_2d: bool) -> Self {
        self.packed_2d = packed_2d;
        self
    }

    pub fn is_block_grouped(&self) -> bool {
        self.kind == AddressingKind::BlockGrouped2D
    }

    /// Packed 2D only applies to block grouped grids.
    pub fn is_packed_2d(&self) -> bool {
        self.is_block_grouped() && self.packed_2d
    }

    /// Tile rows of other tiles stored between two rows of one tile.
    pub fn stride(&self) -> usize {
        if self.is_packed_2d() { self.block_width - 1 } else { 0 }
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_block_grouped() && (self.block_width == 0 || self.block_height == 0) {
            return Err(EngineError::InvalidBlockDimensions {
                block_width: self.block_width,
                block_height: self.block_height,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            AddressingKind::Contiguous1D => write!(f, "1D"),
            AddressingKind::BlockGrouped2D => {
                write!(f, "2D {}x{} blocks", self.block_width, self.block_height)?;
                if self.row_interleaved {
                    write!(f, ", row-interleaved")?;
                }
                if self.packed_2d {
                    write!(f, ", packed")?;
                }
                Ok(())
            }
        }
    }
}

/// Resolves grid cells to tile offsets for one grid configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileAddressCalculator {
    format: TileFormat,
    mode: AddressingMode,
    cols: usize,
    rows: usize,
    base_offset: usize,
}

impl TileAddressCalculator {
    pub fn new(format: TileFormat, mode: AddressingMode, cols: usize, rows: usize, base_offset: usize) -> Result<Self> {
        mode.validate()?;
        if cols == 0 || rows == 0 || !Self::fits(&format, &mode, cols, rows) {
            return Err(EngineError::InvalidGridSize { cols, rows });
        }
        Ok(Self {
            format,
            mode,
            cols,
            rows,
            base_offset,
        })
    }

    /// Whether every size derived from the grid is representable: canvas area, page size,
    /// block sizes and the span of one tile.
    fn fits(format: &TileFormat, mode: &AddressingMode, cols: usize, rows: usize) -> bool {
        let canvas = cols
            .checked_mul(format.width())
            .zip(rows.checked_mul(format.height()))
            .and_then(|(width, height)| width.checked_mul(height));
        let page = cols.checked_mul(format.tile_size()).and_then(|row_size| row_size.checked_mul(rows));
        let furthest = if mode.is_block_grouped() {
            let row_size = cols.checked_mul(format.tile_size());
            let block_row = row_size.and_then(|size| size.checked_mul(mode.block_height));
            let block_size = mode
                .block_width
                .checked_mul(format.tile_size())
                .and_then(|line| line.checked_mul(mode.block_height));
            let span = format
                .bytes_per_row()
                .checked_mul(mode.stride() + 1)
                .and_then(|pitch| pitch.checked_mul(format.height()));
            page.and_then(|page| {
                [block_row, block_size, span]
                    .into_iter()
                    .try_fold(page, |sum, part| sum.checked_add(part?))
            })
        } else {
            page
        };
        canvas.and(furthest).is_some()
    }

    pub fn format(&self) -> &TileFormat {
        &self.format
    }

    pub fn mode(&self) -> &AddressingMode {
        &self.mode
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn base_offset(&self) -> usize {
        self.base_offset
    }

    pub fn stride(&self) -> usize {
        self.mode.stride()
    }

    /// Bytes of one full row of tiles.
    pub fn row_size(&self) -> usize {
        self.cols * self.format.tile_size()
    }

    /// Offset step from one tile to the next on the same line.
    pub fn tile_increment(&self) -> usize {
        if self.mode.is_packed_2d() {
            self.format.bytes_per_row()
        } else {
            self.format.tile_size()
        }
    }

    pub fn row_increment(&self) -> usize {
        self.row_size()
    }

    pub fn page_increment(&self) -> usize {
        self.row_increment() * self.rows
    }

    /// Offset of the tile at (`col`, `row`) relative to the base offset, without bounds check.
    pub fn relative_offset(&self, col: usize, row: usize) -> usize {
        match self.mode.kind {
            AddressingKind::Contiguous1D => row * self.row_size() + col * self.format.tile_size(),
            AddressingKind::BlockGrouped2D => self.block_offset(col, row),
        }
    }

    fn block_offset(&self, col: usize, row: usize) -> usize {
        let block_width = self.mode.block_width;
        let block_height = self.mode.block_height;
        let block_row_size = block_height * self.row_size();
        let block_line_size = block_width * self.format.tile_size();
        let block_size = block_height * block_line_size;
        let increment = self.tile_increment();

        let mut offset = (row / block_height) * block_row_size + (col / block_width) * block_size;
        let mut tile_x = col % block_width;
        let tile_y = row % block_height;

        if self.mode.row_interleaved {
            offset += (tile_y >> 1) * (block_line_size << 1);
            tile_x <<= 1;
            if self.mode.packed_2d && tile_x >= block_width {
                offset += block_line_size;
                tile_x -= block_width;
            }
            if tile_y % 2 == 1 {
                tile_x += 1;
            }
            offset + tile_x * increment
        } else {
            offset + tile_y * block_line_size + tile_x * increment
        }
    }

    /// Absolute offset of the tile at (`col`, `row`), or `None` when the tile doesn't fit
    /// completely inside a buffer of `buffer_len` bytes.
    pub fn address(&self, col: usize, row: usize, buffer_len: usize) -> Option<usize> {
        let offset = self.base_offset.checked_add(self.relative_offset(col, row))?;
        let limit = buffer_len.checked_sub(self.format.span(self.stride()))?;
        if offset <= limit { Some(offset) } else { None }
    }
}
