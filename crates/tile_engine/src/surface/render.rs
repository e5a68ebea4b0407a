use super::{BufferSlot, INVALID_TILE_COLOR, TileGridSurface};
use crate::{EngineError, Result};

impl TileGridSurface {
    /// Reallocates the per-tile scratch buffer if it doesn't match the active format.
    fn ensure_scratch(&mut self) {
        let needed = self.format().pixel_count();
        if self.scratch.len() != needed {
            log::debug!("tile scratch buffer resized {} -> {needed}", self.scratch.len());
            self.scratch = vec![0; needed];
        }
    }

    /// Decodes the whole grid into the raster.
    ///
    /// Cells whose tile doesn't fit into the buffer are filled with [`INVALID_TILE_COLOR`].
    pub fn unpack(&mut self) -> Result<()> {
        if matches!(self.buffer, BufferSlot::InFlight) {
            return Err(EngineError::BufferInFlight);
        }
        self.ensure_scratch();

        let BufferSlot::Resident(bits) = &self.buffer else {
            return Err(EngineError::BufferInFlight);
        };
        let format = *self.calculator.format();
        let (tile_width, tile_height) = (format.width(), format.height());
        let canvas_width = self.cols() * tile_width;
        let stride = self.calculator.stride();
        let indexed = format.is_indexed();
        let palette_base = self.palette_base();

        for row in 0..self.calculator.rows() {
            for col in 0..self.calculator.cols() {
                let origin_x = col * tile_width;
                let origin_y = row * tile_height;

                let Some(offset) = self.calculator.address(col, row, bits.len()) else {
                    for y in origin_y..origin_y + tile_height {
                        let start = y * canvas_width + origin_x;
                        self.pixels[start..start + tile_width].fill(INVALID_TILE_COLOR);
                    }
                    continue;
                };

                self.codec.decode_into(&format, bits, offset, stride, &mut self.scratch);
                for p in 0..tile_height {
                    for q in 0..tile_width {
                        let x = origin_x + q;
                        let y = origin_y + p;
                        let source = match &self.swizzle_map {
                            Some(map) => map.source(x, y),
                            None => p * tile_width + q,
                        };
                        let value = self.scratch[source];
                        self.pixels[y * canvas_width + x] = if indexed {
                            self.palette.entry_rgb(palette_base + value as usize)
                        } else {
                            value
                        };
                    }
                }
            }
        }
        Ok(())
    }

    /// Encodes the raster pixels of one tile back into the buffer.
    ///
    /// Returns `false` if the cell is outside the grid or its tile doesn't fit into the buffer.
    pub fn pack_tile(&mut self, col: usize, row: usize) -> Result<bool> {
        if matches!(self.buffer, BufferSlot::InFlight) {
            return Err(EngineError::BufferInFlight);
        }
        if col >= self.cols() || row >= self.rows() {
            return Ok(false);
        }
        self.ensure_scratch();
        let palette_base = self.palette_base();

        let BufferSlot::Resident(bits) = &mut self.buffer else {
            return Err(EngineError::BufferInFlight);
        };
        let Some(offset) = self.calculator.address(col, row, bits.len()) else {
            return Ok(false);
        };

        let format = *self.calculator.format();
        let (tile_width, tile_height) = (format.width(), format.height());
        let canvas_width = self.calculator.cols() * tile_width;
        let indexed = format.is_indexed();
        let color_count = format.color_count();
        let mask = format.value_mask();

        for p in 0..tile_height {
            for q in 0..tile_width {
                let x = col * tile_width + q;
                let y = row * tile_height + p;
                let color = self.pixels[y * canvas_width + x];
                let source = match &self.swizzle_map {
                    Some(map) => map.source(x, y),
                    None => p * tile_width + q,
                };
                self.scratch[source] = if indexed {
                    self.palette.index_of(palette_base, color_count, color) & mask
                } else {
                    color
                };
            }
        }

        self.codec.encode(&format, &self.scratch, bits, offset, self.calculator.stride());
        Ok(true)
    }

    /// Encodes every tile of the grid. Returns the number of tiles written.
    pub fn pack(&mut self) -> Result<usize> {
        let mut packed = 0;
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                if self.pack_tile(col, row)? {
                    packed += 1;
                }
            }
        }
        Ok(packed)
    }
}
