use serde::{Deserialize, Serialize};

use crate::{EngineError, Result};

/// Largest tile edge accepted by any codec.
pub const MAX_TILE_DIMENSION: usize = 256;

/// Geometry of one encoded tile.
///
/// The byte sizes are derived from the bit depth and tile dimensions and are only ever
/// computed by the constructors, so a `TileFormat` can't hold stale sizes. Changing a
/// dimension means building a new value with [`TileFormat::with_dimensions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TileFormatRepr", into = "TileFormatRepr")]
pub struct TileFormat {
    bits_per_pixel: u8,
    width: usize,
    height: usize,
    pixel_group: usize,
    bytes_per_row: usize,
    tile_size: usize,
}

impl TileFormat {
    /// Format whose rows are packed bit-tight: `bytes_per_row = ceil(bpp * width / 8)`.
    pub fn new(bits_per_pixel: u8, width: usize, height: usize) -> Result<Self> {
        Self::with_pixel_groups(bits_per_pixel, width, height, 1)
    }

    /// Format whose rows are stored in whole groups of `pixel_group` pixels.
    ///
    /// Planar and group-packed codecs store 8 pixels at a time; a 12 pixel wide planar row
    /// still occupies two full bytes per plane. With `pixel_group == 1` this is identical to
    /// [`TileFormat::new`].
    pub fn with_pixel_groups(bits_per_pixel: u8, width: usize, height: usize, pixel_group: usize) -> Result<Self> {
        if bits_per_pixel == 0 || bits_per_pixel > 32 {
            return Err(EngineError::UnsupportedBitDepth { bits_per_pixel });
        }
        if width == 0 || height == 0 || width > MAX_TILE_DIMENSION || height > MAX_TILE_DIMENSION {
            return Err(EngineError::InvalidTileDimensions { width, height });
        }
        let pixel_group = pixel_group.max(1);
        let padded_width = width.div_ceil(pixel_group) * pixel_group;
        let bytes_per_row = (bits_per_pixel as usize * padded_width).div_ceil(8);
        Ok(Self {
            bits_per_pixel,
            width,
            height,
            pixel_group,
            bytes_per_row,
            tile_size: bytes_per_row * height,
        })
    }

    /// Same bit depth and row grouping, new dimensions.
    pub fn with_dimensions(&self, width: usize, height: usize) -> Result<Self> {
        Self::with_pixel_groups(self.bits_per_pixel, width, height, self.pixel_group)
    }

    pub fn bits_per_pixel(&self) -> u8 {
        self.bits_per_pixel
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_group(&self) -> usize {
        self.pixel_group
    }

    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    /// Size of one encoded tile in bytes.
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Number of pixels in one tile.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Distance between two rows of the same tile when `stride` other tile rows are
    /// interleaved between them.
    pub fn row_pitch(&self, stride: usize) -> usize {
        self.bytes_per_row * (stride + 1)
    }

    /// Number of bytes a tile touches from its start offset.
    pub fn span(&self, stride: usize) -> usize {
        self.row_pitch(stride) * (self.height - 1) + self.bytes_per_row
    }

    /// Values are palette indices (as opposed to raw colors).
    pub fn is_indexed(&self) -> bool {
        self.bits_per_pixel <= 8
    }

    /// Size of one sub-palette for indexed formats.
    pub fn color_count(&self) -> usize {
        if self.bits_per_pixel < 8 {
            1 << self.bits_per_pixel
        } else {
            256
        }
    }

    /// Mask of the bits a pixel value may occupy.
    pub fn value_mask(&self) -> u32 {
        if self.bits_per_pixel >= 32 {
            u32::MAX
        } else {
            (1u32 << self.bits_per_pixel) - 1
        }
    }
}

impl std::fmt::Display for TileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} @ {}bpp ({} bytes)", self.width, self.height, self.bits_per_pixel, self.tile_size)
    }
}

#[derive(Serialize, Deserialize)]
struct TileFormatRepr {
    bits_per_pixel: u8,
    width: usize,
    height: usize,
    #[serde(default = "default_pixel_group")]
    pixel_group: usize,
}

fn default_pixel_group() -> usize {
    1
}

impl TryFrom<TileFormatRepr> for TileFormat {
    type Error = EngineError;

    fn try_from(repr: TileFormatRepr) -> Result<Self> {
        TileFormat::with_pixel_groups(repr.bits_per_pixel, repr.width, repr.height, repr.pixel_group)
    }
}

impl From<TileFormat> for TileFormatRepr {
    fn from(format: TileFormat) -> Self {
        TileFormatRepr {
            bits_per_pixel: format.bits_per_pixel,
            width: format.width,
            height: format.height,
            pixel_group: format.pixel_group,
        }
    }
}
