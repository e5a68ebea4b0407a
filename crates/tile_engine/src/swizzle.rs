//! Platform pixel reordering
//!
//! A [`SwizzlePattern`] maps a canvas pixel (x, y) to the linear position its sample has in
//! the stored data. The surface reduces that position modulo the tile area, so a pattern only
//! ever reorders samples inside one tile. The pattern is resolved once per configuration into
//! a [`SwizzleMap`]; nothing on the per-pixel path matches on the pattern.

use serde::{Deserialize, Serialize};

use crate::{EngineError, Result};

/// Edge of the 4×4 pixel blocks used by block-compressed GPU formats.
pub const BLOCK_EDGE: usize = 4;

/// Edge of the Morton ordered tiles of the Nintendo handhelds.
pub const HANDHELD_TILE_EDGE: usize = 8;

const GROUP_WIDTH_IN_BLOCKS: usize = 8;
const GROUP_HEIGHT_IN_BLOCKS: usize = 2;

/// Parameters of a user defined block swizzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomSwizzle {
    pub block_width: usize,
    pub block_height: usize,
    /// Morton order inside a block instead of row-major.
    pub morton: bool,
}

impl Default for CustomSwizzle {
    fn default() -> Self {
        Self {
            block_width: 4,
            block_height: 4,
            morton: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SwizzlePattern {
    /// Row-major, no reordering.
    #[default]
    None,
    /// 4×4 blocks in block-major order, row-major inside a block (BC1-BC7).
    BlockCompressed,
    /// Z-order curve over the whole canvas (PSP).
    Morton,
    /// 8×8 tiles in raster order, Z-order inside a tile (NDS, 3DS).
    NestedBlockMorton,
    /// 4×4 blocks grouped into 8×2 block groups (Switch).
    GroupedBlockLinear,
    /// 4×4 blocks grouped into 2×2 super blocks ordered {0,1;2,3} (Wii).
    PairedBlock,
    Custom(CustomSwizzle),
}

/// Interleaves the bits of `x` (even bits) and `y` (odd bits).
///
/// Coordinates must fit into 16 bits.
pub fn morton_encode(x: u32, y: u32) -> u32 {
    spread_bits(x) | (spread_bits(y) << 1)
}

fn spread_bits(v: u32) -> u32 {
    let mut v = v & 0xFFFF;
    v = (v | (v << 8)) & 0x00FF_00FF;
    v = (v | (v << 4)) & 0x0F0F_0F0F;
    v = (v | (v << 2)) & 0x3333_3333;
    (v | (v << 1)) & 0x5555_5555
}

fn morton(x: usize, y: usize) -> usize {
    morton_encode(x as u32, y as u32) as usize
}

/// Block-major order with `block_width × block_height` blocks, Morton or row-major inside a block.
fn blocked(x: usize, y: usize, width: usize, block_width: usize, block_height: usize, morton_inner: bool) -> usize {
    let blocks_per_row = width.div_ceil(block_width);
    let block_index = (y / block_height) * blocks_per_row + x / block_width;
    let in_x = x % block_width;
    let in_y = y % block_height;
    let in_block = if morton_inner { morton(in_x, in_y) } else { in_y * block_width + in_x };
    block_index * block_width * block_height + in_block
}

fn grouped_block_linear(x: usize, y: usize, width: usize) -> usize {
    let block_x = x / BLOCK_EDGE;
    let block_y = y / BLOCK_EDGE;
    let blocks_per_row = width.div_ceil(BLOCK_EDGE);
    let groups_per_row = blocks_per_row.div_ceil(GROUP_WIDTH_IN_BLOCKS);

    let group_index = (block_y / GROUP_HEIGHT_IN_BLOCKS) * groups_per_row + block_x / GROUP_WIDTH_IN_BLOCKS;
    let block_in_group = (block_y % GROUP_HEIGHT_IN_BLOCKS) * GROUP_WIDTH_IN_BLOCKS + block_x % GROUP_WIDTH_IN_BLOCKS;
    let in_block = (y % BLOCK_EDGE) * BLOCK_EDGE + x % BLOCK_EDGE;

    let block_area = BLOCK_EDGE * BLOCK_EDGE;
    group_index * GROUP_WIDTH_IN_BLOCKS * GROUP_HEIGHT_IN_BLOCKS * block_area + block_in_group * block_area + in_block
}

fn paired_block(x: usize, y: usize, width: usize) -> usize {
    let block_x = x / BLOCK_EDGE;
    let block_y = y / BLOCK_EDGE;
    let blocks_per_row = width.div_ceil(BLOCK_EDGE);
    let supers_per_row = blocks_per_row.div_ceil(2);

    let super_index = (block_y / 2) * supers_per_row + block_x / 2;
    let block_in_super = (block_y % 2) * 2 + block_x % 2;
    let in_block = (y % BLOCK_EDGE) * BLOCK_EDGE + x % BLOCK_EDGE;

    let block_area = BLOCK_EDGE * BLOCK_EDGE;
    super_index * 4 * block_area + block_in_super * block_area + in_block
}

impl SwizzlePattern {
    pub fn name(&self) -> &'static str {
        match self {
            SwizzlePattern::None => "None",
            SwizzlePattern::BlockCompressed => "BlockCompressed",
            SwizzlePattern::Morton => "Morton",
            SwizzlePattern::NestedBlockMorton => "NestedBlockMorton",
            SwizzlePattern::GroupedBlockLinear => "GroupedBlockLinear",
            SwizzlePattern::PairedBlock => "PairedBlock",
            SwizzlePattern::Custom(_) => "Custom",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, SwizzlePattern::None)
    }

    /// Linear position of the sample for pixel (`x`, `y`) of a `width × height` area.
    ///
    /// The pattern must have passed [`SwizzlePattern::validate`].
    pub fn apply(&self, x: usize, y: usize, width: usize, _height: usize) -> usize {
        match self {
            SwizzlePattern::None => y * width + x,
            SwizzlePattern::BlockCompressed => blocked(x, y, width, BLOCK_EDGE, BLOCK_EDGE, false),
            SwizzlePattern::Morton => morton(x, y),
            SwizzlePattern::NestedBlockMorton => blocked(x, y, width, HANDHELD_TILE_EDGE, HANDHELD_TILE_EDGE, true),
            SwizzlePattern::GroupedBlockLinear => grouped_block_linear(x, y, width),
            SwizzlePattern::PairedBlock => paired_block(x, y, width),
            SwizzlePattern::Custom(custom) => blocked(x, y, width, custom.block_width, custom.block_height, custom.morton),
        }
    }

    /// Searches the coordinates whose [`SwizzlePattern::apply`] result is `index`.
    ///
    /// Brute force over the whole `width × height` area; meant for single lookups, not for
    /// decoding. Falls back to row-major coordinates when no pixel maps to `index`.
    pub fn reverse(&self, index: usize, width: usize, height: usize) -> (usize, usize) {
        let width = width.max(1);
        if !self.is_none() {
            for y in 0..height {
                for x in 0..width {
                    if self.apply(x, y, width, height) == index {
                        return (x, y);
                    }
                }
            }
        }
        (index % width, index / width)
    }

    /// Tile size the pattern is designed for, if it has one.
    pub fn optimal_tile_size(&self) -> Option<(usize, usize)> {
        match self {
            SwizzlePattern::BlockCompressed | SwizzlePattern::GroupedBlockLinear | SwizzlePattern::PairedBlock => Some((BLOCK_EDGE, BLOCK_EDGE)),
            SwizzlePattern::NestedBlockMorton => Some((HANDHELD_TILE_EDGE, HANDHELD_TILE_EDGE)),
            SwizzlePattern::None | SwizzlePattern::Morton | SwizzlePattern::Custom(_) => None,
        }
    }

    /// Checks the pattern parameters. Called before a pattern is ever applied.
    pub fn validate(&self) -> Result<()> {
        let SwizzlePattern::Custom(custom) = self else {
            return Ok(());
        };
        if custom.block_width == 0 || custom.block_height == 0 {
            return Err(EngineError::invalid_swizzle(format!(
                "block dimensions must be non zero, got {}x{}",
                custom.block_width, custom.block_height
            )));
        }
        if custom.block_width > u16::MAX as usize || custom.block_height > u16::MAX as usize {
            return Err(EngineError::invalid_swizzle(format!(
                "block dimensions {}x{} exceed 16 bit coordinates",
                custom.block_width, custom.block_height
            )));
        }
        if custom.morton {
            if !custom.block_width.is_power_of_two() || !custom.block_height.is_power_of_two() {
                return Err(EngineError::invalid_swizzle(format!(
                    "morton order needs power of two blocks, got {}x{}",
                    custom.block_width, custom.block_height
                )));
            }
            if morton(custom.block_width - 1, custom.block_height - 1) >= custom.block_width * custom.block_height {
                return Err(EngineError::invalid_swizzle(format!(
                    "morton order doesn't fit a {}x{} block",
                    custom.block_width, custom.block_height
                )));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for SwizzlePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwizzlePattern::Custom(custom) => write!(
                f,
                "Custom {}x{} {}",
                custom.block_width,
                custom.block_height,
                if custom.morton { "morton" } else { "linear" }
            ),
            pattern => write!(f, "{}", pattern.name()),
        }
    }
}

/// A swizzle pattern resolved for one canvas.
///
/// Holds for every canvas pixel the position of its sample inside the decoded tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwizzleMap {
    pattern: SwizzlePattern,
    canvas_width: usize,
    canvas_height: usize,
    tile_width: usize,
    tile_height: usize,
    sources: Vec<u32>,
}

impl SwizzleMap {
    /// Resolves `pattern` for a grid of `cols × rows` tiles.
    ///
    /// Fails with [`EngineError::MisalignedSwizzle`] when the pattern does not permute the
    /// samples of every tile among themselves.
    pub fn new(pattern: SwizzlePattern, tile_width: usize, tile_height: usize, cols: usize, rows: usize) -> Result<Self> {
        pattern.validate()?;
        let canvas_width = cols * tile_width;
        let canvas_height = rows * tile_height;
        let tile_area = tile_width * tile_height;
        let misaligned = || EngineError::MisalignedSwizzle {
            pattern: pattern.to_string(),
            tile_width,
            tile_height,
        };

        let mut sources = vec![0u32; canvas_width * canvas_height];
        let mut seen = vec![false; tile_area];
        for row in 0..rows {
            for col in 0..cols {
                seen.iter_mut().for_each(|s| *s = false);
                for p in 0..tile_height {
                    for q in 0..tile_width {
                        let x = col * tile_width + q;
                        let y = row * tile_height + p;
                        let source = pattern.apply(x, y, canvas_width, canvas_height) % tile_area;
                        if std::mem::replace(&mut seen[source], true) {
                            return Err(misaligned());
                        }
                        sources[y * canvas_width + x] = source as u32;
                    }
                }
            }
        }

        Ok(Self {
            pattern,
            canvas_width,
            canvas_height,
            tile_width,
            tile_height,
            sources,
        })
    }

    pub fn pattern(&self) -> SwizzlePattern {
        self.pattern
    }

    /// Whether the map was built for `pattern` on this grid geometry.
    pub fn matches(&self, pattern: SwizzlePattern, tile_width: usize, tile_height: usize, cols: usize, rows: usize) -> bool {
        self.pattern == pattern
            && self.tile_width == tile_width
            && self.tile_height == tile_height
            && cols.checked_mul(tile_width) == Some(self.canvas_width)
            && rows.checked_mul(tile_height) == Some(self.canvas_height)
    }

    /// Tile-relative sample position of canvas pixel (`x`, `y`).
    #[inline]
    pub fn source(&self, x: usize, y: usize) -> usize {
        self.sources[y * self.canvas_width + x] as usize
    }
}
