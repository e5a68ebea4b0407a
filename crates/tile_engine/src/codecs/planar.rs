//! Planar (bitplane) codecs
//!
//! Every pixel value is split into `bits_per_pixel` planes. A plane stores one bit per pixel,
//! eight pixels to a byte, most significant bit = leftmost pixel. Rows narrower than a
//! multiple of 8 use only the leading bits of their last byte.

use crate::{TileFormat, codecs::read_byte, codecs::write_byte};

use super::TileCodec;

lazy_static::lazy_static! {
    /// `PLANE_EXPANSION[plane][byte][x]` is the contribution of bit `7 - x` of `byte` to
    /// the value of pixel `x` when the byte belongs to bitplane `plane`.
    static ref PLANE_EXPANSION: Vec<[[u8; 8]; 256]> = (0..8)
        .map(|plane| {
            let mut table = [[0u8; 8]; 256];
            for (byte, pixels) in table.iter_mut().enumerate() {
                for (x, pixel) in pixels.iter_mut().enumerate() {
                    *pixel = (((byte >> (7 - x)) & 1) << plane) as u8;
                }
            }
            table
        })
        .collect();
}

/// Arrangement of the planes inside a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneLayout {
    /// All planes of an 8 pixel group are stored next to each other, group after group,
    /// row after row (Game Boy, SNES 2bpp, Master System).
    RowInterleaved,
    /// Planes are stored as 2bpp row-interleaved sub-tiles, pair after pair (SNES 4bpp/8bpp,
    /// PC Engine).
    PairInterleaved,
    /// Each plane is a complete 1bpp tile, plane after plane (NES).
    Sequential,
}

pub struct PlanarCodec {
    id: String,
    description: String,
    bits_per_pixel: u8,
    layout: PlaneLayout,
}

impl PlanarCodec {
    pub fn new(id: impl Into<String>, description: impl Into<String>, bits_per_pixel: u8, layout: PlaneLayout) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            bits_per_pixel: bits_per_pixel.clamp(1, 8),
            layout,
        }
    }

    pub fn layout(&self) -> PlaneLayout {
        self.layout
    }

    /// Byte position of (row, group, plane) relative to the tile start.
    fn plane_byte(&self, format: &TileFormat, stride: usize, row: usize, group: usize, plane: usize) -> usize {
        let planes = self.bits_per_pixel as usize;
        match self.layout {
            PlaneLayout::RowInterleaved => row * format.row_pitch(stride) + group * planes + plane,
            PlaneLayout::PairInterleaved => {
                let groups = format.bytes_per_row() / planes;
                let pair_row = groups * 2;
                let pair_size = pair_row * format.height();
                (plane / 2) * pair_size + row * pair_row + group * 2 + plane % 2
            }
            PlaneLayout::Sequential => {
                let groups = format.bytes_per_row() / planes;
                plane * groups * format.height() + row * groups + group
            }
        }
    }
}

impl TileCodec for PlanarCodec {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn bits_per_pixel(&self) -> u8 {
        self.bits_per_pixel
    }

    fn pixel_group(&self) -> usize {
        8
    }

    fn supports_row_stride(&self) -> bool {
        self.layout == PlaneLayout::RowInterleaved
    }

    fn decode_into(&self, format: &TileFormat, bits: &[u8], offset: usize, stride: usize, pixels: &mut [u32]) {
        let planes = self.bits_per_pixel as usize;
        let width = format.width();
        let mut plane_bytes = [0u8; 8];
        let mut pos = 0;

        for row in 0..format.height() {
            let mut x = 0;
            let mut group = 0;
            while x < width {
                for (plane, byte) in plane_bytes.iter_mut().enumerate().take(planes) {
                    *byte = read_byte(bits, offset + self.plane_byte(format, stride, row, group, plane));
                }

                let in_group = (width - x).min(8);
                for px in 0..in_group {
                    let mut value = 0u8;
                    for (plane, byte) in plane_bytes.iter().enumerate().take(planes) {
                        value |= PLANE_EXPANSION[plane][*byte as usize][px];
                    }
                    if let Some(p) = pixels.get_mut(pos) {
                        *p = value as u32;
                    }
                    pos += 1;
                }

                x += in_group;
                group += 1;
            }
        }
    }

    fn encode(&self, format: &TileFormat, pixels: &[u32], bits: &mut [u8], offset: usize, stride: usize) {
        let planes = self.bits_per_pixel as usize;
        let width = format.width();
        let mut pos = 0;

        for row in 0..format.height() {
            let mut x = 0;
            let mut group = 0;
            while x < width {
                let mut plane_bytes = [0u8; 8];
                let in_group = (width - x).min(8);
                for px in 0..in_group {
                    let value = pixels.get(pos).copied().unwrap_or(0);
                    pos += 1;
                    for (plane, byte) in plane_bytes.iter_mut().enumerate().take(planes) {
                        *byte |= (((value >> plane) & 1) as u8) << (7 - px);
                    }
                }

                for (plane, byte) in plane_bytes.iter().enumerate().take(planes) {
                    write_byte(bits, offset + self.plane_byte(format, stride, row, group, plane), *byte);
                }

                x += in_group;
                group += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expansion_table() {
        assert_eq!(1, PLANE_EXPANSION[0][0b1000_0000][0]);
        assert_eq!(0, PLANE_EXPANSION[0][0b1000_0000][1]);
        assert_eq!(4, PLANE_EXPANSION[2][0b0000_0001][7]);
    }

    #[test]
    fn test_pair_interleaved_positions() {
        let codec = PlanarCodec::new("PL4P", "", 4, PlaneLayout::PairInterleaved);
        let format = codec.tile_format(8, 8).unwrap();
        assert_eq!(0, codec.plane_byte(&format, 0, 0, 0, 0));
        assert_eq!(1, codec.plane_byte(&format, 0, 0, 0, 1));
        assert_eq!(16, codec.plane_byte(&format, 0, 0, 0, 2));
        assert_eq!(17 + 14, codec.plane_byte(&format, 0, 7, 0, 3));
    }

    #[test]
    fn test_sequential_positions() {
        let codec = PlanarCodec::new("PL2S", "", 2, PlaneLayout::Sequential);
        let format = codec.tile_format(8, 8).unwrap();
        assert_eq!(3, codec.plane_byte(&format, 0, 3, 0, 0));
        assert_eq!(11, codec.plane_byte(&format, 0, 3, 0, 1));
    }
}
