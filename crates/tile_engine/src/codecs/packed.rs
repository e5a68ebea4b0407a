//! Group-packed codecs for depths that don't divide a byte (3bpp, 6bpp).
//!
//! Eight pixels form a `bits_per_pixel` byte group, read as one big-endian bit stream with
//! the first pixel in the most significant bits.

use crate::{
    TileFormat,
    codecs::{TileCodec, read_byte, write_byte},
};

/// Byte order of a pixel group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupByteOrder {
    Forward,
    /// The group's bytes are stored last byte first.
    Reversed,
}

pub struct PackedCodec {
    id: String,
    description: String,
    bits_per_pixel: u8,
    order: GroupByteOrder,
}

impl PackedCodec {
    pub fn new(id: impl Into<String>, description: impl Into<String>, bits_per_pixel: u8, order: GroupByteOrder) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            bits_per_pixel: bits_per_pixel.clamp(1, 8),
            order,
        }
    }

    pub fn order(&self) -> GroupByteOrder {
        self.order
    }

    fn byte_in_group(&self, i: usize) -> usize {
        match self.order {
            GroupByteOrder::Forward => i,
            GroupByteOrder::Reversed => self.bits_per_pixel as usize - 1 - i,
        }
    }
}

impl TileCodec for PackedCodec {
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

    fn decode_into(&self, format: &TileFormat, bits: &[u8], offset: usize, stride: usize, pixels: &mut [u32]) {
        let bpp = self.bits_per_pixel as usize;
        let mask = format.value_mask() as u64;
        let pitch = format.row_pitch(stride);
        let width = format.width();

        for row in 0..format.height() {
            let row_start = offset + row * pitch;
            for group in 0..width.div_ceil(8) {
                let group_start = row_start + group * bpp;
                let mut stream = 0u64;
                for i in 0..bpp {
                    stream = (stream << 8) | read_byte(bits, group_start + self.byte_in_group(i)) as u64;
                }

                for slot in 0..8 {
                    let x = group * 8 + slot;
                    if x >= width {
                        break;
                    }
                    let shift = bpp * (7 - slot);
                    if let Some(p) = pixels.get_mut(row * width + x) {
                        *p = ((stream >> shift) & mask) as u32;
                    }
                }
            }
        }
    }

    fn encode(&self, format: &TileFormat, pixels: &[u32], bits: &mut [u8], offset: usize, stride: usize) {
        let bpp = self.bits_per_pixel as usize;
        let mask = format.value_mask() as u64;
        let pitch = format.row_pitch(stride);
        let width = format.width();

        for row in 0..format.height() {
            let row_start = offset + row * pitch;
            for group in 0..width.div_ceil(8) {
                let mut stream = 0u64;
                for slot in 0..8 {
                    let x = group * 8 + slot;
                    if x >= width {
                        break;
                    }
                    let value = pixels.get(row * width + x).copied().unwrap_or(0) as u64 & mask;
                    stream |= value << (bpp * (7 - slot));
                }

                let group_start = row_start + group * bpp;
                for i in 0..bpp {
                    let byte = (stream >> (8 * (bpp - 1 - i))) as u8;
                    write_byte(bits, group_start + self.byte_in_group(i), byte);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_3bpp_group() {
        let codec = PackedCodec::new("LN98", "", 3, GroupByteOrder::Forward);
        let format = codec.tile_format(8, 1).unwrap();
        assert_eq!(3, format.tile_size());
        // 0 1 2 3 4 5 6 7 as 3 bit values: 000 001 010 011 100 101 110 111
        let bits = [0b0000_0101, 0b0011_1001, 0b0111_0111];
        assert_eq!(vec![0, 1, 2, 3, 4, 5, 6, 7], codec.decode(&format, &bits, 0, 0));
    }

    #[test]
    fn test_6bpp_reversed_bytes() {
        let codec = PackedCodec::new("LN99", "", 6, GroupByteOrder::Reversed);
        let format = codec.tile_format(8, 1).unwrap();
        let mut bits = [0u8; 6];
        codec.encode(&format, &[0x3F, 0, 0, 0, 0, 0, 0, 0], &mut bits, 0, 0);
        assert_eq!([0, 0, 0, 0, 0, 0b1111_1100], bits);
    }
}
