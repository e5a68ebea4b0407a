//! Linear (chunky) codecs for depths that divide a byte.

use crate::{
    TileFormat,
    codecs::{TileCodec, read_byte, write_byte},
};

/// Position of the first pixel inside a byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelOrder {
    /// First pixel in the high bits (Genesis, most PC formats).
    MsbFirst,
    /// First pixel in the low bits (GBA, NDS).
    LsbFirst,
}

pub struct LinearCodec {
    id: String,
    description: String,
    bits_per_pixel: u8,
    order: PixelOrder,
}

impl LinearCodec {
    /// `bits_per_pixel` is rounded up to 1, 2, 4 or 8.
    pub fn new(id: impl Into<String>, description: impl Into<String>, bits_per_pixel: u8, order: PixelOrder) -> Self {
        let bits_per_pixel = match bits_per_pixel {
            0 | 1 => 1,
            2 => 2,
            3 | 4 => 4,
            _ => 8,
        };
        Self {
            id: id.into(),
            description: description.into(),
            bits_per_pixel,
            order,
        }
    }

    pub fn order(&self) -> PixelOrder {
        self.order
    }

    fn shift(&self, slot: usize) -> usize {
        let bpp = self.bits_per_pixel as usize;
        match self.order {
            PixelOrder::MsbFirst => 8 - bpp * (slot + 1),
            PixelOrder::LsbFirst => bpp * slot,
        }
    }
}

impl TileCodec for LinearCodec {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn bits_per_pixel(&self) -> u8 {
        self.bits_per_pixel
    }

    fn decode_into(&self, format: &TileFormat, bits: &[u8], offset: usize, stride: usize, pixels: &mut [u32]) {
        let per_byte = 8 / self.bits_per_pixel as usize;
        let mask = format.value_mask();
        let pitch = format.row_pitch(stride);
        let width = format.width();

        for row in 0..format.height() {
            let row_start = offset + row * pitch;
            for x in 0..width {
                let byte = read_byte(bits, row_start + x / per_byte) as u32;
                if let Some(p) = pixels.get_mut(row * width + x) {
                    *p = (byte >> self.shift(x % per_byte)) & mask;
                }
            }
        }
    }

    fn encode(&self, format: &TileFormat, pixels: &[u32], bits: &mut [u8], offset: usize, stride: usize) {
        let per_byte = 8 / self.bits_per_pixel as usize;
        let mask = format.value_mask();
        let pitch = format.row_pitch(stride);
        let width = format.width();

        for row in 0..format.height() {
            let row_start = offset + row * pitch;
            for byte_index in 0..format.bytes_per_row() {
                let mut byte = 0u32;
                for slot in 0..per_byte {
                    let x = byte_index * per_byte + slot;
                    if x >= width {
                        break;
                    }
                    let value = pixels.get(row * width + x).copied().unwrap_or(0) & mask;
                    byte |= value << self.shift(slot);
                }
                write_byte(bits, row_start + byte_index, byte as u8);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibble_order() {
        let msb = LinearCodec::new("LN4", "", 4, PixelOrder::MsbFirst);
        let lsb = LinearCodec::new("LN4R", "", 4, PixelOrder::LsbFirst);
        let format = msb.tile_format(2, 1).unwrap();
        assert_eq!(vec![1, 2], msb.decode(&format, &[0x12], 0, 0));
        assert_eq!(vec![2, 1], lsb.decode(&format, &[0x12], 0, 0));
    }

    #[test]
    fn test_depth_is_rounded() {
        assert_eq!(4, LinearCodec::new("X", "", 3, PixelOrder::MsbFirst).bits_per_pixel());
        assert_eq!(8, LinearCodec::new("X", "", 7, PixelOrder::MsbFirst).bits_per_pixel());
    }
}
