//! Direct color codecs
//!
//! Pixels are stored as 16, 24 or 32 bit words and decode to `0xAARRGGBB`. Channels narrower
//! than 8 bits are widened by bit replication, so re-encoding a decoded tile gives back the
//! same masked bits.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::{
    TileFormat,
    codecs::{TileCodec, read_byte, write_byte},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// Bit masks of the color channels inside one stored pixel word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelMasks {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    /// 0 when the format has no alpha channel; such pixels decode opaque.
    pub alpha: u32,
}

impl ChannelMasks {
    pub const BGR555: ChannelMasks = ChannelMasks {
        red: 0x001F,
        green: 0x03E0,
        blue: 0x7C00,
        alpha: 0,
    };

    pub const RGB565: ChannelMasks = ChannelMasks {
        red: 0xF800,
        green: 0x07E0,
        blue: 0x001F,
        alpha: 0,
    };

    pub const RGB888: ChannelMasks = ChannelMasks {
        red: 0x00FF_0000,
        green: 0x0000_FF00,
        blue: 0x0000_00FF,
        alpha: 0,
    };

    pub const ARGB8888: ChannelMasks = ChannelMasks {
        red: 0x00FF_0000,
        green: 0x0000_FF00,
        blue: 0x0000_00FF,
        alpha: 0xFF00_0000,
    };
}

fn expand_to_8(value: u32, bits: u32) -> u32 {
    if bits == 0 {
        return 0;
    }
    if bits >= 8 {
        return value >> (bits - 8);
    }
    let mut result = 0;
    let mut filled = 0;
    while filled < 8 {
        result = (result << bits) | value;
        filled += bits;
    }
    result >> (filled - 8)
}

fn extract(raw: u32, mask: u32) -> u32 {
    if mask == 0 {
        return 0;
    }
    expand_to_8((raw & mask) >> mask.trailing_zeros(), mask.count_ones())
}

fn insert(channel: u32, mask: u32) -> u32 {
    if mask == 0 {
        return 0;
    }
    let bits = mask.count_ones();
    let value = if bits >= 8 { channel << (bits - 8) } else { channel >> (8 - bits) };
    (value << mask.trailing_zeros()) & mask
}

pub struct DirectColorCodec {
    id: String,
    description: String,
    bits_per_pixel: u8,
    masks: ChannelMasks,
    endian: Endian,
}

impl DirectColorCodec {
    /// `bits_per_pixel` is the storage size of one pixel: 16, 24 or 32.
    pub fn new(id: impl Into<String>, description: impl Into<String>, bits_per_pixel: u8, masks: ChannelMasks, endian: Endian) -> Self {
        let bits_per_pixel = match bits_per_pixel {
            0..=16 => 16,
            17..=24 => 24,
            _ => 32,
        };
        Self {
            id: id.into(),
            description: description.into(),
            bits_per_pixel,
            masks,
            endian,
        }
    }

    pub fn masks(&self) -> ChannelMasks {
        self.masks
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    fn bytes_per_pixel(&self) -> usize {
        self.bits_per_pixel as usize / 8
    }

    fn read_word(&self, bits: &[u8], pos: usize) -> u32 {
        let n = self.bytes_per_pixel();
        let mut word = [0u8; 4];
        for (i, b) in word.iter_mut().enumerate().take(n) {
            *b = read_byte(bits, pos + i);
        }
        match self.endian {
            Endian::Little => LittleEndian::read_uint(&word[..n], n) as u32,
            Endian::Big => BigEndian::read_uint(&word[..n], n) as u32,
        }
    }

    fn write_word(&self, bits: &mut [u8], pos: usize, value: u32) {
        let n = self.bytes_per_pixel();
        let mut word = [0u8; 4];
        match self.endian {
            Endian::Little => LittleEndian::write_uint(&mut word[..n], value as u64, n),
            Endian::Big => BigEndian::write_uint(&mut word[..n], value as u64, n),
        }
        for (i, b) in word.iter().enumerate().take(n) {
            write_byte(bits, pos + i, *b);
        }
    }

    /// Converts a stored pixel word to `0xAARRGGBB`.
    pub fn word_to_argb(&self, raw: u32) -> u32 {
        let alpha = if self.masks.alpha == 0 { 0xFF } else { extract(raw, self.masks.alpha) };
        alpha << 24 | extract(raw, self.masks.red) << 16 | extract(raw, self.masks.green) << 8 | extract(raw, self.masks.blue)
    }

    /// Converts `0xAARRGGBB` to a stored pixel word, dropping the bits the format can't hold.
    pub fn argb_to_word(&self, argb: u32) -> u32 {
        insert(argb >> 24 & 0xFF, self.masks.alpha)
            | insert(argb >> 16 & 0xFF, self.masks.red)
            | insert(argb >> 8 & 0xFF, self.masks.green)
            | insert(argb & 0xFF, self.masks.blue)
    }
}

impl TileCodec for DirectColorCodec {
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
        let bpp = self.bytes_per_pixel();
        let pitch = format.row_pitch(stride);
        let width = format.width();

        for row in 0..format.height() {
            let row_start = offset + row * pitch;
            for x in 0..width {
                if let Some(p) = pixels.get_mut(row * width + x) {
                    *p = self.word_to_argb(self.read_word(bits, row_start + x * bpp));
                }
            }
        }
    }

    fn encode(&self, format: &TileFormat, pixels: &[u32], bits: &mut [u8], offset: usize, stride: usize) {
        let bpp = self.bytes_per_pixel();
        let pitch = format.row_pitch(stride);
        let width = format.width();

        for row in 0..format.height() {
            let row_start = offset + row * pitch;
            for x in 0..width {
                let argb = pixels.get(row * width + x).copied().unwrap_or(0);
                self.write_word(bits, row_start + x * bpp, self.argb_to_word(argb));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_to_8() {
        assert_eq!(0xFF, expand_to_8(0x1F, 5));
        assert_eq!(0x00, expand_to_8(0, 5));
        assert_eq!(0b1000_0100, expand_to_8(0b10000, 5));
        assert_eq!(0xFF, expand_to_8(0x3F, 6));
        assert_eq!(0xAB, expand_to_8(0xAB, 8));
    }

    #[test]
    fn test_bgr555_channels() {
        let codec = DirectColorCodec::new("DC15", "", 16, ChannelMasks::BGR555, Endian::Little);
        assert_eq!(0xFFFF_0000, codec.word_to_argb(0x001F));
        assert_eq!(0xFF00_00FF, codec.word_to_argb(0x7C00));
        assert_eq!(0x7C00, codec.argb_to_word(0xFF00_00FF));
    }

    #[test]
    fn test_24bit_big_endian_word() {
        let codec = DirectColorCodec::new("DC24", "", 24, ChannelMasks::RGB888, Endian::Big);
        let format = codec.tile_format(1, 1).unwrap();
        assert_eq!(vec![0xFF12_3456], codec.decode(&format, &[0x12, 0x34, 0x56], 0, 0));
    }
}
