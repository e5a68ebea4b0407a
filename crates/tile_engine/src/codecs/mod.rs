//! Tile codecs
//!
//! A codec turns the bytes of one tile into pixel values and back. Values are palette
//! indices for depths up to 8 bits and 32-bit ARGB colors above that.
//!
//! Every codec follows the same failure policy: bytes outside the source buffer decode
//! as 0 and writes outside it are dropped. Partially truncated dumps stay editable.
//!
//! The `stride` argument counts the tile rows of neighbouring tiles stored between two
//! rows of the decoded tile. It is 0 for contiguous tiles; the distance between two rows is
//! always [`TileFormat::row_pitch`].

use std::sync::Arc;

use crate::{EngineError, Result, TileFormat};

mod direct;
mod linear;
mod packed;
mod planar;

pub use direct::{ChannelMasks, DirectColorCodec, Endian};
pub use linear::{LinearCodec, PixelOrder};
pub use packed::{GroupByteOrder, PackedCodec};
pub use planar::{PlanarCodec, PlaneLayout};

/// Encoder/decoder for one tile encoding.
pub trait TileCodec: Send + Sync {
    /// Short stable identifier, used by settings files.
    fn id(&self) -> &str;

    fn description(&self) -> &str;

    fn bits_per_pixel(&self) -> u8;

    /// Number of pixels a row is padded to.
    fn pixel_group(&self) -> usize {
        1
    }

    /// Tile geometry of this codec for the given dimensions.
    fn tile_format(&self, width: usize, height: usize) -> Result<TileFormat> {
        TileFormat::with_pixel_groups(self.bits_per_pixel(), width, height, self.pixel_group())
    }

    /// Whether tile rows may be interleaved with other tiles' rows (non-zero stride).
    fn supports_row_stride(&self) -> bool {
        true
    }

    /// Decodes one tile into `pixels` (row-major, `format.pixel_count()` entries).
    fn decode_into(&self, format: &TileFormat, bits: &[u8], offset: usize, stride: usize, pixels: &mut [u32]);

    /// Encodes one tile from `pixels`. Missing pixels encode as 0.
    fn encode(&self, format: &TileFormat, pixels: &[u32], bits: &mut [u8], offset: usize, stride: usize);

    fn decode(&self, format: &TileFormat, bits: &[u8], offset: usize, stride: usize) -> Vec<u32> {
        let mut pixels = vec![0; format.pixel_count()];
        self.decode_into(format, bits, offset, stride, &mut pixels);
        pixels
    }
}

impl std::fmt::Debug for dyn TileCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TileCodec({})", self.id())
    }
}

#[inline]
pub(crate) fn read_byte(bits: &[u8], pos: usize) -> u8 {
    bits.get(pos).copied().unwrap_or(0)
}

#[inline]
pub(crate) fn write_byte(bits: &mut [u8], pos: usize, value: u8) {
    if let Some(b) = bits.get_mut(pos) {
        *b = value;
    }
}

/// All codecs shipped with the engine, in menu order.
pub fn builtin_codecs() -> Vec<Arc<dyn TileCodec>> {
    vec![
        Arc::new(PlanarCodec::new("PL1", "1bpp planar", 1, PlaneLayout::RowInterleaved)),
        Arc::new(PlanarCodec::new("PL2", "2bpp planar, row-interleaved (Game Boy, SNES)", 2, PlaneLayout::RowInterleaved)),
        Arc::new(PlanarCodec::new("PL2S", "2bpp planar, plane-sequential (NES)", 2, PlaneLayout::Sequential)),
        Arc::new(PlanarCodec::new("PL4", "4bpp planar, row-interleaved (Master System)", 4, PlaneLayout::RowInterleaved)),
        Arc::new(PlanarCodec::new("PL4P", "4bpp planar, paired planes (SNES, PC Engine)", 4, PlaneLayout::PairInterleaved)),
        Arc::new(PlanarCodec::new("PL8P", "8bpp planar, paired planes (SNES)", 8, PlaneLayout::PairInterleaved)),
        Arc::new(LinearCodec::new("LN1", "1bpp linear", 1, PixelOrder::MsbFirst)),
        Arc::new(LinearCodec::new("LN2", "2bpp linear", 2, PixelOrder::MsbFirst)),
        Arc::new(LinearCodec::new("LN4", "4bpp linear (Genesis)", 4, PixelOrder::MsbFirst)),
        Arc::new(LinearCodec::new("LN4R", "4bpp linear, reverse-order (GBA)", 4, PixelOrder::LsbFirst)),
        Arc::new(LinearCodec::new("LN8", "8bpp linear", 8, PixelOrder::MsbFirst)),
        Arc::new(PackedCodec::new("LN98", "3bpp linear", 3, GroupByteOrder::Forward)),
        Arc::new(PackedCodec::new("LN99", "6bpp linear, reverse-order", 6, GroupByteOrder::Reversed)),
        Arc::new(DirectColorCodec::new("DC15", "15bpp BGR555 (GBA, SNES)", 16, ChannelMasks::BGR555, Endian::Little)),
        Arc::new(DirectColorCodec::new("DC16", "16bpp RGB565", 16, ChannelMasks::RGB565, Endian::Little)),
        Arc::new(DirectColorCodec::new("DC24", "24bpp RGB", 24, ChannelMasks::RGB888, Endian::Big)),
        Arc::new(DirectColorCodec::new("DC32", "32bpp ARGB", 32, ChannelMasks::ARGB8888, Endian::Little)),
    ]
}

/// Looks up a built-in codec by its id (case-insensitive).
pub fn codec_by_id(id: &str) -> Result<Arc<dyn TileCodec>> {
    builtin_codecs()
        .into_iter()
        .find(|codec| codec.id().eq_ignore_ascii_case(id))
        .ok_or_else(|| EngineError::UnknownCodec { id: id.to_string() })
}
