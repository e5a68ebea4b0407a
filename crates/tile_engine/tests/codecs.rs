use pretty_assertions::assert_eq;
use tile_engine::{
    TileCodec, builtin_codecs, codec_by_id,
    codecs::{ChannelMasks, DirectColorCodec, Endian, PlanarCodec, PlaneLayout},
};

mod common;
use common::pattern_bytes;

/// Bytes the codec can represent: DC15 leaves bit 15 of every word unused.
fn representable_bytes(codec: &dyn TileCodec, len: usize, seed: u32) -> Vec<u8> {
    let mut bytes = pattern_bytes(len, seed);
    if codec.id() == "DC15" {
        for word in bytes.chunks_mut(2) {
            if let Some(high) = word.get_mut(1) {
                *high &= 0x7F;
            }
        }
    }
    bytes
}

#[test]
fn test_builtin_ids_are_unique() {
    let codecs = builtin_codecs();
    for (i, a) in codecs.iter().enumerate() {
        for b in codecs.iter().skip(i + 1) {
            assert_ne!(a.id(), b.id());
        }
    }
}

#[test]
fn test_codec_lookup() {
    assert_eq!(4, codec_by_id("pl4p").unwrap().bits_per_pixel());
    assert!(codec_by_id("XYZ").is_err());
}

#[test]
fn test_bytes_round_trip_all_codecs() {
    for codec in builtin_codecs() {
        for (width, height) in [(8, 8), (16, 8), (8, 16)] {
            let format = codec.tile_format(width, height).unwrap();
            let bytes = representable_bytes(codec.as_ref(), format.tile_size(), width as u32);
            let pixels = codec.decode(&format, &bytes, 0, 0);
            let mut encoded = vec![0u8; format.tile_size()];
            codec.encode(&format, &pixels, &mut encoded, 0, 0);
            assert_eq!(bytes, encoded, "codec {} {width}x{height}", codec.id());
        }
    }
}

#[test]
fn test_pixels_round_trip_indexed_codecs() {
    for codec in builtin_codecs().into_iter().filter(|c| c.bits_per_pixel() <= 8) {
        let format = codec.tile_format(8, 8).unwrap();
        let mask = format.value_mask();
        let pixels: Vec<u32> = (0..64u32).map(|i| i.wrapping_mul(37) & mask).collect();
        let mut bytes = vec![0u8; format.tile_size()];
        codec.encode(&format, &pixels, &mut bytes, 0, 0);
        assert_eq!(pixels, codec.decode(&format, &bytes, 0, 0), "codec {}", codec.id());
    }
}

#[test]
fn test_direct_color_pixels_round_trip() {
    for id in ["DC15", "DC16", "DC24", "DC32"] {
        let codec = codec_by_id(id).unwrap();
        let format = codec.tile_format(4, 4).unwrap();
        // decoded colors are exactly representable
        let bytes = representable_bytes(codec.as_ref(), format.tile_size(), 7);
        let colors = codec.decode(&format, &bytes, 0, 0);
        let mut encoded = vec![0u8; format.tile_size()];
        codec.encode(&format, &colors, &mut encoded, 0, 0);
        assert_eq!(colors, codec.decode(&format, &encoded, 0, 0), "codec {id}");
    }
}

#[test]
fn test_one_bit_planar_scenario() {
    let codec = codec_by_id("PL1").unwrap();
    let format = codec.tile_format(8, 8).unwrap();
    let mut bytes = vec![0u8; 64];

    let mut pixels = codec.decode(&format, &bytes, 0, 0);
    assert_eq!(vec![0u32; 64], pixels);

    pixels[0] = 1;
    codec.encode(&format, &pixels, &mut bytes, 0, 0);
    assert_eq!(0b1000_0000, bytes[0]);
    assert!(bytes[1..].iter().all(|b| *b == 0));
}

#[test]
fn test_game_boy_2bpp_row() {
    let codec = codec_by_id("PL2").unwrap();
    let format = codec.tile_format(8, 1).unwrap();
    // low plane first, then high plane
    let pixels = codec.decode(&format, &[0b1010_0000, 0b1100_0000], 0, 0);
    assert_eq!(vec![3, 2, 1, 0, 0, 0, 0, 0], pixels);
}

#[test]
fn test_nes_planes_are_sequential() {
    let codec = codec_by_id("PL2S").unwrap();
    let format = codec.tile_format(8, 8).unwrap();
    let mut bytes = vec![0u8; 16];
    bytes[8] = 0b1000_0000;
    let pixels = codec.decode(&format, &bytes, 0, 0);
    assert_eq!(2, pixels[0]);
    assert!(pixels[1..].iter().all(|p| *p == 0));
}

#[test]
fn test_partial_group_width() {
    let codec = PlanarCodec::new("T", "12 wide", 2, PlaneLayout::RowInterleaved);
    let format = codec.tile_format(12, 2).unwrap();
    assert_eq!(4, format.bytes_per_row());

    let pixels: Vec<u32> = (0..24u32).map(|i| i % 4).collect();
    let mut bytes = vec![0xFFu8; format.tile_size()];
    codec.encode(&format, &pixels, &mut bytes, 0, 0);
    assert_eq!(pixels, codec.decode(&format, &bytes, 0, 0));
    // unused low bits of the last group are cleared
    assert_eq!(0, bytes[2] & 0x0F);
    assert_eq!(0, bytes[3] & 0x0F);
}

#[test]
fn test_packed_tail_is_zero_padded() {
    let codec = codec_by_id("LN98").unwrap();
    let format = codec.tile_format(4, 1).unwrap();
    assert_eq!(3, format.tile_size());
    let mut bytes = vec![0xFFu8; 3];
    codec.encode(&format, &[7, 7, 7, 7], &mut bytes, 0, 0);
    assert_eq!(vec![0xFF, 0xF0, 0x00], bytes);
    assert_eq!(vec![7, 7, 7, 7], codec.decode(&format, &bytes, 0, 0));
}

#[test]
fn test_reads_past_end_are_zero() {
    let codec = codec_by_id("LN8").unwrap();
    let format = codec.tile_format(4, 2).unwrap();
    let pixels = codec.decode(&format, &[1, 2, 3, 4, 5], 0, 0);
    assert_eq!(vec![1, 2, 3, 4, 5, 0, 0, 0], pixels);

    let mut short = vec![0u8; 3];
    codec.encode(&format, &[9; 8], &mut short, 0, 0);
    assert_eq!(vec![9, 9, 9], short);
}

#[test]
fn test_row_stride_skips_other_tiles() {
    let codec = codec_by_id("LN8").unwrap();
    let format = codec.tile_format(2, 2).unwrap();
    // two tiles with interleaved rows: a0 a0 b0 b0 a1 a1 b1 b1
    let bytes = [1, 2, 10, 20, 3, 4, 30, 40];
    assert_eq!(vec![1, 2, 3, 4], codec.decode(&format, &bytes, 0, 1));
    assert_eq!(vec![10, 20, 30, 40], codec.decode(&format, &bytes, 2, 1));
}

#[test]
fn test_direct_color_byte_order() {
    let le = DirectColorCodec::new("LE", "", 16, ChannelMasks::RGB565, Endian::Little);
    let be = DirectColorCodec::new("BE", "", 16, ChannelMasks::RGB565, Endian::Big);
    let format = le.tile_format(1, 1).unwrap();
    assert_eq!(vec![0xFFFF_0000], le.decode(&format, &[0x00, 0xF8], 0, 0));
    assert_eq!(vec![0xFFFF_0000], be.decode(&format, &[0xF8, 0x00], 0, 0));
}

#[test]
fn test_argb_keeps_alpha() {
    let codec = codec_by_id("DC32").unwrap();
    let format = codec.tile_format(1, 1).unwrap();
    let mut bytes = vec![0u8; 4];
    codec.encode(&format, &[0x8012_3456], &mut bytes, 0, 0);
    assert_eq!(vec![0x56, 0x34, 0x12, 0x80], bytes);
}
