//! Shared test helpers

#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc};

use tile_engine::{IndexedPalette, TileGridSurface, codec_by_id};

pub const BLACK: u32 = 0xFF00_0000;
pub const WHITE: u32 = 0xFFFF_FFFF;

/// Deterministic pseudo random bytes.
pub fn pattern_bytes(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}

/// Palette with `count` distinct opaque colors.
pub fn distinct_palette(count: usize) -> Arc<IndexedPalette> {
    Arc::new(IndexedPalette::new(
        (0..count as u32).map(|i| 0xFF00_0000 | i.wrapping_mul(0x0001_0307) & 0x00FF_FFFF).collect(),
    ))
}

pub fn surface(codec: &str, cols: usize, rows: usize, buffer: Vec<u8>) -> TileGridSurface {
    let codec = codec_by_id(codec).unwrap();
    TileGridSurface::new(codec, cols, rows, buffer).unwrap()
}

/// Routes engine log output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fresh path in the temp dir, unique per test name and process.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tile_engine_{}_{name}", std::process::id()))
}
