//! Shared test helpers

#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc};

use tile_engine::{IndexedPalette, TileGridSurface, codec_by_id};
use tile_engine_edit::TileEditState;

pub const BLACK: u32 = 0xFF00_0000;
pub const WHITE: u32 = 0xFFFF_FFFF;

pub fn gray(level: u32) -> u32 {
    0xFF00_0000 | level << 16 | level << 8 | level
}

/// 1bpp planar grid, all black, with a black/white palette.
pub fn mono_surface(cols: usize, rows: usize) -> TileGridSurface {
    let codec = codec_by_id("PL1").unwrap();
    let mut surface = TileGridSurface::new(codec, cols, rows, vec![0u8; cols * rows * 8]).unwrap();
    surface.set_palette(Arc::new(IndexedPalette::new(vec![BLACK, WHITE]))).unwrap();
    surface
}

/// 8bpp linear grid whose byte `i` holds `i`, shown through the grayscale palette.
pub fn gray_surface(cols: usize, rows: usize) -> TileGridSurface {
    let codec = codec_by_id("LN8").unwrap();
    let bytes = (0..cols * rows * 64).map(|i| i as u8).collect();
    TileGridSurface::new(codec, cols, rows, bytes).unwrap()
}

pub fn mono_state(cols: usize, rows: usize) -> TileEditState {
    TileEditState::new(mono_surface(cols, rows))
}

pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tile_engine_edit_{}_{name}", std::process::id()))
}
