use pretty_assertions::assert_eq;
use tile_engine::{AddressingMode, CustomSwizzle, EngineError, SETTINGS_VERSION, SwizzlePattern, TileGridSurface, ViewSettings};

mod common;
use common::temp_path;

fn sample_settings() -> ViewSettings {
    ViewSettings {
        codec: "LN4R".to_string(),
        tile_width: 16,
        tile_height: 8,
        cols: 12,
        rows: 10,
        base_offset: 0x4000,
        palette_index: 3,
        addressing: AddressingMode::block_grouped(2, 2).with_row_interleave(true),
        swizzle: SwizzlePattern::Custom(CustomSwizzle {
            block_width: 8,
            block_height: 4,
            morton: true,
        }),
        ..Default::default()
    }
}

#[test]
fn test_toml_round_trip() {
    let settings = sample_settings();
    let text = settings.to_toml_string().unwrap();
    assert_eq!(settings, ViewSettings::from_toml_str(&text).unwrap());
}

#[test]
fn test_unit_swizzle_round_trip() {
    let settings = ViewSettings {
        swizzle: SwizzlePattern::GroupedBlockLinear,
        ..Default::default()
    };
    let text = settings.to_toml_string().unwrap();
    assert_eq!(settings, ViewSettings::from_toml_str(&text).unwrap());
}

#[test]
fn test_missing_fields_use_defaults() {
    let settings = ViewSettings::from_toml_str("codec = \"PL4\"\ncols = 4\n").unwrap();
    assert_eq!("PL4", settings.codec);
    assert_eq!(4, settings.cols);
    assert_eq!(16, settings.rows);
    assert_eq!(8, settings.tile_width);
    assert_eq!(SETTINGS_VERSION, settings.version);
    assert_eq!(AddressingMode::contiguous(), settings.addressing);
    assert_eq!(SwizzlePattern::None, settings.swizzle);
}

#[test]
fn test_newer_version_is_rejected() {
    let result = ViewSettings::from_toml_str("version = 99\n");
    assert!(matches!(result, Err(EngineError::UnsupportedSettingsVersion { version: 99 })));
}

#[test]
fn test_garbage_is_a_parse_error() {
    assert!(matches!(ViewSettings::from_toml_str("cols = [1, 2"), Err(EngineError::TomlDe(_))));
}

#[test]
fn test_save_and_load() {
    let path = temp_path("view_settings.toml");
    let settings = sample_settings();
    settings.save(&path).unwrap();
    assert_eq!(settings, ViewSettings::load(&path).unwrap());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_out_of_range_palette_index_is_rejected() {
    let settings = ViewSettings::from_toml_str("codec = \"PL4\"\npalette_index = 9223372036854775807\n").unwrap();
    let result = TileGridSurface::from_settings(&settings, vec![0u8; 64]);
    assert!(matches!(result, Err(EngineError::InvalidPaletteIndex { color_count: 16, .. })));
}

#[test]
fn test_oversized_grid_is_rejected() {
    let settings = ViewSettings::from_toml_str("codec = \"PL2\"\ncols = 9223372036854775807\nrows = 4\n").unwrap();
    let result = TileGridSurface::from_settings(&settings, vec![0u8; 64]);
    assert!(matches!(result, Err(EngineError::InvalidGridSize { .. })));
}
