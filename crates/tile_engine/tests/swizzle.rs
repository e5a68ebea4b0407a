use tile_engine::{CustomSwizzle, EngineError, SwizzleMap, SwizzlePattern, morton_encode};

fn custom(block_width: usize, block_height: usize, morton: bool) -> SwizzlePattern {
    SwizzlePattern::Custom(CustomSwizzle {
        block_width,
        block_height,
        morton,
    })
}

#[test]
fn test_reverse_inverts_apply() {
    let cases = [
        (SwizzlePattern::None, 8, 8),
        (SwizzlePattern::BlockCompressed, 8, 8),
        (SwizzlePattern::Morton, 16, 16),
        (SwizzlePattern::NestedBlockMorton, 16, 16),
        (SwizzlePattern::GroupedBlockLinear, 32, 8),
        (SwizzlePattern::PairedBlock, 8, 8),
        (custom(4, 4, true), 8, 8),
        (custom(3, 5, false), 6, 10),
    ];
    for (pattern, width, height) in cases {
        for y in 0..height {
            for x in 0..width {
                let index = pattern.apply(x, y, width, height);
                assert_eq!((x, y), pattern.reverse(index, width, height), "{pattern} ({x}, {y})");
            }
        }
    }
}

#[test]
fn test_reverse_falls_back_to_linear() {
    // nothing in a 4x4 area maps to 1000
    assert_eq!((0, 250), SwizzlePattern::Morton.reverse(1000, 4, 4));
}

#[test]
fn test_morton_three_five() {
    assert_eq!(0b10_0111, morton_encode(3, 5));
    assert_eq!(SwizzlePattern::Morton.apply(3, 5, 16, 16), 0b10_0111);
}

#[test]
fn test_optimal_tile_sizes() {
    assert_eq!(Some((4, 4)), SwizzlePattern::BlockCompressed.optimal_tile_size());
    assert_eq!(Some((4, 4)), SwizzlePattern::GroupedBlockLinear.optimal_tile_size());
    assert_eq!(Some((4, 4)), SwizzlePattern::PairedBlock.optimal_tile_size());
    assert_eq!(Some((8, 8)), SwizzlePattern::NestedBlockMorton.optimal_tile_size());
    assert_eq!(None, SwizzlePattern::Morton.optimal_tile_size());
    assert_eq!(None, SwizzlePattern::None.optimal_tile_size());
    assert_eq!(None, custom(4, 4, true).optimal_tile_size());
}

#[test]
fn test_custom_validation() {
    assert!(matches!(custom(0, 4, false).validate(), Err(EngineError::InvalidSwizzleParameters { .. })));
    assert!(matches!(custom(3, 4, true).validate(), Err(EngineError::InvalidSwizzleParameters { .. })));
    assert!(matches!(custom(4, 8, true).validate(), Err(EngineError::InvalidSwizzleParameters { .. })));
    assert!(custom(8, 4, true).validate().is_ok());
    assert!(custom(3, 5, false).validate().is_ok());
}

#[test]
fn test_block_compressed_map_on_4x4_tiles() {
    let map = SwizzleMap::new(SwizzlePattern::BlockCompressed, 4, 4, 3, 2).unwrap();
    for y in 0..8 {
        for x in 0..12 {
            assert_eq!((y % 4) * 4 + x % 4, map.source(x, y));
        }
    }
}

#[test]
fn test_nested_morton_map_on_8x8_tiles() {
    let map = SwizzleMap::new(SwizzlePattern::NestedBlockMorton, 8, 8, 2, 2).unwrap();
    for y in 0..16u32 {
        for x in 0..16u32 {
            assert_eq!(morton_encode(x % 8, y % 8) as usize, map.source(x as usize, y as usize));
        }
    }
}

#[test]
fn test_morton_map_on_square_canvas() {
    assert!(SwizzleMap::new(SwizzlePattern::Morton, 8, 8, 2, 2).is_ok());
}

#[test]
fn test_misaligned_pattern_is_rejected() {
    let result = SwizzleMap::new(custom(3, 3, false), 8, 8, 1, 1);
    assert!(matches!(result, Err(EngineError::MisalignedSwizzle { .. })));
}
