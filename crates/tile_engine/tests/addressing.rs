use pretty_assertions::assert_eq;
use tile_engine::{AddressingMode, TileAddressCalculator, TileFormat};

/// 1bpp 8×8: eight bytes per tile, one byte per row.
fn format_8() -> TileFormat {
    TileFormat::new(1, 8, 8).unwrap()
}

fn offsets(calc: &TileAddressCalculator, cols: usize, rows: usize) -> Vec<Vec<usize>> {
    (0..rows).map(|row| (0..cols).map(|col| calc.relative_offset(col, row)).collect()).collect()
}

#[test]
fn test_contiguous_offsets() {
    let calc = TileAddressCalculator::new(format_8(), AddressingMode::contiguous(), 10, 6, 0).unwrap();
    for row in 0..6 {
        for col in 0..10 {
            assert_eq!(Some(row * 80 + col * 8), calc.address(col, row, 480));
        }
    }
}

#[test]
fn test_contiguous_base_offset() {
    let calc = TileAddressCalculator::new(format_8(), AddressingMode::contiguous(), 4, 2, 3).unwrap();
    assert_eq!(Some(3), calc.address(0, 0, 64));
    assert_eq!(Some(3 + 32 + 16), calc.address(2, 1, 64));
    // the last tile would end at 67
    assert_eq!(None, calc.address(3, 1, 64));
}

#[test]
fn test_block_grouped_raster() {
    let mode = AddressingMode::block_grouped(2, 2);
    let calc = TileAddressCalculator::new(format_8(), mode, 4, 4, 0).unwrap();
    assert_eq!(
        vec![vec![0, 8, 32, 40], vec![16, 24, 48, 56], vec![64, 72, 96, 104], vec![80, 88, 112, 120]],
        offsets(&calc, 4, 4)
    );
}

#[test]
fn test_row_interleaved_offsets() {
    let mode = AddressingMode::block_grouped(2, 2).with_row_interleave(true);
    let calc = TileAddressCalculator::new(format_8(), mode, 4, 4, 0).unwrap();
    assert_eq!(
        vec![vec![0, 16, 32, 48], vec![8, 24, 40, 56], vec![64, 80, 96, 112], vec![72, 88, 104, 120]],
        offsets(&calc, 4, 4)
    );
    assert_eq!(Some(24), calc.address(1, 1, 128));
}

#[test]
fn test_row_interleaved_tall_block() {
    let mode = AddressingMode::block_grouped(2, 4).with_row_interleave(true);
    let calc = TileAddressCalculator::new(format_8(), mode, 2, 4, 0).unwrap();
    assert_eq!(vec![vec![0, 16], vec![8, 24], vec![32, 48], vec![40, 56]], offsets(&calc, 2, 4));
}

#[test]
fn test_packed_2d_row_interleaved() {
    let mode = AddressingMode::block_grouped(2, 2).with_row_interleave(true).with_packed_2d(true);
    let calc = TileAddressCalculator::new(format_8(), mode, 2, 2, 0).unwrap();
    assert_eq!(1, calc.stride());
    assert_eq!(vec![vec![0, 16], vec![1, 17]], offsets(&calc, 2, 2));
    // tile (1, 1) touches bytes 17..=31
    assert_eq!(Some(17), calc.address(1, 1, 32));
    assert_eq!(None, calc.address(1, 1, 31));
}

#[test]
fn test_increments() {
    let calc = TileAddressCalculator::new(format_8(), AddressingMode::contiguous(), 4, 3, 0).unwrap();
    assert_eq!(8, calc.tile_increment());
    assert_eq!(32, calc.row_increment());
    assert_eq!(96, calc.page_increment());
}

#[test]
fn test_invalid_configuration() {
    assert!(TileAddressCalculator::new(format_8(), AddressingMode::block_grouped(2, 0), 4, 4, 0).is_err());
    assert!(TileAddressCalculator::new(format_8(), AddressingMode::contiguous(), 0, 4, 0).is_err());
}

#[test]
fn test_empty_buffer_has_no_tiles() {
    let calc = TileAddressCalculator::new(format_8(), AddressingMode::contiguous(), 1, 1, 0).unwrap();
    assert_eq!(None, calc.address(0, 0, 0));
    assert_eq!(None, calc.address(0, 0, 7));
    assert_eq!(Some(0), calc.address(0, 0, 8));
}
