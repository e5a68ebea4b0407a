//! Unified error types for tile_engine

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tile_engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Buffer transfer for '{path}' failed: {message}")]
    TransferFailed { path: PathBuf, message: String },

    #[error("Byte buffer is owned by a running load/save transfer")]
    BufferInFlight,

    #[error("No load/save transfer is in flight")]
    NoTransferInFlight,

    // === Format Errors ===
    #[error("Invalid tile dimensions {width}x{height}")]
    InvalidTileDimensions { width: usize, height: usize },

    #[error("Unsupported bit depth: {bits_per_pixel} bits per pixel")]
    UnsupportedBitDepth { bits_per_pixel: u8 },

    #[error("Unknown codec: {id}")]
    UnknownCodec { id: String },

    #[error("Invalid grid size {cols}x{rows}")]
    InvalidGridSize { cols: usize, rows: usize },

    #[error("Palette index {palette_index} is out of range for {color_count} color sub-palettes")]
    InvalidPaletteIndex { palette_index: usize, color_count: usize },

    // === Addressing Errors ===
    #[error("Invalid block dimensions {block_width}x{block_height} (in tiles)")]
    InvalidBlockDimensions { block_width: usize, block_height: usize },

    #[error("Codec '{codec}' does not support {addressing} addressing")]
    UnsupportedAddressing { codec: String, addressing: String },

    // === Swizzle Errors ===
    #[error("Invalid swizzle parameters: {message}")]
    InvalidSwizzleParameters { message: String },

    #[error("Swizzle pattern {pattern} is not aligned to {tile_width}x{tile_height} tiles")]
    MisalignedSwizzle { pattern: String, tile_width: usize, tile_height: usize },

    // === Settings Errors ===
    #[error("Settings parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Settings write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Unsupported settings version: {version}")]
    UnsupportedSettingsVersion { version: u32 },

    #[error("{0}")]
    Generic(String),
}

/// Result type alias for tile_engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

// === Convenience constructors ===
impl EngineError {
    /// Create a generic error from any displayable type
    pub fn generic(msg: impl std::fmt::Display) -> Self {
        Self::Generic(msg.to_string())
    }

    pub fn invalid_swizzle(msg: impl Into<String>) -> Self {
        Self::InvalidSwizzleParameters { message: msg.into() }
    }

    pub fn transfer_failed(path: impl Into<PathBuf>, msg: impl std::fmt::Display) -> Self {
        Self::TransferFailed {
            path: path.into(),
            message: msg.to_string(),
        }
    }
}
