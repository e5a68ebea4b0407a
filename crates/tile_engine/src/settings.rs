//! Persisted view configuration
//!
//! Everything needed to reopen a buffer with the same view:
//! - codec and tile size
//! - grid size and base offset
//! - palette selection
//! - addressing mode and swizzle pattern

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{AddressingMode, EngineError, Result, SwizzlePattern, surface::DEFAULT_TILE_SIZE};

/// Newest settings version this crate writes.
pub const SETTINGS_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Version for future compatibility
    #[serde(default = "default_version")]
    pub version: u32,

    /// Codec id, see [`crate::builtin_codecs`]
    #[serde(default = "default_codec")]
    pub codec: String,

    #[serde(default = "default_tile_size")]
    pub tile_width: usize,

    #[serde(default = "default_tile_size")]
    pub tile_height: usize,

    #[serde(default = "default_grid_size")]
    pub cols: usize,

    #[serde(default = "default_grid_size")]
    pub rows: usize,

    #[serde(default)]
    pub base_offset: usize,

    /// Sub-palette selection for indexed codecs
    #[serde(default)]
    pub palette_index: usize,

    // tables last: toml can't put plain values after them
    #[serde(default)]
    pub addressing: AddressingMode,

    #[serde(default)]
    pub swizzle: SwizzlePattern,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}
fn default_codec() -> String {
    "PL2".to_string()
}
fn default_tile_size() -> usize {
    DEFAULT_TILE_SIZE
}
fn default_grid_size() -> usize {
    16
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            codec: default_codec(),
            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
            cols: default_grid_size(),
            rows: default_grid_size(),
            base_offset: 0,
            palette_index: 0,
            addressing: AddressingMode::default(),
            swizzle: SwizzlePattern::None,
        }
    }
}

impl ViewSettings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: ViewSettings = toml::from_str(text)?;
        if settings.version > SETTINGS_VERSION {
            return Err(EngineError::UnsupportedSettingsVersion { version: settings.version });
        }
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}
