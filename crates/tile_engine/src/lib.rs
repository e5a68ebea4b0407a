#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::too_many_lines,
    clippy::cast_lossless,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::return_self_not_must_use,
    clippy::many_single_char_names
)]
//! Packed retro tile graphics engine
//!
//! Converts raw console graphics dumps into an editable pixel raster and back: bit exact
//! tile codecs, historical tile addressing layouts and platform swizzle patterns.

mod error;
pub use error::*;

mod tile_format;
pub use tile_format::*;

pub mod codecs;
pub use codecs::{TileCodec, builtin_codecs, codec_by_id};

mod addressing;
pub use addressing::*;

pub mod swizzle;
pub use swizzle::{CustomSwizzle, SwizzleMap, SwizzlePattern, morton_encode};

mod palette;
pub use palette::*;

mod surface;
pub use surface::*;

mod settings;
pub use settings::*;
