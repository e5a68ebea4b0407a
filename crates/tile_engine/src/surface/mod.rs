//! The tile grid surface
//!
//! [`TileGridSurface`] owns the encoded byte buffer and the decoded ARGB raster of a
//! `cols × rows` tile grid and keeps them in sync through the active codec, addressing mode,
//! swizzle pattern and palette. The raster is derived state; [`TileGridSurface::unpack`]
//! rebuilds it from the bytes and [`TileGridSurface::pack`] writes edits back.

use std::{
    path::Path,
    sync::{Arc, mpsc},
};

use crate::{
    AddressingMode, EngineError, IndexedPalette, Palette, Result, SwizzleMap, SwizzlePattern, TileAddressCalculator, TileCodec, TileFormat,
    ViewSettings, codecs::codec_by_id,
};

mod render;
mod transfer;

pub use transfer::{BufferTransfer, TransferKind};

/// Color of grid cells whose tile lies (partially) outside the buffer.
pub const INVALID_TILE_COLOR: u32 = 0xFF7F_7F7F;

/// Tile edge used until a caller picks dimensions.
pub const DEFAULT_TILE_SIZE: usize = 8;

/// Notification sent to subscribers after a configuration change took effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    CodecChanged,
    FormatChanged,
    GridResized,
    AddressingChanged,
    SwizzleChanged,
    BufferReplaced,
}

enum BufferSlot {
    Resident(Vec<u8>),
    InFlight,
}

#[derive(Clone)]
struct SurfaceConfig {
    codec: Arc<dyn TileCodec>,
    format: TileFormat,
    addressing: AddressingMode,
    swizzle: SwizzlePattern,
    cols: usize,
    rows: usize,
    base_offset: usize,
    palette_index: usize,
}

pub struct TileGridSurface {
    codec: Arc<dyn TileCodec>,
    calculator: TileAddressCalculator,
    swizzle: SwizzlePattern,
    swizzle_map: Option<Arc<SwizzleMap>>,
    palette: Arc<dyn Palette>,
    palette_index: usize,
    buffer: BufferSlot,
    pixels: Vec<u32>,
    scratch: Vec<u32>,
    listeners: Vec<mpsc::Sender<SurfaceEvent>>,
}

impl TileGridSurface {
    /// Creates a surface with 8×8 tiles, contiguous addressing and no swizzle, and decodes
    /// `buffer` into the raster.
    pub fn new(codec: Arc<dyn TileCodec>, cols: usize, rows: usize, buffer: Vec<u8>) -> Result<Self> {
        let format = codec.tile_format(DEFAULT_TILE_SIZE, DEFAULT_TILE_SIZE)?;
        let config = SurfaceConfig {
            codec,
            format,
            addressing: AddressingMode::default(),
            swizzle: SwizzlePattern::None,
            cols,
            rows,
            base_offset: 0,
            palette_index: 0,
        };
        Self::with_config(config, buffer)
    }

    pub fn from_settings(settings: &ViewSettings, buffer: Vec<u8>) -> Result<Self> {
        let codec = codec_by_id(&settings.codec)?;
        let format = codec.tile_format(settings.tile_width, settings.tile_height)?;
        let config = SurfaceConfig {
            codec,
            format,
            addressing: settings.addressing,
            swizzle: settings.swizzle,
            cols: settings.cols,
            rows: settings.rows,
            base_offset: settings.base_offset,
            palette_index: settings.palette_index,
        };
        Self::with_config(config, buffer)
    }

    fn with_config(config: SurfaceConfig, buffer: Vec<u8>) -> Result<Self> {
        let (calculator, swizzle_map) = Self::resolve(&config, None)?;
        let mut surface = Self {
            codec: config.codec,
            calculator,
            swizzle: config.swizzle,
            swizzle_map,
            palette: Arc::new(IndexedPalette::default()),
            palette_index: config.palette_index,
            buffer: BufferSlot::Resident(buffer),
            pixels: Vec::new(),
            scratch: Vec::new(),
            listeners: Vec::new(),
        };
        surface.pixels = vec![0; surface.canvas_width() * surface.canvas_height()];
        surface.unpack()?;
        Ok(surface)
    }

    /// Snapshot of the current view configuration.
    pub fn settings(&self) -> ViewSettings {
        let format = self.format();
        ViewSettings {
            codec: self.codec.id().to_string(),
            tile_width: format.width(),
            tile_height: format.height(),
            cols: self.cols(),
            rows: self.rows(),
            base_offset: self.base_offset(),
            palette_index: self.palette_index,
            addressing: *self.addressing(),
            swizzle: self.swizzle,
            ..Default::default()
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Configuration
    // ═══════════════════════════════════════════════════════════════════════

    fn current_config(&self) -> SurfaceConfig {
        SurfaceConfig {
            codec: self.codec.clone(),
            format: *self.format(),
            addressing: *self.addressing(),
            swizzle: self.swizzle,
            cols: self.cols(),
            rows: self.rows(),
            base_offset: self.base_offset(),
            palette_index: self.palette_index,
        }
    }

    /// Validates a configuration and resolves everything derived from it. `current` is reused
    /// when it was built for the same swizzle geometry.
    fn resolve(config: &SurfaceConfig, current: Option<&Arc<SwizzleMap>>) -> Result<(TileAddressCalculator, Option<Arc<SwizzleMap>>)> {
        if config.addressing.is_packed_2d() && !config.codec.supports_row_stride() {
            return Err(EngineError::UnsupportedAddressing {
                codec: config.codec.id().to_string(),
                addressing: config.addressing.to_string(),
            });
        }
        let calculator = TileAddressCalculator::new(config.format, config.addressing, config.cols, config.rows, config.base_offset)?;
        check_palette_index(&config.format, config.palette_index)?;

        let (width, height) = (config.format.width(), config.format.height());
        let swizzle_map = if config.swizzle.is_none() {
            config.swizzle.validate()?;
            None
        } else if let Some(map) = current.filter(|map| map.matches(config.swizzle, width, height, config.cols, config.rows)) {
            Some(map.clone())
        } else {
            Some(Arc::new(SwizzleMap::new(config.swizzle, width, height, config.cols, config.rows)?))
        };
        Ok((calculator, swizzle_map))
    }

    /// Commits `config` and re-decodes the raster. A rejected configuration leaves the surface
    /// as it was.
    fn reconfigure(&mut self, config: SurfaceConfig, events: &[SurfaceEvent]) -> Result<()> {
        if matches!(self.buffer, BufferSlot::InFlight) {
            return Err(EngineError::BufferInFlight);
        }
        let (calculator, swizzle_map) = match Self::resolve(&config, self.swizzle_map.as_ref()) {
            Ok(resolved) => resolved,
            Err(err) => {
                log::warn!("rejected surface configuration: {err}");
                return Err(err);
            }
        };

        self.codec = config.codec;
        self.calculator = calculator;
        self.swizzle = config.swizzle;
        self.swizzle_map = swizzle_map;
        self.palette_index = config.palette_index;

        let canvas_len = self.canvas_width() * self.canvas_height();
        if self.pixels.len() != canvas_len {
            self.pixels = vec![0; canvas_len];
        }
        log::debug!(
            "surface: {} {} {}x{} tiles, {}, swizzle {}",
            self.codec.id(),
            self.format(),
            self.cols(),
            self.rows(),
            self.addressing(),
            self.swizzle
        );

        self.unpack()?;
        for event in events {
            self.notify(*event);
        }
        Ok(())
    }

    /// Switches the codec, keeping the tile dimensions.
    pub fn set_codec(&mut self, codec: Arc<dyn TileCodec>) -> Result<()> {
        let mut config = self.current_config();
        config.format = codec.tile_format(config.format.width(), config.format.height())?;
        config.codec = codec;
        self.reconfigure(config, &[SurfaceEvent::CodecChanged, SurfaceEvent::FormatChanged])
    }

    pub fn set_tile_dimensions(&mut self, width: usize, height: usize) -> Result<()> {
        let mut config = self.current_config();
        config.format = config.codec.tile_format(width, height)?;
        self.reconfigure(config, &[SurfaceEvent::FormatChanged])
    }

    pub fn set_grid_size(&mut self, cols: usize, rows: usize) -> Result<()> {
        let mut config = self.current_config();
        config.cols = cols;
        config.rows = rows;
        self.reconfigure(config, &[SurfaceEvent::GridResized])
    }

    pub fn set_addressing(&mut self, addressing: AddressingMode) -> Result<()> {
        let mut config = self.current_config();
        config.addressing = addressing;
        self.reconfigure(config, &[SurfaceEvent::AddressingChanged])
    }

    /// Activates a swizzle pattern. Patterns with a native tile size switch the tile
    /// dimensions to it.
    pub fn set_swizzle(&mut self, swizzle: SwizzlePattern) -> Result<()> {
        if let Err(err) = swizzle.validate() {
            log::warn!("rejected swizzle {swizzle}: {err}");
            return Err(err);
        }
        let mut config = self.current_config();
        config.swizzle = swizzle;
        let mut events = vec![SurfaceEvent::SwizzleChanged];
        if let Some((width, height)) = swizzle.optimal_tile_size() {
            if (width, height) != (config.format.width(), config.format.height()) {
                config.format = config.codec.tile_format(width, height)?;
                events.push(SurfaceEvent::FormatChanged);
            }
        }
        self.reconfigure(config, &events)
    }

    pub fn set_palette(&mut self, palette: Arc<dyn Palette>) -> Result<()> {
        self.palette = palette;
        self.unpack()
    }

    /// Selects the sub-palette indexed codecs draw from. Out-of-range indices are rejected
    /// and the previous selection stays active.
    pub fn set_palette_index(&mut self, palette_index: usize) -> Result<()> {
        if matches!(self.buffer, BufferSlot::InFlight) {
            return Err(EngineError::BufferInFlight);
        }
        if let Err(err) = check_palette_index(self.format(), palette_index) {
            log::warn!("rejected palette index: {err}");
            return Err(err);
        }
        self.palette_index = palette_index;
        self.unpack()
    }

    /// First absolute palette entry of the active sub-palette.
    pub(crate) fn palette_base(&self) -> usize {
        self.palette_index.saturating_mul(self.format().color_count())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Navigation
    // ═══════════════════════════════════════════════════════════════════════

    pub fn set_base_offset(&mut self, base_offset: usize) -> Result<()> {
        let mut config = self.current_config();
        config.base_offset = base_offset;
        self.reconfigure(config, &[])
    }

    fn advance_by(&mut self, steps: isize, increment: usize) -> Result<()> {
        let delta = steps.saturating_mul(increment.min(isize::MAX as usize) as isize);
        self.set_base_offset(self.base_offset().saturating_add_signed(delta))
    }

    /// Moves the base offset by `tiles` tile increments, stopping at 0.
    pub fn advance_tiles(&mut self, tiles: isize) -> Result<()> {
        self.advance_by(tiles, self.calculator.tile_increment())
    }

    pub fn advance_rows(&mut self, rows: isize) -> Result<()> {
        self.advance_by(rows, self.calculator.row_increment())
    }

    pub fn advance_pages(&mut self, pages: isize) -> Result<()> {
        self.advance_by(pages, self.calculator.page_increment())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════

    pub fn codec(&self) -> &Arc<dyn TileCodec> {
        &self.codec
    }

    pub fn format(&self) -> &TileFormat {
        self.calculator.format()
    }

    pub fn addressing(&self) -> &AddressingMode {
        self.calculator.mode()
    }

    pub fn swizzle(&self) -> SwizzlePattern {
        self.swizzle
    }

    /// Precomputed sample positions of the active swizzle pattern.
    pub fn swizzle_map(&self) -> Option<&Arc<SwizzleMap>> {
        self.swizzle_map.as_ref()
    }

    pub fn palette(&self) -> &Arc<dyn Palette> {
        &self.palette
    }

    pub fn palette_index(&self) -> usize {
        self.palette_index
    }

    pub fn calculator(&self) -> &TileAddressCalculator {
        &self.calculator
    }

    pub fn cols(&self) -> usize {
        self.calculator.cols()
    }

    pub fn rows(&self) -> usize {
        self.calculator.rows()
    }

    pub fn base_offset(&self) -> usize {
        self.calculator.base_offset()
    }

    pub fn canvas_width(&self) -> usize {
        self.cols() * self.format().width()
    }

    pub fn canvas_height(&self) -> usize {
        self.rows() * self.format().height()
    }

    /// The encoded bytes.
    pub fn bytes(&self) -> Result<&[u8]> {
        match &self.buffer {
            BufferSlot::Resident(bits) => Ok(bits),
            BufferSlot::InFlight => Err(EngineError::BufferInFlight),
        }
    }

    pub fn is_transfer_in_flight(&self) -> bool {
        matches!(self.buffer, BufferSlot::InFlight)
    }

    /// Installs new bytes, re-decodes and returns the previous bytes.
    pub fn replace_buffer(&mut self, buffer: Vec<u8>) -> Result<Vec<u8>> {
        if matches!(self.buffer, BufferSlot::InFlight) {
            return Err(EngineError::BufferInFlight);
        }
        let old = match std::mem::replace(&mut self.buffer, BufferSlot::Resident(buffer)) {
            BufferSlot::Resident(old) => old,
            BufferSlot::InFlight => Vec::new(),
        };
        self.unpack()?;
        self.notify(SurfaceEvent::BufferReplaced);
        Ok(old)
    }

    /// Byte offset of the tile at (`col`, `row`), `None` if it is outside the grid or doesn't
    /// fit into the buffer.
    pub fn tile_address(&self, col: usize, row: usize) -> Option<usize> {
        if col >= self.cols() || row >= self.rows() {
            return None;
        }
        let BufferSlot::Resident(bits) = &self.buffer else {
            return None;
        };
        self.calculator.address(col, row, bits.len())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Raster access
    // ═══════════════════════════════════════════════════════════════════════

    /// The decoded ARGB raster, `canvas_width × canvas_height`, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.canvas_width() || y >= self.canvas_height() {
            return None;
        }
        self.pixels.get(y * self.canvas_width() + x).copied()
    }

    /// Sets one raster pixel. The bytes change on the next pack.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) -> bool {
        if x >= self.canvas_width() || y >= self.canvas_height() {
            return false;
        }
        let width = self.canvas_width();
        self.pixels[y * width + x] = color;
        true
    }

    /// Grid cell containing canvas pixel (`x`, `y`).
    pub fn tile_at(&self, x: usize, y: usize) -> Option<(usize, usize)> {
        if x >= self.canvas_width() || y >= self.canvas_height() {
            return None;
        }
        Some((x / self.format().width(), y / self.format().height()))
    }

    /// Raster rectangle; pixels outside the canvas read as 0.
    pub fn read_rect(&self, x: usize, y: usize, width: usize, height: usize) -> Vec<u32> {
        let mut result = Vec::with_capacity(width * height);
        for dy in 0..height {
            for dx in 0..width {
                result.push(self.pixel(x + dx, y + dy).unwrap_or(0));
            }
        }
        result
    }

    /// Writes a row-major rectangle into the raster, clipped to the canvas.
    pub fn write_rect(&mut self, x: usize, y: usize, width: usize, height: usize, data: &[u32]) {
        for dy in 0..height {
            for dx in 0..width {
                if let Some(color) = data.get(dy * width + dx) {
                    self.set_pixel(x + dx, y + dy, *color);
                }
            }
        }
    }

    /// Raster pixels of one tile, row-major.
    pub fn tile_pixels(&self, col: usize, row: usize) -> Option<Vec<u32>> {
        if col >= self.cols() || row >= self.rows() {
            return None;
        }
        let (width, height) = (self.format().width(), self.format().height());
        Some(self.read_rect(col * width, row * height, width, height))
    }

    pub fn write_tile_pixels(&mut self, col: usize, row: usize, data: &[u32]) -> bool {
        if col >= self.cols() || row >= self.rows() {
            return false;
        }
        let (width, height) = (self.format().width(), self.format().height());
        self.write_rect(col * width, row * height, width, height, data);
        true
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Notifications
    // ═══════════════════════════════════════════════════════════════════════

    pub fn subscribe(&mut self) -> mpsc::Receiver<SurfaceEvent> {
        let (tx, rx) = mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    fn notify(&mut self, event: SurfaceEvent) {
        self.listeners.retain(|listener| listener.send(event).is_ok());
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Buffer transfer
    // ═══════════════════════════════════════════════════════════════════════

    /// Reads `path` on a worker thread. The surface has no buffer until
    /// [`TileGridSurface::finish_transfer`].
    pub fn begin_load(&mut self, path: impl AsRef<Path>) -> Result<BufferTransfer> {
        self.begin_transfer(TransferKind::Load, path.as_ref())
    }

    /// Writes the buffer to `path` on a worker thread.
    pub fn begin_save(&mut self, path: impl AsRef<Path>) -> Result<BufferTransfer> {
        self.begin_transfer(TransferKind::Save, path.as_ref())
    }

    fn begin_transfer(&mut self, kind: TransferKind, path: &Path) -> Result<BufferTransfer> {
        if matches!(self.buffer, BufferSlot::InFlight) {
            return Err(EngineError::BufferInFlight);
        }
        let (transfer, sender) = BufferTransfer::spawn(kind, path)?;
        if let BufferSlot::Resident(data) = std::mem::replace(&mut self.buffer, BufferSlot::InFlight) {
            if let Err(mpsc::SendError(data)) = sender.send(data) {
                self.buffer = BufferSlot::Resident(data);
                return Err(EngineError::transfer_failed(path, "worker exited before receiving the buffer"));
            }
        }
        Ok(transfer)
    }

    /// Waits for `transfer` and takes the buffer back. A completed load replaces the bytes and
    /// re-decodes; failures restore the previous bytes.
    pub fn finish_transfer(&mut self, transfer: BufferTransfer) -> Result<()> {
        if !matches!(self.buffer, BufferSlot::InFlight) {
            return Err(EngineError::NoTransferInFlight);
        }
        let kind = transfer.kind();
        let outcome = transfer.join();
        self.buffer = BufferSlot::Resident(outcome.buffer.unwrap_or_default());

        if kind == TransferKind::Load {
            self.unpack()?;
            if outcome.result.is_ok() {
                self.notify(SurfaceEvent::BufferReplaced);
            }
        }
        outcome.result
    }
}

/// Indexed formats address `palette_index * color_count` onwards; the whole sub-palette has to
/// be addressable.
fn check_palette_index(format: &TileFormat, palette_index: usize) -> Result<()> {
    if !format.is_indexed() {
        return Ok(());
    }
    let color_count = format.color_count();
    match palette_index.checked_mul(color_count).and_then(|base| base.checked_add(color_count)) {
        Some(_) => Ok(()),
        None => Err(EngineError::InvalidPaletteIndex { palette_index, color_count }),
    }
}
