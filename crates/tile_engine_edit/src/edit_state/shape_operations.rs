//! Drawing operations
//!
//! Each call is a gesture of its own unless one is already open, in which case it joins it.
//! Nothing is drawn while the bytes are out on a load or save.

use tile_engine::{EngineError, Result};

use crate::brushes;

use super::TileEditState;

impl TileEditState {
    /// Set a single pixel. Returns `false` if the pixel lies outside the canvas.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) -> Result<bool> {
        let mut written = false;
        self.with_gesture("Set pixel", |state| {
            written = state.tracker.set_pixel(&mut state.surface, x, y, color)?;
            Ok(())
        })?;
        Ok(written)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Line Drawing
    // ═══════════════════════════════════════════════════════════════════════

    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) -> Result<()> {
        let points = brushes::bresenham_line(x0, y0, x1, y1);
        self.with_gesture("Draw line", |state| state.paint_points(points, color))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Rectangle Drawing
    // ═══════════════════════════════════════════════════════════════════════

    pub fn draw_rectangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, filled: bool, color: u32) -> Result<()> {
        let points = brushes::rectangle_points(x0, y0, x1, y1, filled);
        let description = if filled { "Fill rectangle" } else { "Draw rectangle" };
        self.with_gesture(description, |state| state.paint_points(points, color))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Flood Fill
    // ═══════════════════════════════════════════════════════════════════════

    /// 4-connected fill of the region sharing the color at the start point.
    pub fn flood_fill(&mut self, start_x: i32, start_y: i32, color: u32) -> Result<()> {
        if self.surface.is_transfer_in_flight() {
            return Err(EngineError::BufferInFlight);
        }
        let (Ok(x), Ok(y)) = (usize::try_from(start_x), usize::try_from(start_y)) else {
            return Ok(());
        };
        let Some(target) = self.surface.pixel(x, y) else {
            return Ok(());
        };
        if target == color {
            return Ok(());
        }

        let width = self.surface.canvas_width() as i32;
        let height = self.surface.canvas_height() as i32;
        let surface = &self.surface;
        let points = brushes::flood_fill_points(start_x, start_y, width, height, |x, y| surface.pixel(x as usize, y as usize));
        self.with_gesture("Flood fill", |state| state.paint_points(points, color))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Helpers
    // ═══════════════════════════════════════════════════════════════════════

    fn paint_points(&mut self, points: impl IntoIterator<Item = (i32, i32)>, color: u32) -> Result<()> {
        for (x, y) in points {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
                self.tracker.set_pixel(&mut self.surface, x, y, color)?;
            }
        }
        Ok(())
    }

    fn with_gesture(&mut self, description: &str, draw: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        if self.surface.is_transfer_in_flight() {
            return Err(EngineError::BufferInFlight);
        }
        if self.tracker.is_open() {
            return draw(self);
        }
        self.tracker.begin_gesture(description);
        if let Err(err) = draw(self) {
            self.tracker.cancel_gesture(&mut self.surface);
            return Err(err);
        }
        self.end_gesture()
    }
}
