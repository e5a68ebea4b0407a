use serde::{Deserialize, Serialize};

/// Opaque black, returned for entries a palette doesn't have.
pub const OPAQUE_BLACK: u32 = 0xFF00_0000;

/// Color lookup used by indexed codecs. Colors are `0xAARRGGBB`.
pub trait Palette: Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of `color` inside the sub-palette of `count` entries starting at `base`, relative
    /// to `base`. Colors the sub-palette doesn't contain map to the nearest entry.
    fn index_of(&self, base: usize, count: usize, color: u32) -> u32;

    /// Color of the absolute palette entry `index`.
    fn entry_rgb(&self, index: usize) -> u32;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedPalette {
    entries: Vec<u32>,
}

impl Default for IndexedPalette {
    fn default() -> Self {
        Self::grayscale(256)
    }
}

impl IndexedPalette {
    pub fn new(entries: Vec<u32>) -> Self {
        Self { entries }
    }

    /// `count` opaque gray levels from black to white.
    pub fn grayscale(count: usize) -> Self {
        let steps = count.saturating_sub(1).max(1) as u32;
        let entries = (0..count as u32)
            .map(|i| {
                let level = (i * 255 / steps).min(255);
                OPAQUE_BLACK | level << 16 | level << 8 | level
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    pub fn set_entry(&mut self, index: usize, color: u32) {
        if index >= self.entries.len() {
            self.entries.resize(index + 1, OPAQUE_BLACK);
        }
        self.entries[index] = color;
    }
}

fn distance(a: u32, b: u32) -> u32 {
    let channel = |shift: u32| {
        let d = ((a >> shift) & 0xFF) as i32 - ((b >> shift) & 0xFF) as i32;
        (d * d) as u32
    };
    channel(16) + channel(8) + channel(0)
}

impl Palette for IndexedPalette {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn index_of(&self, base: usize, count: usize, color: u32) -> u32 {
        let end = base.saturating_add(count).min(self.entries.len());
        let Some(window) = self.entries.get(base..end) else {
            return 0;
        };
        if let Some(i) = window.iter().position(|&c| c == color) {
            return i as u32;
        }
        window
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| distance(**c, color))
            .map(|(i, _)| i as u32)
            .unwrap_or(0)
    }

    fn entry_rgb(&self, index: usize) -> u32 {
        self.entries.get(index).copied().unwrap_or(OPAQUE_BLACK)
    }
}
