// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colormaps for low-depth packed buffers, and palette synchronisation between
// raster palettes and colormaps.

use pixbridge_core::error::{PixbridgeError, Result};
use pixbridge_core::types::Color;
use tracing::debug;

/// Ordered, append-only table of opaque colours indexed by pixel value.
///
/// Capacity is `2^depth`; inserting past it fails with `ColormapOverflow`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colormap {
    depth: u32,
    entries: Vec<Color>,
}

impl Colormap {
    /// Empty colormap for a 1, 2, 4 or 8 bpp buffer.
    pub fn new(depth: u32) -> Result<Self> {
        if !matches!(depth, 1 | 2 | 4 | 8) {
            return Err(PixbridgeError::UnsupportedFormat(format!(
                "colormap depth must be 1, 2, 4 or 8 bpp, got {depth}"
            )));
        }
        Ok(Self {
            depth,
            entries: Vec::with_capacity(1 << depth),
        })
    }

    /// Evenly spaced gray ramp of `levels` entries from black to white.
    pub fn linear(depth: u32, levels: usize) -> Result<Self> {
        let mut cmap = Self::new(depth)?;
        if levels < 2 || levels > cmap.capacity() {
            return Err(PixbridgeError::UnsupportedFormat(format!(
                "a {depth} bpp linear colormap needs 2..={} levels, got {levels}",
                cmap.capacity()
            )));
        }
        for color in gray_ramp(levels) {
            cmap.add_color(color)?;
        }
        Ok(cmap)
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Maximum number of entries, `2^depth`.
    pub fn capacity(&self) -> usize {
        1 << self.depth
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries still available before the colormap is full.
    pub fn free_count(&self) -> usize {
        self.capacity() - self.len()
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.entries.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        self.entries.iter().copied()
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.entries
    }

    /// Append a colour and return its index. Alpha is dropped: entries are
    /// always stored opaque.
    pub fn add_color(&mut self, color: Color) -> Result<usize> {
        let index = self.entries.len();
        if index >= self.capacity() {
            return Err(PixbridgeError::ColormapOverflow {
                index,
                capacity: self.capacity(),
            });
        }
        self.entries.push(color.with_alpha(255));
        Ok(index)
    }

    /// Index of an identical existing entry, or append the colour.
    pub fn add_new_color(&mut self, color: Color) -> Result<usize> {
        let opaque = color.with_alpha(255);
        match self.entries.iter().position(|entry| *entry == opaque) {
            Some(index) => Ok(index),
            None => self.add_color(opaque),
        }
    }

    /// Index of the entry closest to `color` by squared RGB distance.
    pub fn nearest_index(&self, color: Color) -> Option<usize> {
        let distance = |entry: &Color| {
            let dr = i32::from(entry.red) - i32::from(color.red);
            let dg = i32::from(entry.green) - i32::from(color.green);
            let db = i32::from(entry.blue) - i32::from(color.blue);
            dr * dr + dg * dg + db * db
        };
        self.entries
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| distance(entry))
            .map(|(index, _)| index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Gray ramp of `levels` entries; entry `i` is `round(i * 255 / (levels - 1))`.
pub fn gray_ramp(levels: usize) -> impl Iterator<Item = Color> {
    let last = levels.saturating_sub(1).max(1);
    (0..levels).map(move |i| {
        let level = (i * 255 + last / 2) / last;
        Color::gray(level.min(255) as u8)
    })
}

// ---------------------------------------------------------------------------
// Palette synchronisation
// ---------------------------------------------------------------------------

/// Build a colormap for a `depth` bpp buffer from a raster palette.
///
/// Entries are appended in order. If the palette holds more than `2^depth`
/// entries the partially built colormap is dropped and `ColormapOverflow`
/// is returned.
pub fn import_palette(palette: &[Color], depth: u32) -> Result<Colormap> {
    let mut cmap = Colormap::new(depth)?;
    for color in palette {
        cmap.add_color(*color)?;
    }
    debug!(depth, entries = cmap.len(), "Imported raster palette");
    Ok(cmap)
}

/// Palette for an indexed raster that can hold `max_entries` colours.
///
/// A colormap that fits is copied verbatim by index. Otherwise (no colormap,
/// or one too large) a gray ramp of `max_entries` entries is produced.
pub fn synthesize_palette(colormap: Option<&Colormap>, max_entries: usize) -> Vec<Color> {
    match colormap {
        Some(cmap) if cmap.len() <= max_entries => {
            debug!(entries = cmap.len(), "Copying colormap into raster palette");
            cmap.as_slice().to_vec()
        }
        _ => {
            debug!(max_entries, "Synthesising gray ramp palette");
            gray_ramp(max_entries).collect()
        }
    }
}
