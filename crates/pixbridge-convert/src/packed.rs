// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Packed buffer: word-aligned scanlines at 1, 2, 4, 8, 16 or 32 bpp, the
// representation consumed by the image-processing back end.

use pixbridge_core::error::{PixbridgeError, Result};

use crate::colormap::Colormap;
use crate::raster::{alloc_zeroed, check_dimensions};

/// Depths a packed buffer may hold.
pub const PACKED_DEPTHS: [u32; 6] = [1, 2, 4, 8, 16, 32];

/// `height` lines of `words_per_line` 32-bit words each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBuffer {
    width: u32,
    height: u32,
    depth: u32,
    words_per_line: usize,
    data: Vec<u32>,
    colormap: Option<Colormap>,
}

impl PackedBuffer {
    /// Zeroed buffer without a colormap.
    pub fn new(width: u32, height: u32, depth: u32) -> Result<Self> {
        check_depth(depth)?;
        check_dimensions(width, height).map_err(PixbridgeError::InvalidBuffer)?;
        let words_per_line = words_per_line(width, depth);
        let data = alloc_zeroed(words_per_line, height)?;
        Ok(Self {
            width,
            height,
            depth,
            words_per_line,
            data,
            colormap: None,
        })
    }

    /// Wrap words produced by the back end.
    pub fn from_parts(width: u32, height: u32, depth: u32, data: Vec<u32>) -> Result<Self> {
        check_depth(depth)?;
        check_dimensions(width, height).map_err(PixbridgeError::InvalidBuffer)?;
        let words_per_line = words_per_line(width, depth);
        let needed = words_per_line * height as usize;
        if data.len() != needed {
            return Err(PixbridgeError::InvalidBuffer(format!(
                "{width}x{height} at {depth} bpp needs {needed} words, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            depth,
            words_per_line,
            data,
            colormap: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn words_per_line(&self) -> usize {
        self.words_per_line
    }

    pub fn data(&self) -> &[u32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u32> {
        self.data
    }

    pub fn colormap(&self) -> Option<&Colormap> {
        self.colormap.as_ref()
    }

    /// Attach a colormap. The buffer must be 8 bpp or shallower and the
    /// colormap must have been built for the same depth.
    pub fn set_colormap(&mut self, colormap: Colormap) -> Result<()> {
        if self.depth > 8 {
            return Err(PixbridgeError::InvalidBuffer(format!(
                "{} bpp buffers cannot carry a colormap",
                self.depth
            )));
        }
        if colormap.depth() != self.depth {
            return Err(PixbridgeError::InvalidBuffer(format!(
                "colormap depth {} does not match buffer depth {}",
                colormap.depth(),
                self.depth
            )));
        }
        self.colormap = Some(colormap);
        Ok(())
    }

    pub fn take_colormap(&mut self) -> Option<Colormap> {
        self.colormap.take()
    }

    /// Line `y`, exactly `words_per_line` words.
    pub fn line(&self, y: u32) -> &[u32] {
        let start = y as usize * self.words_per_line;
        &self.data[start..start + self.words_per_line]
    }

    pub fn line_mut(&mut self, y: u32) -> &mut [u32] {
        let start = y as usize * self.words_per_line;
        &mut self.data[start..start + self.words_per_line]
    }
}

/// `ceil(width * depth / 32)`.
pub fn words_per_line(width: u32, depth: u32) -> usize {
    (u64::from(width) * u64::from(depth)).div_ceil(32) as usize
}

fn check_depth(depth: u32) -> Result<()> {
    if PACKED_DEPTHS.contains(&depth) {
        Ok(())
    } else {
        Err(PixbridgeError::UnsupportedFormat(format!(
            "packed depth must be one of {PACKED_DEPTHS:?}, got {depth}"
        )))
    }
}
