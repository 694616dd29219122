// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Device raster: byte-aligned scanlines in a declared pixel format, with an
// optional palette for the indexed formats.

use pixbridge_core::error::{PixbridgeError, Result};
use pixbridge_core::types::{Color, PixelFormat};

/// A device-style image: `height` rows of `stride` bytes, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    format: PixelFormat,
    stride: usize,
    data: Vec<u8>,
    palette: Option<Vec<Color>>,
}

impl Raster {
    /// Zeroed raster with rows padded to a multiple of 4 bytes.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        check_dimensions(width, height).map_err(PixbridgeError::InvalidRaster)?;
        let stride = aligned_stride(width, format)?;
        let data = alloc_zeroed(stride, height)?;
        Ok(Self {
            width,
            height,
            format,
            stride,
            data,
            palette: None,
        })
    }

    /// Wrap scanlines supplied by a loader, validating their layout.
    pub fn from_parts(
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: usize,
        data: Vec<u8>,
        palette: Option<Vec<Color>>,
    ) -> Result<Self> {
        check_dimensions(width, height).map_err(PixbridgeError::InvalidRaster)?;
        let min_stride = min_stride(width, format);
        if stride < min_stride {
            return Err(PixbridgeError::InvalidRaster(format!(
                "stride {stride} is below the {min_stride} bytes needed for {width} {format} pixels"
            )));
        }
        let needed = stride
            .checked_mul(height as usize)
            .ok_or_else(|| PixbridgeError::InvalidRaster("scanline size overflows".into()))?;
        if data.len() < needed {
            return Err(PixbridgeError::InvalidRaster(format!(
                "{} bytes supplied, {needed} needed",
                data.len()
            )));
        }
        let mut raster = Self {
            width,
            height,
            format,
            stride,
            data,
            palette: None,
        };
        if let Some(palette) = palette {
            raster.set_palette(palette)?;
        }
        Ok(raster)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per scanline, including padding.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn palette(&self) -> Option<&[Color]> {
        self.palette.as_deref()
    }

    /// Attach a palette. Only indexed formats take one, and it may not hold
    /// more than `2^bpp` entries.
    pub fn set_palette(&mut self, palette: Vec<Color>) -> Result<()> {
        let Some(max) = self.format.max_palette_len() else {
            return Err(PixbridgeError::InvalidRaster(format!(
                "{} rasters do not carry a palette",
                self.format
            )));
        };
        if palette.len() > max {
            return Err(PixbridgeError::InvalidRaster(format!(
                "palette of {} entries exceeds the {max} a {} raster can index",
                palette.len(),
                self.format
            )));
        }
        self.palette = Some(palette);
        Ok(())
    }

    /// Scanline `y`, exactly `stride` bytes.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.stride]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        &mut self.data[start..start + self.stride]
    }
}

/// Minimum bytes per scanline for `width` pixels of `format`.
pub fn min_stride(width: u32, format: PixelFormat) -> usize {
    (u64::from(width) * u64::from(format.bits_per_pixel())).div_ceil(8) as usize
}

/// Scanline size padded to a 4-byte boundary.
pub fn aligned_stride(width: u32, format: PixelFormat) -> Result<usize> {
    let bits = u64::from(width) * u64::from(format.bits_per_pixel());
    usize::try_from(bits.div_ceil(32) * 4).map_err(|_| {
        PixbridgeError::AllocationFailed(format!("{width} {format} pixels do not fit one row"))
    })
}

pub(crate) fn check_dimensions(width: u32, height: u32) -> std::result::Result<(), String> {
    if width == 0 || height == 0 {
        return Err(format!("dimensions must be non-zero, got {width}x{height}"));
    }
    Ok(())
}

pub(crate) fn alloc_zeroed<T: Default + Clone>(per_row: usize, rows: u32) -> Result<Vec<T>> {
    let len = per_row.checked_mul(rows as usize).ok_or_else(|| {
        PixbridgeError::AllocationFailed(format!("{rows} rows of {per_row} elements overflow"))
    })?;
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|err| {
        PixbridgeError::AllocationFailed(format!("cannot reserve {len} elements: {err}"))
    })?;
    data.resize(len, T::default());
    Ok(data)
}
