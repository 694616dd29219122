// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel format catalogue: which raster formats map onto which packed depths.
//
// Import accepts 1 and 8 bpp indexed, 24 bpp RGB and 32 bpp ARGB rasters.
// Export produces 1 and 8 bpp indexed, 16 bpp gray and 32 bpp ARGB rasters.
// The two directions are deliberately not symmetric.

use pixbridge_core::error::{PixbridgeError, Result};
use pixbridge_core::types::PixelFormat;

/// Bits per pixel of a raster format.
pub fn bits_per_pixel(format: PixelFormat) -> u32 {
    format.bits_per_pixel()
}

/// Packed depth an importable raster format converts to.
pub fn packed_depth_for(format: PixelFormat) -> Result<u32> {
    match format {
        PixelFormat::Indexed1 => Ok(1),
        PixelFormat::Indexed8 => Ok(8),
        PixelFormat::Rgb24 | PixelFormat::Argb32 => Ok(32),
        other => Err(PixbridgeError::UnsupportedSourceFormat(other)),
    }
}

/// Raster format a packed buffer of `depth` bpp exports to.
pub fn raster_format_for(depth: u32) -> Result<PixelFormat> {
    match depth {
        1 => Ok(PixelFormat::Indexed1),
        8 => Ok(PixelFormat::Indexed8),
        16 => Ok(PixelFormat::Gray16),
        32 => Ok(PixelFormat::Argb32),
        other => Err(PixbridgeError::UnsupportedPackedDepth(other)),
    }
}
