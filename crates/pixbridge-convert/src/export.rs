// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster exporter: converts a packed buffer back into a device raster.

use pixbridge_core::config::{ConvertConfig, OneBitRowMode};
use pixbridge_core::error::{PixbridgeError, Result};
use pixbridge_core::types::PixelFormat;
use tracing::{debug, info, instrument, warn};

use crate::bits::{self, word};
use crate::catalog::raster_format_for;
use crate::colormap::synthesize_palette;
use crate::packed::PackedBuffer;
use crate::raster::Raster;

/// Packed-buffer to raster converter.
#[derive(Debug, Clone, Default)]
pub struct RasterExporter {
    config: ConvertConfig,
}

impl RasterExporter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert `packed` into a freshly allocated raster.
    ///
    /// For 32 bpp buffers the stored alpha is kept only when `include_alpha`
    /// is set; otherwise every pixel is written fully opaque. Indexed rasters
    /// get the buffer's colormap, or a gray ramp when there is none that fits.
    #[instrument(skip_all, fields(
        width = packed.width(),
        height = packed.height(),
        depth = packed.depth(),
        include_alpha = include_alpha,
    ))]
    pub fn export(&self, packed: &PackedBuffer, include_alpha: bool) -> Result<Raster> {
        let format = raster_format_for(packed.depth())?;
        self.config.check_pixels(packed.width(), packed.height())?;
        debug!(%format, "Exporting packed buffer");

        let mut raster = Raster::new(packed.width(), packed.height(), format)?;

        if let Some(max_entries) = format.max_palette_len() {
            raster.set_palette(synthesize_palette(packed.colormap(), max_entries))?;
        }

        match packed.depth() {
            32 => {
                let alpha_mask = if include_alpha { 0 } else { 0xFF };
                transfer_32(packed, &mut raster, alpha_mask);
            }
            16 => transfer_16(packed, &mut raster),
            8 => transfer_8(packed, &mut raster),
            1 => transfer_1(packed, &mut raster, self.config.one_bit_rows),
            other => return Err(PixbridgeError::UnsupportedPackedDepth(other)),
        }

        info!(%format, stride = raster.stride(), "Packed buffer exported");
        Ok(raster)
    }

    /// Export using the configured alpha policy.
    pub fn export_default(&self, packed: &PackedBuffer) -> Result<Raster> {
        self.export(packed, self.config.include_alpha)
    }
}

/// `0xRRGGBBAA` words become B, G, R, A bytes with `alpha | alpha_mask`.
fn transfer_32(src: &PackedBuffer, dst: &mut Raster, alpha_mask: u8) {
    let width = src.width() as usize;
    for y in 0..src.height() {
        let line = src.line(y);
        let row = dst.row_mut(y);
        for x in 0..width {
            let (red, green, blue, alpha) = bits::decode_rgba(word::get_u32(line, x));
            let at = x * 4;
            bits::set_byte(row, at, blue);
            bits::set_byte(row, at + 1, green);
            bits::set_byte(row, at + 2, red);
            bits::set_byte(row, at + 3, alpha | alpha_mask);
        }
    }
}

/// 16-bit values are copied unchanged into a gray raster.
fn transfer_16(src: &PackedBuffer, dst: &mut Raster) {
    debug_assert_eq!(dst.format(), PixelFormat::Gray16);
    let width = src.width() as usize;
    for y in 0..src.height() {
        let line = src.line(y);
        let row = dst.row_mut(y);
        for x in 0..width {
            bits::set_u16(row, x, word::get_u16(line, x));
        }
    }
}

fn transfer_8(src: &PackedBuffer, dst: &mut Raster) {
    let width = src.width() as usize;
    for y in 0..src.height() {
        let line = src.line(y);
        let row = dst.row_mut(y);
        for x in 0..width {
            bits::set_byte(row, x, word::get_byte(line, x));
        }
    }
}

/// Mirrors the importer: whole bytes only under `Truncate`.
fn transfer_1(src: &PackedBuffer, dst: &mut Raster, mode: OneBitRowMode) {
    let width = src.width();
    let groups = mode.bytes_per_row(width);
    if mode == OneBitRowMode::Truncate && width % 8 != 0 {
        warn!(
            width,
            dropped_per_row = width % 8,
            "1 bpp transfer truncates trailing pixels of each row"
        );
    }
    for y in 0..src.height() {
        let line = src.line(y);
        let row = dst.row_mut(y);
        for x in 0..groups {
            bits::set_byte(row, x, word::get_byte(line, x));
        }
    }
}
