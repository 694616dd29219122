// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster importer: converts a device raster into a packed buffer.

use pixbridge_core::config::{ConvertConfig, OneBitRowMode};
use pixbridge_core::error::{PixbridgeError, Result};
use pixbridge_core::types::PixelFormat;
use tracing::{debug, info, instrument, warn};

use crate::bits::{self, word};
use crate::catalog::packed_depth_for;
use crate::colormap::import_palette;
use crate::packed::PackedBuffer;
use crate::raster::Raster;

/// Raster to packed-buffer converter.
///
/// The destination is built locally and only returned once every scanline
/// has been transferred, so a failed import never yields a partial buffer.
#[derive(Debug, Clone, Default)]
pub struct RasterImporter {
    config: ConvertConfig,
}

impl RasterImporter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert `raster` into a freshly allocated packed buffer.
    ///
    /// Indexed rasters bring their palette along as the buffer's colormap.
    #[instrument(skip_all, fields(
        width = raster.width(),
        height = raster.height(),
        format = %raster.format(),
    ))]
    pub fn import(&self, raster: &Raster) -> Result<PackedBuffer> {
        let depth = packed_depth_for(raster.format())?;
        self.config.check_pixels(raster.width(), raster.height())?;
        debug!(depth, "Importing raster");

        let mut packed = PackedBuffer::new(raster.width(), raster.height(), depth)?;

        if raster.format().is_indexed() {
            match raster.palette() {
                Some(palette) => {
                    let cmap =
                        import_palette(palette, depth).map_err(PixbridgeError::colormap_sync)?;
                    packed.set_colormap(cmap)?;
                }
                None => warn!("Indexed raster has no palette; no colormap attached"),
            }
        }

        match raster.format() {
            PixelFormat::Argb32 => transfer_argb32(raster, &mut packed),
            PixelFormat::Rgb24 => transfer_rgb24(raster, &mut packed),
            PixelFormat::Indexed8 => transfer_indexed8(raster, &mut packed),
            PixelFormat::Indexed1 => {
                transfer_indexed1(raster, &mut packed, self.config.one_bit_rows)
            }
            other => return Err(PixbridgeError::UnsupportedSourceFormat(other)),
        }

        info!(
            depth,
            words_per_line = packed.words_per_line(),
            colormap_entries = packed.colormap().map_or(0, |cmap| cmap.len()),
            "Raster imported"
        );
        Ok(packed)
    }
}

/// B, G, R, A bytes become one `0xRRGGBBAA` word.
fn transfer_argb32(src: &Raster, dst: &mut PackedBuffer) {
    let width = src.width() as usize;
    for y in 0..src.height() {
        let row = src.row(y);
        let line = dst.line_mut(y);
        for x in 0..width {
            let at = x * 4;
            let blue = bits::get_byte(row, at);
            let green = bits::get_byte(row, at + 1);
            let red = bits::get_byte(row, at + 2);
            let alpha = bits::get_byte(row, at + 3);
            word::set_u32(line, x, bits::encode_rgba(red, green, blue, alpha));
        }
    }
}

/// B, G, R bytes become an opaque `0xRRGGBBFF` word.
fn transfer_rgb24(src: &Raster, dst: &mut PackedBuffer) {
    let width = src.width() as usize;
    for y in 0..src.height() {
        let row = src.row(y);
        let line = dst.line_mut(y);
        for x in 0..width {
            let at = x * 3;
            let blue = bits::get_byte(row, at);
            let green = bits::get_byte(row, at + 1);
            let red = bits::get_byte(row, at + 2);
            word::set_u32(line, x, bits::encode_rgba(red, green, blue, 0xFF));
        }
    }
}

fn transfer_indexed8(src: &Raster, dst: &mut PackedBuffer) {
    let width = src.width() as usize;
    for y in 0..src.height() {
        let row = src.row(y);
        let line = dst.line_mut(y);
        for x in 0..width {
            word::set_byte(line, x, bits::get_byte(row, x));
        }
    }
}

/// Copies whole bytes of eight pixels. Under `Truncate` the trailing partial
/// byte of each row is not copied.
fn transfer_indexed1(src: &Raster, dst: &mut PackedBuffer, mode: OneBitRowMode) {
    let width = src.width();
    let groups = mode.bytes_per_row(width);
    let tail_bits = width % 8;
    if mode == OneBitRowMode::Truncate && tail_bits != 0 {
        warn!(
            width,
            dropped_per_row = tail_bits,
            "1 bpp transfer truncates trailing pixels of each row"
        );
    }
    for y in 0..src.height() {
        let row = src.row(y);
        let line = dst.line_mut(y);
        for x in 0..groups {
            word::set_byte(line, x, bits::get_byte(row, x));
        }
        if mode == OneBitRowMode::Complete && tail_bits != 0 {
            let last = groups - 1;
            let kept = word::get_byte(line, last) & (0xFF << (8 - tail_bits));
            word::set_byte(line, last, kept);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixbridge_core::types::Color;

    fn argb_raster(pixels: &[(u8, u8, u8, u8)], width: u32, height: u32) -> Raster {
        let mut raster = Raster::new(width, height, PixelFormat::Argb32).unwrap();
        for y in 0..height {
            let row = raster.row_mut(y);
            for x in 0..width as usize {
                let (r, g, b, a) = pixels[y as usize * width as usize + x];
                row[x * 4..x * 4 + 4].copy_from_slice(&[b, g, r, a]);
            }
        }
        raster
    }

    /// A 2x2 ARGB raster packs each pixel as `0xRRGGBBAA`.
    #[test]
    fn argb32_scenario() {
        let raster = argb_raster(
            &[
                (255, 0, 0, 255),
                (0, 255, 0, 255),
                (0, 0, 255, 255),
                (255, 255, 255, 0),
            ],
            2,
            2,
        );
        let packed = RasterImporter::default().import(&raster).unwrap();
        assert_eq!(packed.depth(), 32);
        assert_eq!(
            packed.data(),
            &[0xFF00_00FF, 0x00FF_00FF, 0x0000_FFFF, 0xFFFF_FF00]
        );
        assert!(packed.colormap().is_none());
    }

    /// 24 bpp pixels are forced opaque.
    #[test]
    fn rgb24_forces_alpha() {
        let mut raster = Raster::new(2, 1, PixelFormat::Rgb24).unwrap();
        raster.row_mut(0)[..6].copy_from_slice(&[0x30, 0x20, 0x10, 0x03, 0x02, 0x01]);
        let packed = RasterImporter::default().import(&raster).unwrap();
        assert_eq!(packed.data(), &[0x1020_30FF, 0x0102_03FF]);
    }

    /// Padding bytes between rows are skipped.
    #[test]
    fn rgb24_honours_stride() {
        let data = vec![
            1, 2, 3, 0xEE, 0xEE, 0xEE, 0xEE, 0xEE, //
            4, 5, 6, 0xEE, 0xEE, 0xEE, 0xEE, 0xEE,
        ];
        let raster = Raster::from_parts(1, 2, PixelFormat::Rgb24, 8, data, None).unwrap();
        let packed = RasterImporter::default().import(&raster).unwrap();
        assert_eq!(packed.data(), &[0x0302_01FF, 0x0605_04FF]);
    }

    /// An 8 bpp indexed raster keeps its indices and its three-entry palette.
    #[test]
    fn indexed8_with_palette() {
        let palette = vec![Color::rgb(255, 0, 0), Color::rgb(0, 255, 0), Color::rgb(0, 0, 255)];
        let data = vec![0, 1, 2, 1, 0, 0, 0, 0, 2, 2, 0, 1, 0, 0, 0, 0];
        let raster =
            Raster::from_parts(4, 2, PixelFormat::Indexed8, 8, data, Some(palette.clone()))
                .unwrap();
        let packed = RasterImporter::default().import(&raster).unwrap();

        assert_eq!(packed.depth(), 8);
        assert_eq!(packed.data(), &[0x0001_0201, 0x0202_0001]);
        let cmap = packed.colormap().expect("colormap attached");
        assert_eq!(cmap.len(), 3);
        assert_eq!(cmap.as_slice(), palette.as_slice());
    }

    #[test]
    fn indexed_without_palette_has_no_colormap() {
        let raster = Raster::new(4, 1, PixelFormat::Indexed8).unwrap();
        let packed = RasterImporter::default().import(&raster).unwrap();
        assert!(packed.colormap().is_none());
    }

    /// With the default mode a 12-pixel row only transfers its first byte.
    #[test]
    fn indexed1_truncates_partial_byte() {
        let mut raster = Raster::new(12, 1, PixelFormat::Indexed1).unwrap();
        raster.set_palette(vec![Color::BLACK, Color::WHITE]).unwrap();
        raster.row_mut(0)[..2].copy_from_slice(&[0b1010_0101, 0b1111_0000]);

        let packed = RasterImporter::default().import(&raster).unwrap();
        assert_eq!(packed.depth(), 1);
        assert_eq!(packed.data(), &[0xA500_0000]);
        assert_eq!(packed.colormap().map(|c| c.len()), Some(2));
    }

    /// The complete mode keeps trailing pixels and clears padding bits.
    #[test]
    fn indexed1_complete_mode() {
        let mut raster = Raster::new(12, 1, PixelFormat::Indexed1).unwrap();
        raster.row_mut(0)[..2].copy_from_slice(&[0b1010_0101, 0b1111_1111]);
        let importer = RasterImporter::new(ConvertConfig {
            one_bit_rows: OneBitRowMode::Complete,
            ..ConvertConfig::default()
        });

        let packed = importer.import(&raster).unwrap();
        assert_eq!(packed.data(), &[0xA5F0_0000]);
        for x in 0..12 {
            assert_eq!(word::get_bit(packed.line(0), x), bits::get_bit(raster.row(0), x));
        }
    }

    #[test]
    fn unsupported_sources_are_refused() {
        for format in [PixelFormat::Rgb565, PixelFormat::Gray16, PixelFormat::Rgb48] {
            let raster = Raster::new(2, 2, format).unwrap();
            let err = RasterImporter::default().import(&raster).unwrap_err();
            assert!(matches!(err, PixbridgeError::UnsupportedSourceFormat(f) if f == format));
        }
    }

    /// Oversized destinations fail before any allocation.
    #[test]
    fn pixel_limit_fails_allocation() {
        let raster = Raster::new(20, 20, PixelFormat::Argb32).unwrap();
        let importer = RasterImporter::new(ConvertConfig {
            max_pixels: Some(399),
            ..ConvertConfig::default()
        });
        assert!(matches!(
            importer.import(&raster),
            Err(PixbridgeError::AllocationFailed(_))
        ));
    }
}
