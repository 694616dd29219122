// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interop with the `image` crate: builds rasters from decoded `DynamicImage`s
// and turns rasters of any catalogue format back into them.

use image::{DynamicImage, ImageBuffer, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use pixbridge_core::error::{PixbridgeError, Result};
use pixbridge_core::types::{Color, PixelFormat};
use tracing::{debug, instrument};

use crate::bits;
use crate::colormap::gray_ramp;
use crate::raster::Raster;

/// Build a raster from a decoded image.
///
/// Gray images become 8 bpp indexed rasters with a 256-level gray palette,
/// RGB images 24 bpp, RGBA images 32 bpp ARGB. Every other layout goes
/// through 8-bit RGBA first.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn raster_from_dynamic(image: &DynamicImage) -> Result<Raster> {
    let raster = match image {
        DynamicImage::ImageLuma8(gray) => {
            let mut raster = Raster::new(gray.width(), gray.height(), PixelFormat::Indexed8)?;
            raster.set_palette(gray_ramp(256).collect())?;
            for (y, src) in gray.rows().enumerate() {
                let row = raster.row_mut(y as u32);
                for (x, Luma([level])) in src.enumerate() {
                    bits::set_byte(row, x, *level);
                }
            }
            raster
        }
        DynamicImage::ImageRgb8(rgb) => {
            let mut raster = Raster::new(rgb.width(), rgb.height(), PixelFormat::Rgb24)?;
            for (y, src) in rgb.rows().enumerate() {
                let row = raster.row_mut(y as u32);
                for (x, Rgb([red, green, blue])) in src.enumerate() {
                    row[x * 3..x * 3 + 3].copy_from_slice(&[*blue, *green, *red]);
                }
            }
            raster
        }
        DynamicImage::ImageRgba8(rgba) => rgba_to_raster(rgba)?,
        other => {
            debug!(color = ?other.color(), "Flattening to RGBA8 before conversion");
            rgba_to_raster(&other.to_rgba8())?
        }
    };
    Ok(raster)
}

fn rgba_to_raster(rgba: &RgbaImage) -> Result<Raster> {
    let mut raster = Raster::new(rgba.width(), rgba.height(), PixelFormat::Argb32)?;
    for (y, src) in rgba.rows().enumerate() {
        let row = raster.row_mut(y as u32);
        for (x, Rgba([red, green, blue, alpha])) in src.enumerate() {
            row[x * 4..x * 4 + 4].copy_from_slice(&[*blue, *green, *red, *alpha]);
        }
    }
    Ok(raster)
}

/// Render a raster as a decoded image.
///
/// Indexed pixels are resolved through the palette (a gray ramp when the
/// raster has none). Compact 16-bit colour is expanded to 8 bits per channel.
/// Premultiplied formats are converted back to straight alpha.
#[instrument(skip_all, fields(
    width = raster.width(),
    height = raster.height(),
    format = %raster.format(),
))]
pub fn raster_to_dynamic(raster: &Raster) -> Result<DynamicImage> {
    let (width, height) = (raster.width(), raster.height());
    let image = match raster.format() {
        PixelFormat::Indexed1 | PixelFormat::Indexed4 | PixelFormat::Indexed8 => {
            DynamicImage::ImageRgba8(indexed_to_rgba(raster)?)
        }
        format @ (PixelFormat::Rgb555 | PixelFormat::Rgb565 | PixelFormat::Argb1555) => {
            let decode: fn(u16) -> u32 = match format {
                PixelFormat::Rgb555 => bits::rgb555_to_rgba,
                PixelFormat::Rgb565 => bits::rgb565_to_rgba,
                _ => bits::argb1555_to_rgba,
            };
            DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
                let color = Color::from_rgba(decode(bits::get_u16(raster.row(y), x as usize)));
                Rgba([color.red, color.green, color.blue, color.alpha])
            }))
        }
        PixelFormat::Gray16 => {
            let gray: ImageBuffer<Luma<u16>, Vec<u16>> =
                ImageBuffer::from_fn(width, height, |x, y| {
                    Luma([bits::get_u16(raster.row(y), x as usize)])
                });
            DynamicImage::ImageLuma16(gray)
        }
        format @ (PixelFormat::Rgb24 | PixelFormat::Rgb32) => {
            let step = format.bits_per_pixel() as usize / 8;
            DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
                let at = x as usize * step;
                let row = raster.row(y);
                Rgb([row[at + 2], row[at + 1], row[at]])
            }))
        }
        format @ (PixelFormat::Argb32 | PixelFormat::PArgb32) => {
            let premultiplied = format == PixelFormat::PArgb32;
            DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
                let at = x as usize * 4;
                let row = raster.row(y);
                let alpha = row[at + 3];
                let [blue, green, red] = [row[at], row[at + 1], row[at + 2]].map(|channel| {
                    if premultiplied {
                        unpremultiply(channel.into(), alpha.into(), 255) as u8
                    } else {
                        channel
                    }
                });
                Rgba([red, green, blue, alpha])
            }))
        }
        PixelFormat::Rgb48 => {
            let rgb: ImageBuffer<Rgb<u16>, Vec<u16>> =
                ImageBuffer::from_fn(width, height, |x, y| {
                    let row = raster.row(y);
                    let at = x as usize * 3;
                    Rgb([
                        bits::get_u16(row, at + 2),
                        bits::get_u16(row, at + 1),
                        bits::get_u16(row, at),
                    ])
                });
            DynamicImage::ImageRgb16(rgb)
        }
        format @ (PixelFormat::Argb64 | PixelFormat::PArgb64) => {
            let premultiplied = format == PixelFormat::PArgb64;
            let rgba: ImageBuffer<Rgba<u16>, Vec<u16>> =
                ImageBuffer::from_fn(width, height, |x, y| {
                    let row = raster.row(y);
                    let at = x as usize * 4;
                    let alpha = bits::get_u16(row, at + 3);
                    let [blue, green, red] = [at, at + 1, at + 2].map(|i| {
                        let channel = bits::get_u16(row, i);
                        if premultiplied {
                            unpremultiply(channel.into(), alpha.into(), 65535) as u16
                        } else {
                            channel
                        }
                    });
                    Rgba([red, green, blue, alpha])
                });
            DynamicImage::ImageRgba16(rgba)
        }
    };
    Ok(image)
}

fn indexed_to_rgba(raster: &Raster) -> Result<RgbaImage> {
    let format = raster.format();
    let ramp: Vec<Color>;
    let palette = match raster.palette() {
        Some(palette) => palette,
        None => {
            ramp = gray_ramp(format.max_palette_len().unwrap_or(256)).collect();
            ramp.as_slice()
        }
    };
    let mut image = RgbaImage::new(raster.width(), raster.height());
    for y in 0..raster.height() {
        let row = raster.row(y);
        for x in 0..raster.width() {
            let index = match format {
                PixelFormat::Indexed1 => bits::get_bit(row, x as usize),
                PixelFormat::Indexed4 => bits::get_qbit(row, x as usize),
                _ => bits::get_byte(row, x as usize),
            };
            let color = palette.get(usize::from(index)).ok_or_else(|| {
                PixbridgeError::ImageError(format!(
                    "pixel ({x}, {y}) uses index {index} of a {}-entry palette",
                    palette.len()
                ))
            })?;
            image.put_pixel(x, y, Rgba([color.red, color.green, color.blue, color.alpha]));
        }
    }
    Ok(image)
}

/// `channel * max / alpha`, rounded and clamped; zero alpha yields zero.
fn unpremultiply(channel: u32, alpha: u32, max: u32) -> u32 {
    if alpha == 0 {
        return 0;
    }
    ((channel * max + alpha / 2) / alpha).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    /// Gray images arrive as indexed rasters whose palette is the identity ramp.
    #[test]
    fn luma8_becomes_indexed8() {
        let gray = GrayImage::from_fn(3, 2, |x, y| Luma([(x * 10 + y) as u8]));
        let raster = raster_from_dynamic(&DynamicImage::ImageLuma8(gray)).unwrap();
        assert_eq!(raster.format(), PixelFormat::Indexed8);
        assert_eq!(&raster.row(1)[..3], &[1, 11, 21]);
        assert_eq!(raster.palette().map(<[Color]>::len), Some(256));
    }

    #[test]
    fn rgb8_is_stored_bgr() {
        let rgb = RgbImage::from_pixel(1, 1, Rgb([1, 2, 3]));
        let raster = raster_from_dynamic(&DynamicImage::ImageRgb8(rgb)).unwrap();
        assert_eq!(raster.format(), PixelFormat::Rgb24);
        assert_eq!(&raster.row(0)[..3], &[3, 2, 1]);
    }

    /// Layouts without a direct mapping are flattened to ARGB.
    #[test]
    fn other_layouts_flatten_to_argb() {
        let rgb16: ImageBuffer<Rgb<u16>, Vec<u16>> =
            ImageBuffer::from_pixel(2, 2, Rgb([65535, 0, 32896]));
        let raster = raster_from_dynamic(&DynamicImage::ImageRgb16(rgb16)).unwrap();
        assert_eq!(raster.format(), PixelFormat::Argb32);
        assert_eq!(&raster.row(0)[..4], &[128, 0, 255, 255]);
    }

    #[test]
    fn rgba_round_trips_through_raster() {
        let rgba = RgbaImage::from_fn(4, 3, |x, y| Rgba([x as u8, y as u8, 7, 200]));
        let raster = raster_from_dynamic(&DynamicImage::ImageRgba8(rgba.clone())).unwrap();
        let back = raster_to_dynamic(&raster).unwrap();
        assert_eq!(back.as_rgba8(), Some(&rgba));
    }

    #[test]
    fn indexed1_resolves_palette() {
        let mut raster = Raster::new(3, 1, PixelFormat::Indexed1).unwrap();
        raster
            .set_palette(vec![Color::rgb(10, 10, 10), Color::rgb(250, 0, 0)])
            .unwrap();
        raster.row_mut(0)[0] = 0b1010_0000;
        let image = raster_to_dynamic(&raster).unwrap().to_rgba8();
        assert_eq!(image.get_pixel(0, 0), &Rgba([250, 0, 0, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([10, 10, 10, 255]));
        assert_eq!(image.get_pixel(2, 0), &Rgba([250, 0, 0, 255]));
    }

    #[test]
    fn indexed4_without_palette_uses_ramp() {
        let mut raster = Raster::new(2, 1, PixelFormat::Indexed4).unwrap();
        raster.row_mut(0)[0] = 0x0F;
        let image = raster_to_dynamic(&raster).unwrap().to_rgba8();
        assert_eq!(image.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([255, 255, 255, 255]));
    }

    /// An index past the end of a short palette is reported, not guessed.
    #[test]
    fn index_outside_palette_is_an_error() {
        let mut raster = Raster::new(1, 1, PixelFormat::Indexed8).unwrap();
        raster.set_palette(vec![Color::BLACK]).unwrap();
        raster.row_mut(0)[0] = 5;
        assert!(matches!(
            raster_to_dynamic(&raster),
            Err(PixbridgeError::ImageError(_))
        ));
    }

    #[test]
    fn rgb565_is_expanded() {
        let mut raster = Raster::new(2, 1, PixelFormat::Rgb565).unwrap();
        bits::set_u16(raster.row_mut(0), 0, 0xF800);
        bits::set_u16(raster.row_mut(0), 1, 0x07E0);
        let image = raster_to_dynamic(&raster).unwrap().to_rgba8();
        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn argb1555_alpha_bit() {
        let mut raster = Raster::new(2, 1, PixelFormat::Argb1555).unwrap();
        bits::set_u16(raster.row_mut(0), 0, 0x801F);
        bits::set_u16(raster.row_mut(0), 1, 0x001F);
        let image = raster_to_dynamic(&raster).unwrap().to_rgba8();
        assert_eq!(image.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([0, 0, 255, 0]));
    }

    #[test]
    fn gray16_keeps_full_precision() {
        let mut raster = Raster::new(1, 1, PixelFormat::Gray16).unwrap();
        bits::set_u16(raster.row_mut(0), 0, 0x1234);
        let image = raster_to_dynamic(&raster).unwrap();
        assert_eq!(image.as_luma16().map(|g| g.get_pixel(0, 0).0), Some([0x1234]));
    }

    #[test]
    fn rgb48_channel_order() {
        let mut raster = Raster::new(1, 1, PixelFormat::Rgb48).unwrap();
        for (i, value) in [0x0003u16, 0x0002, 0x0001].into_iter().enumerate() {
            bits::set_u16(raster.row_mut(0), i, value);
        }
        let image = raster_to_dynamic(&raster).unwrap();
        assert_eq!(image.as_rgb16().map(|g| g.get_pixel(0, 0).0), Some([1, 2, 3]));
    }

    /// Premultiplied channels are divided back out by alpha.
    #[test]
    fn pargb32_is_unpremultiplied() {
        let mut raster = Raster::new(1, 1, PixelFormat::PArgb32).unwrap();
        raster.row_mut(0)[..4].copy_from_slice(&[0, 64, 128, 128]);
        let image = raster_to_dynamic(&raster).unwrap().to_rgba8();
        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 128, 0, 128]));
    }

    #[test]
    fn argb64_keeps_straight_alpha() {
        let mut raster = Raster::new(1, 1, PixelFormat::Argb64).unwrap();
        for (i, value) in [10u16, 20, 30, 40].into_iter().enumerate() {
            bits::set_u16(raster.row_mut(0), i, value);
        }
        let image = raster_to_dynamic(&raster).unwrap();
        assert_eq!(
            image.as_rgba16().map(|g| g.get_pixel(0, 0).0),
            Some([30, 20, 10, 40])
        );
    }
}
