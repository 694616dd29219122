// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Pixbridge: the closed raster pixel format set and the
// RGBA colour value shared by palettes and colormaps.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PixbridgeError;

/// Pixel layout of a device raster.
///
/// This is a closed set. Multi-byte formats store their channels in
/// little-endian device order (blue first for the colour formats).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// 1 bit per pixel, palette indexed, first pixel in the high bit.
    Indexed1,
    /// 4 bits per pixel, palette indexed, first pixel in the high nibble.
    Indexed4,
    /// 8 bits per pixel, palette indexed.
    Indexed8,
    /// 16-bit `x RRRRR GGGGG BBBBB`.
    Rgb555,
    /// 16-bit `RRRRR GGGGGG BBBBB`.
    Rgb565,
    /// 16-bit `A RRRRR GGGGG BBBBB` with a single alpha bit.
    Argb1555,
    /// 16-bit luminance.
    Gray16,
    /// 24-bit B, G, R.
    Rgb24,
    /// 32-bit B, G, R with an unused fourth byte.
    Rgb32,
    /// 32-bit B, G, R, A with straight alpha.
    Argb32,
    /// 32-bit B, G, R, A with premultiplied alpha.
    PArgb32,
    /// 48-bit B, G, R at 16 bits per channel.
    Rgb48,
    /// 64-bit B, G, R, A at 16 bits per channel.
    Argb64,
    /// 64-bit B, G, R, A at 16 bits per channel, premultiplied.
    PArgb64,
}

impl PixelFormat {
    /// Every supported format, in catalogue order.
    pub const ALL: [PixelFormat; 14] = [
        Self::Indexed1,
        Self::Indexed4,
        Self::Indexed8,
        Self::Rgb555,
        Self::Rgb565,
        Self::Argb1555,
        Self::Gray16,
        Self::Rgb24,
        Self::Rgb32,
        Self::Argb32,
        Self::PArgb32,
        Self::Rgb48,
        Self::Argb64,
        Self::PArgb64,
    ];

    /// Bits occupied by one pixel in a raster scanline.
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            Self::Indexed1 => 1,
            Self::Indexed4 => 4,
            Self::Indexed8 => 8,
            Self::Rgb555 | Self::Rgb565 | Self::Argb1555 | Self::Gray16 => 16,
            Self::Rgb24 => 24,
            Self::Rgb32 | Self::Argb32 | Self::PArgb32 => 32,
            Self::Rgb48 => 48,
            Self::Argb64 | Self::PArgb64 => 64,
        }
    }

    /// Whether pixel values are palette indices.
    pub const fn is_indexed(self) -> bool {
        matches!(self, Self::Indexed1 | Self::Indexed4 | Self::Indexed8)
    }

    /// Whether the format carries an alpha channel.
    pub const fn has_alpha(self) -> bool {
        matches!(
            self,
            Self::Argb1555 | Self::Argb32 | Self::PArgb32 | Self::Argb64 | Self::PArgb64
        )
    }

    /// Largest palette an indexed raster of this format may carry, or `None`
    /// for direct-colour formats.
    pub const fn max_palette_len(self) -> Option<usize> {
        if self.is_indexed() {
            Some(1usize << self.bits_per_pixel())
        } else {
            None
        }
    }

    /// Canonical lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Indexed1 => "indexed1",
            Self::Indexed4 => "indexed4",
            Self::Indexed8 => "indexed8",
            Self::Rgb555 => "rgb555",
            Self::Rgb565 => "rgb565",
            Self::Argb1555 => "argb1555",
            Self::Gray16 => "gray16",
            Self::Rgb24 => "rgb24",
            Self::Rgb32 => "rgb32",
            Self::Argb32 => "argb32",
            Self::PArgb32 => "pargb32",
            Self::Rgb48 => "rgb48",
            Self::Argb64 => "argb64",
            Self::PArgb64 => "pargb64",
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = PixbridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.name() == wanted)
            .ok_or_else(|| PixbridgeError::UnsupportedFormat(s.to_string()))
    }
}

/// An 8-bit-per-channel colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Fully opaque colour.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 255)
    }

    /// Gray level replicated across the three colour channels.
    pub const fn gray(level: u8) -> Self {
        Self::rgb(level, level, level)
    }

    /// Decode a word laid out as `0xRRGGBBAA`.
    pub const fn from_rgba(value: u32) -> Self {
        Self::new(
            (value >> 24) as u8,
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        )
    }

    /// Decode a word laid out as `0xRRGGBBxx`, forcing the colour opaque.
    pub const fn from_rgb(value: u32) -> Self {
        Self::rgb((value >> 24) as u8, (value >> 16) as u8, (value >> 8) as u8)
    }

    /// Encode as `0xRRGGBBAA`.
    pub const fn to_rgba(self) -> u32 {
        ((self.red as u32) << 24)
            | ((self.green as u32) << 16)
            | ((self.blue as u32) << 8)
            | self.alpha as u32
    }

    /// Same colour with alpha replaced.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self::new(self.red, self.green, self.blue, alpha)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Color(0x{:08X})", self.to_rgba())
    }
}
