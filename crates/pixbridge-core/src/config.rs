// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion configuration.

use serde::{Deserialize, Serialize};

use crate::error::{PixbridgeError, Result};

/// How many byte-groups of a 1 bpp scanline are transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneBitRowMode {
    /// `width / 8` bytes per row. Trailing pixels of a width that is not a
    /// multiple of 8 are left at zero in the destination.
    #[default]
    Truncate,
    /// `ceil(width / 8)` bytes per row, so every pixel is transferred.
    Complete,
}

impl OneBitRowMode {
    /// Number of whole bytes transferred for a row `width` pixels wide.
    pub const fn bytes_per_row(self, width: u32) -> usize {
        match self {
            Self::Truncate => (width / 8) as usize,
            Self::Complete => width.div_ceil(8) as usize,
        }
    }
}

/// Settings shared by the importer, the exporter and the converter facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Keep the packed buffer's alpha when exporting 32 bpp data. When false
    /// every exported pixel is fully opaque.
    pub include_alpha: bool,
    /// Byte-group policy for 1 bpp scanlines, in both directions.
    pub one_bit_rows: OneBitRowMode,
    /// Upper bound on destination pixels (width x height). `None` means no limit.
    pub max_pixels: Option<u64>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            include_alpha: false,
            one_bit_rows: OneBitRowMode::Truncate,
            max_pixels: None,
        }
    }
}

impl ConvertConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Serialise to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings that can never admit a conversion.
    pub fn validate(&self) -> Result<()> {
        if self.max_pixels == Some(0) {
            return Err(PixbridgeError::Config(
                "max_pixels must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Check a destination size against `max_pixels`.
    pub fn check_pixels(&self, width: u32, height: u32) -> Result<()> {
        let pixels = u64::from(width) * u64::from(height);
        match self.max_pixels {
            Some(max) if pixels > max => Err(PixbridgeError::AllocationFailed(format!(
                "{width}x{height} exceeds the limit of {max} pixels"
            ))),
            _ => Ok(()),
        }
    }
}
