// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pixbridge.

use thiserror::Error;

use crate::types::PixelFormat;

/// Top-level error type for all Pixbridge operations.
///
/// Every variant is terminal for the conversion that produced it: no partial
/// destination buffer is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum PixbridgeError {
    // -- Format catalogue --
    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    #[error("pixel format {0} cannot be imported into a packed buffer")]
    UnsupportedSourceFormat(PixelFormat),

    #[error("packed depth {0} cannot be exported to a raster")]
    UnsupportedPackedDepth(u32),

    // -- Colormaps --
    #[error("colormap overflow: entry {index} does not fit a capacity of {capacity}")]
    ColormapOverflow { index: usize, capacity: usize },

    #[error("colormap synchronisation failed: {0}")]
    ColormapSyncFailed(#[source] Box<PixbridgeError>),

    // -- Buffers --
    #[error("buffer allocation failed: {0}")]
    AllocationFailed(String),

    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    #[error("invalid packed buffer: {0}")]
    InvalidBuffer(String),

    // -- Interop --
    #[error("image conversion failed: {0}")]
    ImageError(String),

    // -- Configuration --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PixbridgeError {
    /// Wrap a colormap failure raised while synchronising palettes.
    pub fn colormap_sync(inner: PixbridgeError) -> Self {
        Self::ColormapSyncFailed(Box::new(inner))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PixbridgeError>;
