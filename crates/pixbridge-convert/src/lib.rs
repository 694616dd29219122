// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pixbridge-convert: Pixel conversion engine between device rasters and
// word-packed image buffers.
//
// Provides bit-level accessors, the pixel format catalogue, colormap
// synchronisation, the raster importer and exporter, and interop with the
// `image` crate's `DynamicImage`.

pub mod bits;
pub mod catalog;
pub mod colormap;
pub mod dynamic;
pub mod export;
pub mod import;
pub mod packed;
pub mod raster;

// Re-export the primary structs so callers can use `pixbridge_convert::RasterImporter` etc.
pub use colormap::Colormap;
pub use export::RasterExporter;
pub use import::RasterImporter;
pub use packed::PackedBuffer;
pub use raster::Raster;

use pixbridge_core::config::ConvertConfig;
use pixbridge_core::error::Result;

/// One-call conversions in both directions sharing a single configuration.
///
/// ```ignore
/// let converter = PixConverter::default();
/// let packed = converter.to_packed(&raster)?;
/// // ... hand `packed` to the image-processing back end ...
/// let raster = converter.to_raster(&packed)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct PixConverter {
    importer: RasterImporter,
    exporter: RasterExporter,
}

impl PixConverter {
    pub fn new(config: ConvertConfig) -> Self {
        Self {
            importer: RasterImporter::new(config.clone()),
            exporter: RasterExporter::new(config),
        }
    }

    pub fn config(&self) -> &ConvertConfig {
        self.importer.config()
    }

    /// Raster to packed buffer.
    pub fn to_packed(&self, raster: &Raster) -> Result<PackedBuffer> {
        self.importer.import(raster)
    }

    /// Packed buffer to raster, keeping alpha only if the config asks for it.
    pub fn to_raster(&self, packed: &PackedBuffer) -> Result<Raster> {
        self.exporter.export_default(packed)
    }
}
