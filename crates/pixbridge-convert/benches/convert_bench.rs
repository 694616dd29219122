// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the pixbridge-convert crate. Times the 32 bpp
// import and export paths, which do per-pixel channel reordering, on a
// 256x256 synthetic gradient.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use pixbridge_convert::{RasterExporter, RasterImporter, Raster};
use pixbridge_core::PixelFormat;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn gradient_raster(width: u32, height: u32) -> Raster {
    let mut raster = Raster::new(width, height, PixelFormat::Argb32).expect("raster");
    for y in 0..height {
        let row = raster.row_mut(y);
        for x in 0..width as usize {
            let px = [x as u8, y as u8, (x ^ y as usize) as u8, 255];
            row[x * 4..x * 4 + 4].copy_from_slice(&px);
        }
    }
    raster
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_import_argb32(c: &mut Criterion) {
    let raster = gradient_raster(256, 256);
    let importer = RasterImporter::default();

    c.bench_function("import argb32 (256x256)", |b| {
        b.iter(|| black_box(importer.import(black_box(&raster)).expect("import")));
    });
}

fn bench_export_argb32(c: &mut Criterion) {
    let packed = RasterImporter::default()
        .import(&gradient_raster(256, 256))
        .expect("import");
    let exporter = RasterExporter::default();

    c.bench_function("export argb32 (256x256)", |b| {
        b.iter(|| black_box(exporter.export(black_box(&packed), false).expect("export")));
    });
}

criterion_group!(benches, bench_import_argb32, bench_export_argb32);
criterion_main!(benches);
