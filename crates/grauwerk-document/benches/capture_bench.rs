// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for capture preparation in the grauwerk-document crate.
// A 1280x720 frame is the webcam size the kiosk requests.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgba, RgbaImage};

use grauwerk_document::CaptureProcessor;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark the full scale → flatten → grayscale → PNG pipeline on a
/// synthetic gradient frame.
fn bench_prepare_capture(c: &mut Criterion) {
    let (width, height) = (1280u32, 720u32);
    let frame = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    let dynamic = DynamicImage::ImageRgba8(frame);

    c.bench_function("prepare_capture (1280x720 @ 0.35)", |b| {
        b.iter(|| {
            let payload = CaptureProcessor::from_dynamic(black_box(dynamic.clone()))
                .prepare(0.35)
                .to_png_payload()
                .expect("encode");
            black_box(payload);
        });
    });
}

criterion_group!(benches, bench_prepare_capture);
criterion_main!(benches);
