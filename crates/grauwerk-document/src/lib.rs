// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// grauwerk-document — Image handling for the Grauwerk print station.
//
// Decodes and validates the bitmaps handed over by the capture layer (data
// URLs or raw bytes) and prepares raw camera frames for monochrome printing
// (scale, flatten onto white, BT.601 grayscale, PNG encode).

pub mod image;

pub use image::payload::ImagePayload;
pub use image::processor::CaptureProcessor;
