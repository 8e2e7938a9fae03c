// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — payload validation and capture preparation.

pub mod payload;
pub mod processor;

pub use payload::ImagePayload;
pub use processor::CaptureProcessor;
