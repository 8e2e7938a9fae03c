// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture processor — turns a raw camera frame into the bitmap that gets
// printed: scaled down, flattened onto white, converted to BT.601 luma, and
// encoded as PNG.

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use grauwerk_core::error::GrauwerkError;
use grauwerk_core::types::ImageEncoding;
use tracing::{debug, info, instrument};

use super::payload::ImagePayload;

/// BT.601 luma weights (red, green, blue).
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Capture preparation pipeline operating on a single in-memory frame.
///
/// Each method consumes `self` and returns the transformed processor, so the
/// steps chain:
///
/// ```ignore
/// let payload = CaptureProcessor::from_bytes(&frame)?
///     .scale(0.35)
///     .flatten_on_white()
///     .grayscale()
///     .to_png_payload()?;
/// ```
pub struct CaptureProcessor {
    image: DynamicImage,
}

impl CaptureProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load a frame from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, GrauwerkError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            GrauwerkError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Frame loaded");
        Ok(Self { image: img })
    }

    /// Decode a frame from encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, GrauwerkError> {
        let img = image::load_from_memory(data).map_err(|err| {
            GrauwerkError::ImageError(format!("failed to decode frame: {}", err))
        })?;
        debug!(width = img.width(), height = img.height(), "Frame decoded");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded frame.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations --------------------------------------------------------

    /// Scale both dimensions by `factor`, rounding and never going below one
    /// pixel.
    #[instrument(skip(self), fields(factor))]
    pub fn scale(self, factor: f32) -> Self {
        let (w, h) = scaled_dimensions(self.image.width(), self.image.height(), factor);
        debug!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            to_w = w,
            to_h = h,
            "Scaling frame"
        );
        Self {
            image: self
                .image
                .resize_exact(w, h, image::imageops::FilterType::Triangle),
        }
    }

    /// Composite the frame over an opaque white background. Transparent
    /// regions would otherwise print with a tint on some drivers.
    pub fn flatten_on_white(self) -> Self {
        let rgba = self.image.to_rgba8();
        let flat = image::ImageBuffer::from_fn(rgba.width(), rgba.height(), |x, y| {
            let image::Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
            let alpha = a as f32 / 255.0;
            let over = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
            image::Rgb([over(r), over(g), over(b)])
        });
        Self {
            image: DynamicImage::ImageRgb8(flat),
        }
    }

    /// Convert to 8-bit luma with BT.601 weights. The result has no alpha
    /// channel, so it is always opaque.
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        let rgb = self.image.to_rgb8();
        let gray = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
            let image::Rgb([r, g, b]) = *rgb.get_pixel(x, y);
            Luma([luma(r, g, b)])
        });
        Self {
            image: DynamicImage::ImageLuma8(gray),
        }
    }

    /// The full kiosk preparation: scale, flatten, grayscale.
    pub fn prepare(self, factor: f32) -> Self {
        self.scale(factor).flatten_on_white().grayscale()
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current frame as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, GrauwerkError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| GrauwerkError::ImageError(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Encode as PNG and wrap as a ready-to-print payload.
    pub fn to_png_payload(&self) -> Result<ImagePayload, GrauwerkError> {
        let bytes = self.to_png_bytes()?;
        Ok(ImagePayload::encoded(
            ImageEncoding::Png,
            bytes,
            self.image.width(),
            self.image.height(),
        ))
    }

    /// Encode as PNG and return a `data:image/png;base64,` URL.
    pub fn to_png_data_url(&self) -> Result<String, GrauwerkError> {
        Ok(self.to_png_payload()?.to_data_url())
    }
}

fn scaled_dimensions(width: u32, height: u32, factor: f32) -> (u32, u32) {
    let scale = |v: u32| ((v as f32 * factor).round() as u32).max(1);
    (scale(width), scale(height))
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let [wr, wg, wb] = LUMA_WEIGHTS;
    (wr * r as f32 + wg * g as f32 + wb * b as f32)
        .round()
        .clamp(0.0, 255.0) as u8
}
