// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encoded image payloads handed over by the capture layer.
//
// The capture layer sends `data:image/png;base64,...` (or jpeg) URLs. A
// payload is only accepted when the prefix is recognised, the base64 body
// decodes, and the bytes really are a bitmap of the declared encoding.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, ImageReader};
use sha2::{Digest, Sha256};
use tracing::debug;

use grauwerk_core::error::{GrauwerkError, Result};
use grauwerk_core::types::ImageEncoding;

/// A validated, encoded bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    encoding: ImageEncoding,
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl ImagePayload {
    /// Parse a `data:image/png;base64,` or `data:image/jpeg;base64,` URL.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let (encoding, body) = split_data_url(url).ok_or(GrauwerkError::InvalidImage)?;

        let cleaned: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = STANDARD.decode(cleaned).map_err(|e| {
            debug!(error = %e, "data URL body is not valid base64");
            GrauwerkError::InvalidImage
        })?;

        Self::checked(bytes, Some(encoding))
    }

    /// Accept raw PNG or JPEG bytes, sniffing the encoding from the header.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::checked(bytes, None)
    }

    /// Accept either a data URL or raw bytes, whichever the input looks like.
    pub fn from_input(input: &[u8]) -> Result<Self> {
        if input.starts_with(b"data:") {
            let url = std::str::from_utf8(input).map_err(|_| GrauwerkError::InvalidImage)?;
            Self::from_data_url(url.trim())
        } else {
            Self::from_bytes(input.to_vec())
        }
    }

    fn checked(bytes: Vec<u8>, declared: Option<ImageEncoding>) -> Result<Self> {
        let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|_| GrauwerkError::InvalidImage)?;

        let sniffed = match reader.format() {
            Some(ImageFormat::Png) => ImageEncoding::Png,
            Some(ImageFormat::Jpeg) => ImageEncoding::Jpeg,
            other => {
                debug!(format = ?other, "unsupported bitmap encoding");
                return Err(GrauwerkError::InvalidImage);
            }
        };

        if let Some(declared) = declared {
            if declared != sniffed {
                debug!(?declared, ?sniffed, "data URL prefix does not match image bytes");
                return Err(GrauwerkError::InvalidImage);
            }
        }

        let (width, height) = reader.into_dimensions().map_err(|e| {
            debug!(error = %e, "image header could not be read");
            GrauwerkError::InvalidImage
        })?;

        Ok(Self {
            encoding: sniffed,
            bytes,
            width,
            height,
        })
    }

    /// Build a payload from bytes this crate just encoded itself.
    pub(crate) fn encoded(encoding: ImageEncoding, bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            encoding,
            bytes,
            width,
            height,
        }
    }

    pub fn encoding(&self) -> ImageEncoding {
        self.encoding
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// SHA-256 hex digest of the encoded bytes, for log correlation.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }

    /// Re-encode as a data URL.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.encoding.mime_type(),
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Split a data URL into its encoding and base64 body. The prefix match is
/// case-sensitive, like the capture layer emits it.
fn split_data_url(url: &str) -> Option<(ImageEncoding, &str)> {
    let rest = url.strip_prefix("data:")?;
    let (header, body) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    Some((ImageEncoding::from_mime(mime)?, body))
}
