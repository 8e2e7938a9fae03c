// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// A validated request to print one capture.

use grauwerk_core::error::{GrauwerkError, Result};
use grauwerk_core::types::RequestId;
use grauwerk_document::ImagePayload;

/// One capture on its way to a printer. Lives for a single print attempt.
#[derive(Debug, Clone)]
pub struct PrintRequest {
    pub id: RequestId,
    pub device: String,
    pub payload: ImagePayload,
    pub job_title: Option<String>,
}

impl PrintRequest {
    /// Build a request from an already-validated payload. Only the device
    /// name is checked.
    pub fn new(device: &str, payload: ImagePayload, job_title: Option<&str>) -> Result<Self> {
        let device = require_device(device)?;
        Ok(Self {
            id: RequestId::new(),
            device,
            payload,
            job_title: normalize_title(job_title),
        })
    }

    /// Build a request from a `data:image/...;base64,` URL, as the capture
    /// layer sends it. The device is checked before the image.
    pub fn from_data_url(device: &str, data_url: &str, job_title: Option<&str>) -> Result<Self> {
        let device = require_device(device)?;
        let payload = ImagePayload::from_data_url(data_url)?;
        Ok(Self {
            id: RequestId::new(),
            device,
            payload,
            job_title: normalize_title(job_title),
        })
    }
}

fn require_device(device: &str) -> Result<String> {
    let device = device.trim();
    if device.is_empty() {
        return Err(GrauwerkError::NoPrinterSelected);
    }
    Ok(device.to_owned())
}

fn normalize_title(title: Option<&str>) -> Option<String> {
    title.map(str::trim).filter(|t| !t.is_empty()).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_device_wins_over_bad_image() {
        let err = PrintRequest::from_data_url("  ", "not an image", None).unwrap_err();
        assert!(matches!(err, GrauwerkError::NoPrinterSelected));
    }

    #[test]
    fn bad_image_is_rejected() {
        let err = PrintRequest::from_data_url("Office", "data:text/plain;base64,aGk=", None).unwrap_err();
        assert!(matches!(err, GrauwerkError::InvalidImage));
        assert_eq!(err.to_string(), "Invalid image data URL");
    }

    #[test]
    fn blank_title_becomes_none() {
        assert_eq!(normalize_title(Some("   ")), None);
        assert_eq!(normalize_title(Some(" Booth ")).as_deref(), Some("Booth"));
    }
}
