// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub backend for platforms without a command-line print path.
//
// Every operation returns `PlatformUnavailable`; the dispatcher checks
// `is_available` first and never spools a file here.

use grauwerk_core::error::{GrauwerkError, Result};
use grauwerk_core::types::PrinterInfo;

use super::{PrintBackend, Submission};

/// Backend returned on non-unix platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedBackend;

impl PrintBackend for UnsupportedBackend {
    fn name(&self) -> &str {
        "unsupported"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn probe(&self, _device: &str) -> Result<String> {
        tracing::warn!("PrintBackend::probe called on unsupported platform");
        Err(GrauwerkError::PlatformUnavailable)
    }

    async fn submit(&self, _submission: &Submission) -> Result<String> {
        tracing::warn!("PrintBackend::submit called on unsupported platform");
        Err(GrauwerkError::PlatformUnavailable)
    }

    async fn list_printers(&self) -> Result<Vec<PrinterInfo>> {
        Err(GrauwerkError::PlatformUnavailable)
    }
}
