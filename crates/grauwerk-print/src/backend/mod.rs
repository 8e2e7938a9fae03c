// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print backend abstraction.
//
// The dispatcher talks to the OS print system only through `PrintBackend`,
// so tests can substitute a fake that records submissions instead of
// running `lp`. The platform dispatch below picks CUPS on unix and a stub
// that fails fast everywhere else.

pub mod cups;
pub mod stub;

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use grauwerk_core::KioskConfig;
use grauwerk_core::error::Result;
use grauwerk_core::types::{JobOption, PrinterInfo};

/// Capability provider and job sink for one print system.
pub trait PrintBackend: Send + Sync {
    /// Short name for logs (e.g. "cups").
    fn name(&self) -> &str;

    /// Whether this platform has a print path at all. The dispatcher refuses
    /// to spool anything when this is false.
    fn is_available(&self) -> bool {
        true
    }

    /// Return the raw long-form option listing for `device`.
    fn probe(&self, device: &str) -> impl Future<Output = Result<String>> + Send;

    /// Submit a spooled file and return the job identifier.
    fn submit(&self, submission: &Submission) -> impl Future<Output = Result<String>> + Send;

    /// Enumerate registered printers, marking the system default.
    fn list_printers(&self) -> impl Future<Output = Result<Vec<PrinterInfo>>> + Send;
}

/// Everything the submission command needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub device: String,
    pub file: PathBuf,
    pub options: Vec<JobOption>,
    pub title: Option<String>,
}

impl Submission {
    /// `lp` arguments preceding the file: `[-t title] -d device (-o opt)*`.
    pub fn option_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(4 + self.options.len() * 2);
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            args.push("-t".to_owned());
            args.push(title.to_owned());
        }
        args.push("-d".to_owned());
        args.push(self.device.clone());
        for opt in &self.options {
            args.push("-o".to_owned());
            args.push(opt.to_string());
        }
        args
    }
}

/// Upper bounds for the external commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintTimeouts {
    pub probe: Duration,
    pub submit: Duration,
    pub list: Duration,
}

impl Default for PrintTimeouts {
    fn default() -> Self {
        Self::from_config(&KioskConfig::default())
    }
}

impl PrintTimeouts {
    pub fn from_config(config: &KioskConfig) -> Self {
        Self {
            probe: config.probe_timeout(),
            submit: config.submit_timeout(),
            list: config.list_timeout(),
        }
    }
}

/// The backend for the platform this binary was built for.
#[cfg(unix)]
pub type PlatformBackend = cups::CupsBackend;

/// The backend for the platform this binary was built for.
#[cfg(not(unix))]
pub type PlatformBackend = stub::UnsupportedBackend;

/// Construct the platform backend.
pub fn platform_backend(timeouts: PrintTimeouts) -> PlatformBackend {
    #[cfg(unix)]
    {
        cups::CupsBackend::new(timeouts)
    }
    #[cfg(not(unix))]
    {
        let _ = timeouts;
        stub::UnsupportedBackend
    }
}
