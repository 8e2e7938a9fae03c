// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Monochrome print dispatcher.
//
// One print attempt: validate → spool → probe → select gray option →
// submit → release spool. Attempts on the same printer are serialized;
// attempts on different printers run independently.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use grauwerk_core::KioskConfig;
use grauwerk_core::error::{GrauwerkError, Result};
use grauwerk_core::types::{GraySelection, JobOption, PrintReport, RequestId};

use crate::backend::{PlatformBackend, PrintBackend, PrintTimeouts, Submission, platform_backend};
use crate::capabilities::probe_capabilities;
use crate::gray_policy::{job_options, select_gray};
use crate::request::PrintRequest;
use crate::spool::Spool;

/// A job the print system accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispatched {
    pub request_id: RequestId,
    /// Identifier returned by the print system.
    pub job: String,
    /// The targeted selection, or `None` when the fallback options were used.
    pub applied_gray: Option<GraySelection>,
    /// Every `-o` option sent with the job.
    pub options: Vec<JobOption>,
    pub submitted_at: DateTime<Utc>,
    /// Spool files or directories that could not be removed after the job
    /// was handed over.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cleanup_warnings: Vec<String>,
}

impl From<Dispatched> for PrintReport {
    fn from(d: Dispatched) -> Self {
        PrintReport::submitted(d.job, d.applied_gray)
    }
}

/// Sends captures to a printer with grayscale forced on.
pub struct MonochromeDispatcher<B> {
    backend: B,
    spool_root: PathBuf,
    device_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl MonochromeDispatcher<PlatformBackend> {
    /// Dispatcher for this platform's print system, configured from the kiosk
    /// settings.
    pub fn from_config(config: &KioskConfig) -> Self {
        Self::new(
            platform_backend(PrintTimeouts::from_config(config)),
            config.spool_root(),
        )
    }
}

impl<B: PrintBackend> MonochromeDispatcher<B> {
    pub fn new(backend: B, spool_root: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            spool_root: spool_root.into(),
            device_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn spool_root(&self) -> &Path {
        &self.spool_root
    }

    /// Print a data URL on `device`. This is the capture layer's entry point:
    /// every outcome, including invalid input, comes back as a report.
    pub async fn print(&self, device: &str, data_url: &str, job_title: Option<&str>) -> PrintReport {
        match PrintRequest::from_data_url(device, data_url, job_title) {
            Ok(request) => self.print_request(&request).await,
            Err(e) => {
                warn!(error = %e, "print request rejected");
                PrintReport::failed(e.to_string())
            }
        }
    }

    /// Print a validated request, folding any failure into the report.
    pub async fn print_request(&self, request: &PrintRequest) -> PrintReport {
        match self.dispatch(request).await {
            Ok(dispatched) => dispatched.into(),
            Err(e) => {
                warn!(request = %request.id, device = %request.device, error = %e, "print attempt failed");
                PrintReport::failed(e.to_string())
            }
        }
    }

    /// Print a validated request and return the typed outcome.
    #[instrument(skip(self, request), fields(request = %request.id, device = %request.device))]
    pub async fn dispatch(&self, request: &PrintRequest) -> Result<Dispatched> {
        if !self.backend.is_available() {
            return Err(GrauwerkError::PlatformUnavailable);
        }

        let lock = self.device_lock(&request.device);
        let outcome = {
            let _serialized = lock.lock().await;
            self.spool_and_submit(request).await
        };
        self.forget_device_lock(&request.device, lock);
        outcome
    }

    async fn spool_and_submit(&self, request: &PrintRequest) -> Result<Dispatched> {
        let mut spool = Spool::create(&self.spool_root, &request.payload).await?;
        let outcome = self.submit_spooled(request, spool.path()).await;
        // Cleanup warnings are logged by release and never turn a job into a failure.
        let warnings = spool.release();
        outcome.map(|dispatched| Dispatched {
            cleanup_warnings: warnings.iter().map(ToString::to_string).collect(),
            ..dispatched
        })
    }

    async fn submit_spooled(&self, request: &PrintRequest, file: &Path) -> Result<Dispatched> {
        let options = probe_capabilities(&self.backend, &request.device).await;
        let applied_gray = select_gray(&options);
        let options = job_options(applied_gray.as_ref());

        let submission = Submission {
            device: request.device.clone(),
            file: file.to_path_buf(),
            options,
            title: request.job_title.clone(),
        };

        let gray = applied_gray
            .as_ref()
            .map_or_else(|| "fallback".to_owned(), ToString::to_string);
        info!(
            digest = %request.payload.digest(),
            bytes = request.payload.len(),
            %gray,
            "submitting capture"
        );
        let job = self.backend.submit(&submission).await?;

        Ok(Dispatched {
            request_id: request.id,
            job,
            applied_gray,
            options: submission.options,
            submitted_at: Utc::now(),
            cleanup_warnings: Vec::new(),
        })
    }

    fn device_lock(&self, device: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .device_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(device.to_owned()).or_default().clone()
    }

    /// Drop this attempt's handle and remove the entry once no other attempt
    /// holds or waits on it. Handles are only cloned under the map lock, so
    /// the count cannot grow while it is checked.
    fn forget_device_lock(&self, device: &str, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self
            .device_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        drop(lock);
        if locks.get(device).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(device);
        }
    }

    #[cfg(test)]
    fn tracked_devices(&self) -> usize {
        self.device_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
