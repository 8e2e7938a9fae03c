// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Kiosk configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GrauwerkError, Result};

/// File name of the persisted configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Kiosk settings, owned by the coordinating process and passed explicitly
/// into each print call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    /// Printer chosen in the settings flow. `None` until the operator picks one.
    pub selected_printer: Option<String>,
    /// Job title attached to every capture.
    pub job_title: String,
    /// Scale factor applied to raw camera frames before printing.
    pub capture_scale: f32,
    /// Upper bound for the capability query.
    pub probe_timeout_secs: u64,
    /// Upper bound for the submission command.
    pub submit_timeout_secs: u64,
    /// Upper bound for printer enumeration.
    pub list_timeout_secs: u64,
    /// Where transient spool files go. Defaults to the system temp dir.
    pub spool_dir: Option<PathBuf>,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            selected_printer: None,
            job_title: "Grauwerk Photo".into(),
            capture_scale: 0.35,
            probe_timeout_secs: 5,
            submit_timeout_secs: 30,
            list_timeout_secs: 5,
            spool_dir: None,
        }
    }
}

impl KioskConfig {
    /// Load the configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Persist the configuration as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.validate()?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values that would make every print attempt fail.
    pub fn validate(&self) -> Result<()> {
        if !(self.capture_scale > 0.0 && self.capture_scale <= 1.0) {
            return Err(GrauwerkError::Config(format!(
                "capture_scale must be in (0, 1], got {}",
                self.capture_scale
            )));
        }
        if self.probe_timeout_secs == 0 || self.submit_timeout_secs == 0 || self.list_timeout_secs == 0 {
            return Err(GrauwerkError::Config("timeouts must be at least 1s".into()));
        }
        Ok(())
    }

    /// The printer to use for a capture: an explicit override wins over the
    /// selected printer. Blank names count as absent.
    pub fn resolve_printer(&self, overriding: Option<&str>) -> Option<String> {
        let non_blank = |name: &str| {
            let name = name.trim();
            (!name.is_empty()).then(|| name.to_owned())
        };
        overriding
            .and_then(non_blank)
            .or_else(|| self.selected_printer.as_deref().and_then(non_blank))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_secs)
    }

    /// Spool root, falling back to the system temp dir.
    pub fn spool_root(&self) -> PathBuf {
        self.spool_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
