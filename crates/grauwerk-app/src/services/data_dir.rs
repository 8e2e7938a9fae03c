// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data directory resolution and configuration persistence.

use std::path::PathBuf;

use tracing::{debug, warn};

use grauwerk_core::KioskConfig;
use grauwerk_core::config::CONFIG_FILE;
use grauwerk_core::error::Result;

/// Overrides the data directory (used by kiosk images and tests).
pub const DATA_DIR_ENV: &str = "GRAUWERK_DATA_DIR";

/// Return the application data directory, creating it if needed.
pub fn data_dir() -> PathBuf {
    let dir = match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs_fallback().join("grauwerk"),
    };
    std::fs::create_dir_all(&dir).ok();
    dir
}

pub fn config_path() -> PathBuf {
    data_dir().join(CONFIG_FILE)
}

/// Load the saved configuration. A missing or unreadable file yields the
/// defaults so the kiosk keeps working.
pub fn load_config() -> KioskConfig {
    let path = config_path();
    if !path.exists() {
        debug!(path = %path.display(), "no saved configuration, using defaults");
        return KioskConfig::default();
    }
    KioskConfig::load(&path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "configuration unreadable, using defaults");
        KioskConfig::default()
    })
}

pub fn save_config(config: &KioskConfig) -> Result<PathBuf> {
    let path = config_path();
    config.save(&path)?;
    Ok(path)
}

fn dirs_fallback() -> PathBuf {
    // Try XDG data dir, then fallback to home
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    std::env::temp_dir()
}
