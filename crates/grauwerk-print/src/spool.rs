// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transient spool files.
//
// Each print attempt writes its bitmap into a fresh, uniquely named
// directory so concurrent attempts never share a path. Release is
// best-effort: failures come back as `CleanupWarning`s and are logged, but
// never change the outcome of the print attempt.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use grauwerk_core::error::Result;
use grauwerk_document::ImagePayload;

/// Prefix of every spool directory.
pub const SPOOL_DIR_PREFIX: &str = "grauwerk-print-";

/// Base name of the spooled bitmap (extension follows the encoding).
const SPOOL_FILE_STEM: &str = "capture";

/// A spooled image, removed on `release` or drop.
#[derive(Debug)]
pub struct Spool {
    dir: PathBuf,
    file: PathBuf,
    released: bool,
}

/// A spool path that could not be removed.
#[derive(Debug)]
pub struct CleanupWarning {
    pub path: PathBuf,
    pub error: std::io::Error,
}

impl std::fmt::Display for CleanupWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "could not remove {}: {}", self.path.display(), self.error)
    }
}

impl Spool {
    /// Write `payload` into a new spool directory under `root`.
    pub async fn create(root: &Path, payload: &ImagePayload) -> Result<Self> {
        tokio::fs::create_dir_all(root).await?;

        let dir = root.join(format!("{SPOOL_DIR_PREFIX}{}", Uuid::new_v4()));
        tokio::fs::create_dir(&dir).await?;

        let file = dir.join(format!("{SPOOL_FILE_STEM}.{}", payload.encoding().extension()));
        let mut spool = Self {
            dir,
            file,
            released: false,
        };

        if let Err(e) = tokio::fs::write(&spool.file, payload.bytes()).await {
            spool.release();
            return Err(e.into());
        }

        debug!(path = %spool.file.display(), bytes = payload.len(), "spooled capture");
        Ok(spool)
    }

    /// Path of the spooled bitmap.
    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Remove the file, then its directory. Never fails; problems are logged
    /// and returned.
    pub fn release(&mut self) -> Vec<CleanupWarning> {
        if self.released {
            return Vec::new();
        }
        self.released = true;

        let mut warnings = Vec::new();
        for (path, result) in [
            (&self.file, std::fs::remove_file(&self.file)),
            (&self.dir, std::fs::remove_dir(&self.dir)),
        ] {
            match result {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    let warning = CleanupWarning {
                        path: path.clone(),
                        error: e,
                    };
                    warn!(%warning, "spool cleanup failed");
                    warnings.push(warning);
                }
            }
        }
        warnings
    }
}

impl Drop for Spool {
    fn drop(&mut self) {
        self.release();
    }
}
