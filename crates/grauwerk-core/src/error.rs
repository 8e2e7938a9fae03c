// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Grauwerk.

use thiserror::Error;

/// Top-level error type for all Grauwerk operations.
#[derive(Debug, Error)]
pub enum GrauwerkError {
    // -- Validation (surfaced before any OS interaction) --
    #[error("No printer selected")]
    NoPrinterSelected,

    #[error("Invalid image data URL")]
    InvalidImage,

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Print pipeline --
    /// The OS print command failed. The message is passed through verbatim.
    #[error("{0}")]
    Submission(String),

    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: String, secs: u64 },

    /// A print-system command other than submission could not be run or
    /// exited unsuccessfully. The detail is the command's own output.
    #[error("{detail}")]
    Command { program: String, detail: String },

    /// Capability query failed. Absorbed by the dispatcher, never surfaced.
    #[error("capability probe failed: {0}")]
    Probe(String),

    #[error("Native CUPS printing is not available on this platform")]
    PlatformUnavailable,

    // -- Storage / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, GrauwerkError>;
