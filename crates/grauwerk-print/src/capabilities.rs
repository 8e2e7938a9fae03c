// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer capability probing.
//
// Asks the print backend for the long-form option listing of a queue
// (`lpoptions -p <queue> -l` on CUPS) and parses it into structured options.
// Missing capability data is a normal outcome: plenty of drivers expose no
// listing at all, and the dispatcher then falls back to generic flags.

use tracing::{debug, warn};

use grauwerk_core::types::{CapabilityOption, Choice};

use crate::backend::PrintBackend;

/// Parsed options advertised by one printer queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrinterCapabilities {
    pub options: Vec<CapabilityOption>,
}

impl PrinterCapabilities {
    /// Parse a raw capability listing.
    pub fn from_listing(listing: &str) -> Self {
        Self {
            options: parse_options(listing),
        }
    }

    /// Query a printer's capabilities through the backend.
    ///
    /// Never fails: an unavailable, failing, or timed-out query yields an
    /// empty capability set.
    pub async fn query<B: PrintBackend>(backend: &B, device: &str) -> Self {
        match backend.probe(device).await {
            Ok(listing) if listing.trim().is_empty() => {
                debug!(device, "printer returned an empty capability listing");
                Self::default()
            }
            Ok(listing) => {
                let caps = Self::from_listing(&listing);
                debug!(device, options = caps.options.len(), "parsed printer capabilities");
                caps
            }
            Err(e) => {
                warn!(device, error = %e, "capability probe unavailable, continuing without it");
                Self::default()
            }
        }
    }
}

/// Probe `device` and return its parsed options; empty when nothing could be
/// learned.
pub async fn probe_capabilities<B: PrintBackend>(backend: &B, device: &str) -> Vec<CapabilityOption> {
    PrinterCapabilities::query(backend, device).await.options
}

/// Parse a capability listing, one option per line:
///
/// ```text
/// ColorModel/Color Mode: RGB *Gray KGray
/// ```
///
/// Lines without a colon, and lines whose value list is empty, are dropped.
pub fn parse_options(listing: &str) -> Vec<CapabilityOption> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<CapabilityOption> {
    let (lhs, rhs) = line.split_once(':')?;

    let key = lhs.trim();
    let base_key = key.split('/').next().unwrap_or(key).trim();

    let choices: Vec<Choice> = rhs
        .split_whitespace()
        .filter_map(|token| {
            let (value, is_default) = match token.strip_prefix('*') {
                Some(stripped) => (stripped, true),
                None => (token, false),
            };
            (!value.is_empty()).then(|| Choice {
                value: value.to_owned(),
                is_default,
            })
        })
        .collect();

    if choices.is_empty() {
        return None;
    }

    Some(CapabilityOption {
        key: key.to_owned(),
        base_key: base_key.to_owned(),
        choices,
    })
}
