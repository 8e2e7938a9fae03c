// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal output. `--json` prints one JSON document on stdout; otherwise
// plain lines. Errors go to stderr in text mode.

use serde::Serialize;

use grauwerk_core::error::{GrauwerkError, Result};
use grauwerk_core::human_errors::{Severity, humanize_error};
use grauwerk_core::types::PrintReport;

pub fn print_out<T: Serialize>(json: bool, data: &[T], row: impl Fn(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

pub fn print_one<T: Serialize>(json: bool, data: &T, row: impl Fn(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        println!("{}", row(data));
    }
    Ok(())
}

/// Report a failed command. In JSON mode this is a failed `PrintReport`, so
/// callers parse one shape for every failure.
pub fn print_error(json: bool, err: &GrauwerkError) {
    if json {
        let report = PrintReport::failed(err.to_string());
        match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{out}"),
            Err(_) => println!("{{\"success\":false}}"),
        }
        return;
    }
    eprintln!("error: {err}");
    explain(err);
}

/// Operator-facing explanation of `err` on stderr.
pub fn explain(err: &GrauwerkError) {
    let human = humanize_error(err);
    let label = match human.severity {
        Severity::Transient => "temporary problem",
        Severity::ActionRequired => "action needed",
        Severity::Permanent => "not supported here",
    };
    eprintln!("{label}: {}", human.message);
    eprintln!("hint: {}", human.suggestion);
    if human.retriable {
        eprintln!("hint: another attempt may succeed");
    }
}
