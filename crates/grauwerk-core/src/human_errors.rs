// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable status lines for the kiosk screen.
//
// Every technical error maps to a short message and a suggestion for whoever
// is standing at the booth. Submission errors keep the CUPS message verbatim
// so operators can diagnose the queue.

use crate::error::GrauwerkError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A new click after the cooldown may well succeed.
    Transient,
    /// The operator must fix the setup (pick a printer, check the queue).
    ActionRequired,
    /// Retrying will not help on this machine.
    Permanent,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short status line.
    pub message: String,
    /// What the operator should try.
    pub suggestion: String,
    /// Whether another capture attempt is worthwhile.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `GrauwerkError` into a status line for the kiosk screen.
pub fn humanize_error(err: &GrauwerkError) -> HumanError {
    match err {
        GrauwerkError::NoPrinterSelected => HumanError {
            message: "No printer selected.".into(),
            suggestion: "Open the settings and choose a printer, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        GrauwerkError::InvalidImage | GrauwerkError::ImageError(_) => HumanError {
            message: "The photo could not be prepared for printing.".into(),
            suggestion: "Take the photo again. If this keeps happening, restart the camera.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        GrauwerkError::Submission(detail) => humanize_submission(detail),

        GrauwerkError::Timeout { operation, secs } => HumanError {
            message: "The printer is taking too long to answer.".into(),
            suggestion: format!(
                "Check that the printer is switched on and connected. ({operation} gave up after {secs}s)"
            ),
            retriable: true,
            severity: Severity::Transient,
        },

        GrauwerkError::Command { detail, .. } => HumanError {
            message: "The print system did not respond as expected.".into(),
            suggestion: format!("Check that CUPS is running. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        GrauwerkError::Probe(detail) => HumanError {
            message: "Printer settings could not be read.".into(),
            suggestion: format!("Printing will still be attempted with generic black-and-white settings. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        GrauwerkError::PlatformUnavailable => HumanError {
            message: "Printing is not available on this computer.".into(),
            suggestion: "Run the kiosk on a system with CUPS (macOS or Linux).".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        GrauwerkError::Config(detail) => HumanError {
            message: "The kiosk settings are invalid.".into(),
            suggestion: format!("Fix the configuration file and restart. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        GrauwerkError::Io(io_err) => HumanError {
            message: "The photo could not be handed to the printer.".into(),
            suggestion: format!("Check free disk space in the temporary folder. ({io_err})"),
            retriable: true,
            severity: Severity::Transient,
        },

        GrauwerkError::Serialization(detail) => HumanError {
            message: "The kiosk settings could not be read.".into(),
            suggestion: format!("Delete or repair the configuration file. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

/// Classify a CUPS error message. The detail is always appended verbatim.
fn humanize_submission(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("does not exist") || lower.contains("unknown destination") {
        return HumanError {
            message: format!("Print failed: {detail}"),
            suggestion: "The selected printer is not installed. Pick another one in the settings.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        };
    }

    if lower.contains("not accepting") || lower.contains("disabled") || lower.contains("paused") {
        return HumanError {
            message: format!("Print failed: {detail}"),
            suggestion: "The print queue is stopped. Resume it in the system printer settings.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        };
    }

    if lower.contains("forbidden") || lower.contains("permission") || lower.contains("not authorized") {
        return HumanError {
            message: format!("Print failed: {detail}"),
            suggestion: "This user is not allowed to print to that queue.".into(),
            retriable: false,
            severity: Severity::Permanent,
        };
    }

    HumanError {
        message: format!("Print failed: {detail}"),
        suggestion: "Wait a moment and take another photo.".into(),
        retriable: true,
        severity: Severity::Transient,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_printer_needs_operator() {
        let h = humanize_error(&GrauwerkError::NoPrinterSelected);
        assert_eq!(h.severity, Severity::ActionRequired);
        assert!(!h.retriable);
    }

    #[test]
    fn submission_detail_passes_through() {
        let err = GrauwerkError::Submission("lp: The printer or class does not exist.".into());
        let h = humanize_error(&err);
        assert_eq!(h.message, "Print failed: lp: The printer or class does not exist.");
        assert_eq!(h.severity, Severity::ActionRequired);
    }

    #[test]
    fn stopped_queue_is_action_required() {
        let err = GrauwerkError::Submission("lp: Destination \"Office\" is not accepting jobs.".into());
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }

    #[test]
    fn unknown_submission_error_is_transient() {
        let err = GrauwerkError::Submission("lp: Unable to connect to server".into());
        let h = humanize_error(&err);
        assert!(h.retriable);
        assert_eq!(h.severity, Severity::Transient);
    }

    #[test]
    fn failed_listing_is_not_called_a_print_failure() {
        let err = GrauwerkError::Command {
            program: "lpstat".into(),
            detail: "lpstat: Bad file descriptor".into(),
        };
        let h = humanize_error(&err);
        assert!(!h.message.contains("Print failed"));
        assert!(h.suggestion.ends_with("(lpstat: Bad file descriptor)"));
        assert_eq!(h.severity, Severity::Transient);
    }

    #[test]
    fn timeout_mentions_operation() {
        let err = GrauwerkError::Timeout {
            operation: "lp".into(),
            secs: 30,
        };
        let h = humanize_error(&err);
        assert!(h.suggestion.contains("lp gave up after 30s"));
    }
}
