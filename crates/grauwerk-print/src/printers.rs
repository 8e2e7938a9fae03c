// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer enumeration.
//
// Parses `lpstat -l -p` (queue names, state, description) and `lpstat -d`
// (system default) into `PrinterInfo` records for the settings flow.

use tracing::{debug, warn};

use grauwerk_core::types::{PrinterInfo, PrinterStatus};

use crate::backend::PrintBackend;

/// Enumerate printers through the backend. Failures yield an empty list so
/// the settings flow can still offer manual entry.
pub async fn enumerate_printers<B: PrintBackend>(backend: &B) -> Vec<PrinterInfo> {
    match backend.list_printers().await {
        Ok(printers) => {
            debug!(count = printers.len(), backend = backend.name(), "enumerated printers");
            printers
        }
        Err(e) => {
            warn!(error = %e, backend = backend.name(), "printer enumeration failed");
            Vec::new()
        }
    }
}

/// Parse `lpstat -p` or `lpstat -l -p` output.
///
/// ```text
/// printer HP_LaserJet is idle.  enabled since Mon 01 Jan 2024 10:00:00
///         Description: HP LaserJet Pro M404
/// printer Office now printing Office-12.  enabled since ...
/// ```
pub fn parse_lpstat_printers(output: &str) -> Vec<PrinterInfo> {
    let mut printers: Vec<PrinterInfo> = Vec::new();

    for line in output.lines() {
        if let Some(rest) = line.strip_prefix("printer ") {
            let rest = rest.trim_start();
            let Some(name) = rest.split_whitespace().next() else {
                continue;
            };
            let mut info = PrinterInfo::new(name);
            info.status = status_from_line(&rest[name.len()..]);
            printers.push(info);
            continue;
        }

        // Detail lines are indented and belong to the last printer.
        let detail = line.trim_start();
        if detail.len() == line.len() {
            continue;
        }
        if let (Some(current), Some(description)) =
            (printers.last_mut(), detail.strip_prefix("Description:"))
        {
            current.description = description.trim().to_owned();
        }
    }

    printers
}

fn status_from_line(rest: &str) -> PrinterStatus {
    if rest.contains("disabled") {
        PrinterStatus::Disabled
    } else if rest.contains("now printing") {
        PrinterStatus::Printing
    } else if rest.contains("is idle") {
        PrinterStatus::Idle
    } else {
        PrinterStatus::Unknown
    }
}

/// Parse `lpstat -d` output. Returns `None` when no default is set.
pub fn parse_default_destination(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        line.trim()
            .strip_prefix("system default destination:")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
    })
}

/// Flag the printer named `default_name`, if present.
pub fn mark_default(printers: &mut [PrinterInfo], default_name: &str) {
    for printer in printers.iter_mut() {
        printer.is_default = printer.name == default_name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LPSTAT_L_P: &str = "\
printer HP_LaserJet is idle.  enabled since Mon 01 Jan 2024 10:00:00 AM
\tForm mounted:
\tContent types: any
\tDescription: HP LaserJet Pro M404
\tAlerts: none
\tLocation: Front desk
printer Office_Color now printing Office_Color-12.  enabled since Mon 01 Jan 2024 10:00:00 AM
\tDescription: Canon iR C3025
printer Broken disabled since Mon 01 Jan 2024 10:00:00 AM -
\treason unknown
";

    #[test]
    fn parses_names_status_and_descriptions() {
        let printers = parse_lpstat_printers(LPSTAT_L_P);
        assert_eq!(printers.len(), 3);

        assert_eq!(printers[0].name, "HP_LaserJet");
        assert_eq!(printers[0].display_name, "HP_LaserJet");
        assert_eq!(printers[0].status, PrinterStatus::Idle);
        assert_eq!(printers[0].description, "HP LaserJet Pro M404");

        assert_eq!(printers[1].status, PrinterStatus::Printing);
        assert_eq!(printers[1].description, "Canon iR C3025");

        assert_eq!(printers[2].status, PrinterStatus::Disabled);
        assert_eq!(printers[2].description, "");
    }

    #[test]
    fn short_form_output_works_too() {
        let printers = parse_lpstat_printers("printer A is idle.  enabled since x\nprinter B is idle.\n");
        let names: Vec<&str> = printers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn unrelated_output_yields_nothing() {
        assert!(parse_lpstat_printers("lpstat: No destinations added.\n").is_empty());
        assert!(parse_lpstat_printers("").is_empty());
    }

    #[test]
    fn default_destination_is_parsed() {
        assert_eq!(
            parse_default_destination("system default destination: HP_LaserJet\n").as_deref(),
            Some("HP_LaserJet")
        );
        assert_eq!(parse_default_destination("no system default destination\n"), None);
    }

    #[test]
    fn mark_default_flags_exactly_one() {
        let mut printers = parse_lpstat_printers(LPSTAT_L_P);
        mark_default(&mut printers, "Office_Color");
        let defaults: Vec<&str> = printers
            .iter()
            .filter(|p| p.is_default)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(defaults, vec!["Office_Color"]);
    }
}
