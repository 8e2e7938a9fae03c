// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "grauwerk", version, about = "Grauwerk kiosk photo print station")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List printers known to the OS print system.
    Printers,
    /// Remember the printer used for captures.
    Select { name: String },
    /// Show a printer's options and the grayscale option that would be used.
    Probe {
        #[arg(long, help = "Printer to probe (defaults to the selected printer)")]
        device: Option<String>,
    },
    /// Print an image file or a `data:image/...;base64,` URL in monochrome.
    Print {
        #[arg(long, help = "Printer to use (defaults to the selected printer)")]
        device: Option<String>,
        #[arg(long, help = "Job title (defaults to the configured title)")]
        title: Option<String>,
        #[arg(long, default_value_t = false, help = "Scale and convert to grayscale before printing")]
        prepare: bool,
        input: String,
    },
    /// Show the effective configuration.
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::parse_from(["grauwerk", "print", "--json", "--device", "Office", "photo.png"]);
        assert!(cli.json);
        match cli.command {
            Commands::Print { device, prepare, input, .. } => {
                assert_eq!(device.as_deref(), Some("Office"));
                assert!(!prepare);
                assert_eq!(input, "photo.png");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
