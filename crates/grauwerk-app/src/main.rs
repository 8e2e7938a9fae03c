// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grauwerk — kiosk photo print station
//
// Entry point. Initialises logging, parses the command line, and runs one
// command. Exit code 0 on success, 1 on failure.

mod cli;
mod commands;
mod services;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use services::output::print_error;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so `--json` output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "Grauwerk starting");

    match commands::execute(cli.json, cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            print_error(cli.json, &e);
            ExitCode::FAILURE
        }
    }
}
