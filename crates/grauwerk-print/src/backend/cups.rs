// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CUPS command-line backend.
//
//   - `lpoptions -p <queue> -l`   capability listing
//   - `lp [-t title] -d <queue> -o k=v ... <file>`   submission
//   - `lpstat -l -p` / `lpstat -d`   enumeration
//
// Every command runs under a timeout and is killed when the timeout fires.
// The C locale keeps the output parseable.

use std::ffi::OsString;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, error, info, instrument};

use grauwerk_core::error::{GrauwerkError, Result};
use grauwerk_core::types::PrinterInfo;

use super::{PrintBackend, PrintTimeouts, Submission};
use crate::printers::{mark_default, parse_default_destination, parse_lpstat_printers};

const LPOPTIONS: &str = "lpoptions";
const LP: &str = "lp";
const LPSTAT: &str = "lpstat";

/// Backend that shells out to the CUPS client tools.
#[derive(Debug, Clone)]
pub struct CupsBackend {
    timeouts: PrintTimeouts,
}

impl Default for CupsBackend {
    fn default() -> Self {
        Self::new(PrintTimeouts::default())
    }
}

impl CupsBackend {
    pub fn new(timeouts: PrintTimeouts) -> Self {
        Self { timeouts }
    }
}

impl PrintBackend for CupsBackend {
    fn name(&self) -> &str {
        "cups"
    }

    #[instrument(skip(self))]
    async fn probe(&self, device: &str) -> Result<String> {
        let args: Vec<OsString> = vec!["-p".into(), device.into(), "-l".into()];
        let output = run(LPOPTIONS, &args, self.timeouts.probe)
            .await
            .map_err(|e| GrauwerkError::Probe(e.to_string()))?;

        if !output.status.success() {
            return Err(GrauwerkError::Probe(failure_message(LPOPTIONS, &output)));
        }

        let listing = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(bytes = listing.len(), "received capability listing");
        Ok(listing)
    }

    #[instrument(skip(self, submission), fields(device = %submission.device))]
    async fn submit(&self, submission: &Submission) -> Result<String> {
        let mut args: Vec<OsString> = submission
            .option_args()
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(submission.file.clone().into_os_string());

        info!(options = submission.options.len(), "sending job to lp");
        let output = run(LP, &args, self.timeouts.submit)
            .await
            .map_err(into_submission_error)?;

        if !output.status.success() {
            let message = failure_message(LP, &output);
            error!(error = %message, "lp rejected the job");
            return Err(GrauwerkError::Submission(message));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let job = parse_job_id(&stdout);
        info!(job = %job, "job accepted by CUPS");
        Ok(job)
    }

    #[instrument(skip(self))]
    async fn list_printers(&self) -> Result<Vec<PrinterInfo>> {
        let args: Vec<OsString> = vec!["-l".into(), "-p".into()];
        let output = run(LPSTAT, &args, self.timeouts.list).await?;
        if !output.status.success() {
            return Err(GrauwerkError::Command {
                program: LPSTAT.to_owned(),
                detail: failure_message(LPSTAT, &output),
            });
        }
        let mut printers = parse_lpstat_printers(&String::from_utf8_lossy(&output.stdout));

        // No default destination makes `lpstat -d` fail on some systems.
        let default_args: Vec<OsString> = vec!["-d".into()];
        match run(LPSTAT, &default_args, self.timeouts.list).await {
            Ok(out) if out.status.success() => {
                if let Some(name) = parse_default_destination(&String::from_utf8_lossy(&out.stdout)) {
                    mark_default(&mut printers, &name);
                }
            }
            Ok(_) => debug!("no system default destination"),
            Err(e) => debug!(error = %e, "could not query default destination"),
        }

        Ok(printers)
    }
}

/// Run a CUPS client command with a deadline. A timeout kills the child.
async fn run(program: &str, args: &[OsString], limit: Duration) -> Result<Output> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .env("LC_ALL", "C")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(program, ?args, "running command");
    tokio::time::timeout(limit, cmd.output())
        .await
        .map_err(|_| GrauwerkError::Timeout {
            operation: program.to_owned(),
            secs: limit.as_secs(),
        })?
        .map_err(|e| GrauwerkError::Command {
            program: program.to_owned(),
            detail: format!("failed to run {program}: {e}"),
        })
}

/// An `lp` that could not even be started is still a failed submission.
fn into_submission_error(err: GrauwerkError) -> GrauwerkError {
    match err {
        GrauwerkError::Command { detail, .. } => GrauwerkError::Submission(detail),
        other => other,
    }
}

/// The command's own error text, verbatim where it printed one.
fn failure_message(program: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_owned();
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_owned();
    }
    format!("{program} exited with {}", output.status)
}

/// Extract the job id from `request id is Queue-42 (1 file(s))`. Anything
/// else is returned trimmed, as printed.
pub fn parse_job_id(stdout: &str) -> String {
    let trimmed = stdout.trim();
    trimmed
        .lines()
        .find_map(|line| line.trim().strip_prefix("request id is "))
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or(trimmed)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_is_extracted() {
        assert_eq!(parse_job_id("request id is HP_LaserJet-42 (1 file(s))\n"), "HP_LaserJet-42");
    }

    #[test]
    fn unexpected_output_is_kept_verbatim() {
        assert_eq!(parse_job_id("  queued as 7  \n"), "queued as 7");
        assert_eq!(parse_job_id(""), "");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_program_is_an_error() {
        let err = run("grauwerk-no-such-program", &[], Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GrauwerkError::Command { ref program, .. } if program == "grauwerk-no-such-program"
        ));
        assert!(err.to_string().contains("failed to run grauwerk-no-such-program"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn lp_that_cannot_start_is_a_submission_failure() {
        let err = run("grauwerk-no-such-lp", &[], Duration::from_secs(5))
            .await
            .map_err(into_submission_error)
            .unwrap_err();
        assert!(matches!(
            err,
            GrauwerkError::Submission(ref m) if m.starts_with("failed to run grauwerk-no-such-lp")
        ));
    }

    #[test]
    fn timeouts_stay_timeouts_for_lp() {
        let err = into_submission_error(GrauwerkError::Timeout {
            operation: LP.into(),
            secs: 30,
        });
        assert_eq!(err.to_string(), "lp timed out after 30s");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_command_times_out() {
        let args: Vec<OsString> = vec!["5".into()];
        let err = run("sleep", &args, Duration::from_millis(100)).await.unwrap_err();
        assert!(matches!(err, GrauwerkError::Timeout { ref operation, .. } if operation == "sleep"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stderr_is_the_failure_message() {
        let args: Vec<OsString> = vec!["-c".into(), "echo 'lp: bad destination' >&2; exit 1".into()];
        let output = run("sh", &args, Duration::from_secs(5)).await.unwrap();
        assert!(!output.status.success());
        assert_eq!(failure_message("sh", &output), "lp: bad destination");
    }
}
