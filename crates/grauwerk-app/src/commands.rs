// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command handlers. Each returns whether the command succeeded; errors that
// escape are reported once by `main`.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use grauwerk_core::KioskConfig;
use grauwerk_core::error::{GrauwerkError, Result};
use grauwerk_core::types::{CapabilityOption, GraySelection, PrintReport, PrinterInfo, PrinterStatus};
use grauwerk_document::{CaptureProcessor, ImagePayload};
use grauwerk_print::{
    MonochromeDispatcher, PrintRequest, PrintTimeouts, PrinterCapabilities, enumerate_printers,
    job_options, platform_backend, select_gray,
};

use crate::cli::Commands;
use crate::services::data_dir;
use crate::services::output::{explain, print_one, print_out};

pub async fn execute(json: bool, command: Commands) -> Result<bool> {
    match command {
        Commands::Printers => printers(json).await,
        Commands::Select { name } => select(json, &name),
        Commands::Probe { device } => probe(json, device.as_deref()).await,
        Commands::Print {
            device,
            title,
            prepare,
            input,
        } => print(json, device.as_deref(), title.as_deref(), prepare, &input).await,
        Commands::Config => show_config(json),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrinterRow {
    #[serde(flatten)]
    info: PrinterInfo,
    selected: bool,
}

async fn printers(json: bool) -> Result<bool> {
    let config = data_dir::load_config();
    let backend = platform_backend(PrintTimeouts::from_config(&config));

    let rows: Vec<PrinterRow> = enumerate_printers(&backend)
        .await
        .into_iter()
        .map(|info| PrinterRow {
            selected: config.selected_printer.as_deref() == Some(info.name.as_str()),
            info,
        })
        .collect();

    if !json && rows.is_empty() {
        println!("No printers found.");
        return Ok(true);
    }
    print_out(json, &rows, |r| {
        let marker = if r.info.is_default { "*" } else { " " };
        let selected = if r.selected { "  [selected]" } else { "" };
        format!(
            "{marker} {} ({}){selected}",
            r.info.name,
            status_label(r.info.status)
        )
    })?;
    Ok(true)
}

fn status_label(status: PrinterStatus) -> &'static str {
    match status {
        PrinterStatus::Idle => "idle",
        PrinterStatus::Printing => "printing",
        PrinterStatus::Disabled => "disabled",
        PrinterStatus::Unknown => "unknown",
    }
}

fn select(json: bool, name: &str) -> Result<bool> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GrauwerkError::Config("printer name must not be empty".into()));
    }

    let mut config = data_dir::load_config();
    config.selected_printer = Some(name.to_owned());
    let path = data_dir::save_config(&config)?;
    info!(printer = name, path = %path.display(), "selected printer saved");

    print_one(json, &config, |c| {
        format!(
            "Selected printer: {}",
            c.selected_printer.as_deref().unwrap_or_default()
        )
    })?;
    Ok(true)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProbeReport {
    device: String,
    options: Vec<CapabilityOption>,
    selection: Option<GraySelection>,
    job_options: Vec<String>,
}

async fn probe(json: bool, device: Option<&str>) -> Result<bool> {
    let config = data_dir::load_config();
    let device = config
        .resolve_printer(device)
        .ok_or(GrauwerkError::NoPrinterSelected)?;
    let backend = platform_backend(PrintTimeouts::from_config(&config));

    let caps = PrinterCapabilities::query(&backend, &device).await;
    let selection = select_gray(&caps.options);
    let report = ProbeReport {
        job_options: job_options(selection.as_ref())
            .iter()
            .map(ToString::to_string)
            .collect(),
        device,
        options: caps.options,
        selection,
    };

    print_one(json, &report, |r| {
        let mut lines = vec![format!("{}:", r.device)];
        if r.options.is_empty() {
            lines.push("  (no capability listing)".to_owned());
        }
        for opt in &r.options {
            let values: Vec<String> = opt
                .choices
                .iter()
                .map(|c| {
                    if c.is_default {
                        format!("*{}", c.value)
                    } else {
                        c.value.clone()
                    }
                })
                .collect();
            lines.push(format!("  {}: {}", opt.base_key, values.join(" ")));
        }
        match &r.selection {
            Some(sel) => lines.push(format!("grayscale: {sel}")),
            None => lines.push("grayscale: no match, fallback options".to_owned()),
        }
        lines.push(format!("options: {}", r.job_options.join(" ")));
        lines.join("\n")
    })?;
    Ok(true)
}

async fn print(
    json: bool,
    device: Option<&str>,
    title: Option<&str>,
    prepare: bool,
    input: &str,
) -> Result<bool> {
    let config = data_dir::load_config();

    let report = match build_request(&config, device, title, prepare, input) {
        Ok(request) => {
            let dispatcher = MonochromeDispatcher::from_config(&config);
            match dispatcher.dispatch(&request).await {
                Ok(dispatched) => PrintReport::from(dispatched),
                Err(e) => failure(json, &e),
            }
        }
        Err(e) => failure(json, &e),
    };

    print_one(json, &report, |r| match (&r.job, &r.applied_gray, &r.error) {
        (Some(job), Some(gray), _) => format!("Printed as {job} ({gray})"),
        (Some(job), None, _) => format!("Printed as {job} (fallback grayscale options)"),
        (None, _, Some(error)) => format!("Print failed: {error}"),
        (None, _, None) => "Print failed".to_owned(),
    })?;
    Ok(report.success)
}

/// Turn the command line into a validated request: printer first, then the
/// image.
fn build_request(
    config: &KioskConfig,
    device: Option<&str>,
    title: Option<&str>,
    prepare: bool,
    input: &str,
) -> Result<PrintRequest> {
    let device = config
        .resolve_printer(device)
        .ok_or(GrauwerkError::NoPrinterSelected)?;
    let payload = load_payload(input, prepare, config.capture_scale)?;
    let title = title.unwrap_or(&config.job_title);
    PrintRequest::new(&device, payload, Some(title))
}

fn load_payload(input: &str, prepare: bool, scale: f32) -> Result<ImagePayload> {
    let is_data_url = input.starts_with("data:");
    if prepare && !is_data_url {
        return CaptureProcessor::open(input)?.prepare(scale).to_png_payload();
    }

    // A file may hold the bitmap itself or a saved data URL.
    let payload = if is_data_url {
        ImagePayload::from_input(input.as_bytes())?
    } else {
        ImagePayload::from_input(&std::fs::read(Path::new(input))?)?
    };
    if !prepare {
        return Ok(payload);
    }
    CaptureProcessor::from_bytes(payload.bytes())?
        .prepare(scale)
        .to_png_payload()
}

/// Fold an error into a failed report; the explanation goes to stderr.
fn failure(json: bool, err: &GrauwerkError) -> PrintReport {
    if !json {
        explain(err);
    }
    PrintReport::failed(err.to_string())
}

fn show_config(json: bool) -> Result<bool> {
    let config = data_dir::load_config();
    let path = data_dir::config_path();
    print_one(json, &config, |c| {
        [
            format!("config file:        {}", path.display()),
            format!(
                "selected printer:   {}",
                c.selected_printer.as_deref().unwrap_or("(none)")
            ),
            format!("job title:          {}", c.job_title),
            format!("capture scale:      {}", c.capture_scale),
            format!("probe timeout:      {}s", c.probe_timeout_secs),
            format!("submit timeout:     {}s", c.submit_timeout_secs),
            format!("list timeout:       {}s", c.list_timeout_secs),
            format!("spool directory:    {}", c.spool_root().display()),
        ]
        .join("\n")
    })?;
    Ok(true)
}
