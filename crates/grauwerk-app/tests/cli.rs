// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line tests. Each test gets its own data directory; none of them
// reaches a real print queue.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use tempfile::TempDir;

struct TestEnv {
    data: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            data: TempDir::new().expect("create temp dir"),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("grauwerk");
        cmd.env("GRAUWERK_DATA_DIR", self.data.path())
            .env("RUST_LOG", "off");
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    fn fail_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .code(1)
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

#[test]
fn config_shows_defaults() {
    let env = TestEnv::new();
    let config = env.run_json(&["config"]);
    assert_eq!(config["job_title"], "Grauwerk Photo");
    assert_eq!(config["selected_printer"], Value::Null);
    assert_eq!(config["probe_timeout_secs"], 5);
}

#[test]
fn select_persists_the_printer() {
    let env = TestEnv::new();
    let selected = env.run_json(&["select", "HP_LaserJet"]);
    assert_eq!(selected["selected_printer"], "HP_LaserJet");

    let config = env.run_json(&["config"]);
    assert_eq!(config["selected_printer"], "HP_LaserJet");
    assert!(env.data.path().join("config.json").exists());
}

#[test]
fn blank_printer_name_is_rejected() {
    let env = TestEnv::new();
    let report = env.fail_json(&["select", "   "]);
    assert_eq!(report["success"], false);
    assert!(report["error"].as_str().unwrap().contains("must not be empty"));
}

#[test]
fn print_without_printer_fails_before_reading_the_image() {
    let env = TestEnv::new();
    let report = env.fail_json(&["print", "/no/such/capture.png"]);
    assert_eq!(report["success"], false);
    assert_eq!(report["error"], "No printer selected");
    assert!(report.get("job").is_none());
    assert!(report.get("appliedGray").is_none());
}

#[test]
fn print_rejects_non_image_data_url() {
    let env = TestEnv::new();
    let report = env.fail_json(&["print", "--device", "Office", "data:text/plain;base64,aGk="]);
    assert_eq!(report["error"], "Invalid image data URL");
}

#[test]
fn probe_without_printer_fails() {
    let env = TestEnv::new();
    let report = env.fail_json(&["probe"]);
    assert_eq!(report["error"], "No printer selected");
}

#[test]
fn text_mode_failure_gives_a_hint() {
    let env = TestEnv::new();
    let out = env
        .cmd()
        .args(["print", "/no/such/capture.png"])
        .assert()
        .failure()
        .get_output()
        .clone();
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stdout.trim(), "Print failed: No printer selected");
    assert!(stderr.contains("action needed: No printer selected."));
    assert!(stderr.contains("hint: Open the settings and choose a printer"));
    assert!(!stderr.contains("another attempt may succeed"));
}

#[test]
fn bad_capture_is_explained_as_retriable() {
    let env = TestEnv::new();
    let out = env
        .cmd()
        .args(["print", "--device", "Office", "data:text/plain;base64,aGk="])
        .assert()
        .failure()
        .get_output()
        .clone();
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("temporary problem: The photo could not be prepared for printing."));
    assert!(stderr.contains("hint: another attempt may succeed"));
}

#[test]
fn command_error_in_text_mode_names_the_error() {
    let env = TestEnv::new();
    let out = env.cmd().arg("probe").assert().failure().code(1).get_output().clone();
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error: No printer selected"));
    assert!(stderr.contains("action needed: No printer selected."));
    assert!(out.stdout.is_empty());
}

#[test]
fn printers_is_always_a_list() {
    let env = TestEnv::new();
    let printers = env.run_json(&["printers"]);
    assert!(printers.is_array());
}

#[test]
fn unreadable_config_falls_back_to_defaults() {
    let env = TestEnv::new();
    std::fs::write(env.data.path().join("config.json"), "{ not json").expect("write config");
    let config = env.run_json(&["config"]);
    assert_eq!(config["job_title"], "Grauwerk Photo");
}
