// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! CLI tests for nativelog
//!
//! These tests cover argument parsing and run the built binary end to end.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command as Process, Stdio};

use clap::Parser;
use nativelog::config::{Command, Config, OutputFormat};
use tracing::Level;

fn binary() -> Process {
    Process::new(env!("CARGO_BIN_EXE_nativelog"))
}

/// Run the binary with `args`, feeding `stdin`; returns (exit ok, stdout)
fn run_with_stdin(args: &[&str], stdin: &str) -> (bool, String) {
    let mut child = binary()
        .args(args)
        .arg("--quiet")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn nativelog");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
    )
}

// ============================================================================
// Argument parsing
// ============================================================================

#[test]
fn test_parse_subcommand() {
    let config = Config::try_parse_from(["nativelog", "parse", "--format", "gtest-list", "out.txt"])
        .expect("parse should succeed");
    match config.command {
        Some(Command::Parse {
            format,
            run_name,
            input,
        }) => {
            assert_eq!(format, OutputFormat::GtestList);
            assert!(run_name.is_none());
            assert_eq!(input, Some(PathBuf::from("out.txt")));
        }
        other => panic!("expected Parse command, got {other:?}"),
    }
}

#[test]
fn test_parse_requires_format() {
    assert!(Config::try_parse_from(["nativelog", "parse"]).is_err());
}

#[test]
fn test_unknown_format_rejected() {
    assert!(Config::try_parse_from(["nativelog", "parse", "-f", "xml"]).is_err());
}

#[test]
fn test_verify_stress_requires_expected() {
    assert!(Config::try_parse_from(["nativelog", "verify-stress"]).is_err());
    let config = Config::try_parse_from(["nativelog", "verify-stress", "--expected", "10"])
        .expect("parse should succeed");
    assert!(matches!(
        config.command,
        Some(Command::VerifyStress { expected: 10, .. })
    ));
}

#[test]
fn test_global_flags_after_subcommand() {
    let config = Config::try_parse_from([
        "nativelog",
        "verify-benchmark",
        "-v",
        "--pretty",
        "--chunk-lines",
        "3",
    ])
    .expect("parse should succeed");
    assert!(config.verbose);
    assert!(config.pretty);
    assert_eq!(config.chunk_lines(), 3);
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_verbose_takes_precedence_over_quiet() {
    let config = Config::try_parse_from(["nativelog", "-v", "-q"]).expect("parse should succeed");
    assert_eq!(config.log_level(), Level::DEBUG);
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_binary_parses_listing_from_stdin() {
    let (ok, stdout) = run_with_stdin(
        &["parse", "--format", "gtest-list", "--run-name", "module"],
        "Suite.\n  One\n  Two/0\n",
    );
    assert!(ok);
    let json: serde_json::Value = serde_json::from_str(stdout.trim()).expect("json");
    assert!(json["name"] == "module");
    assert!(json["expected_count"] == 2);
}

#[test]
fn test_binary_fails_on_bad_listing() {
    let (ok, stdout) = run_with_stdin(&["parse", "--format", "gtest-list"], "oops\n");
    assert!(!ok);
    assert!(stdout.is_empty());
}

#[test]
fn test_binary_verify_stress() {
    let log = "==== Completed pass: 0\n==== Completed pass: 1\n";
    let (ok, _) = run_with_stdin(&["verify-stress", "--expected", "2"], log);
    assert!(ok);

    let (ok, stdout) = run_with_stdin(&["verify-stress", "--expected", "3"], log);
    assert!(!ok);
    assert!(stdout.contains("\"iterations\":2"));
}

#[test]
fn test_binary_verify_benchmark_requires_summary() {
    let (ok, stdout) = run_with_stdin(&["verify-benchmark"], "no summary here\n");
    assert!(!ok);
    assert!(stdout.contains("\"avg-iteration-time\":0.0"));

    let (ok, _) = run_with_stdin(
        &["verify-benchmark"],
        "Time per iteration min: 1 avg: 2.5 max: 4\n",
    );
    assert!(ok);
}

#[test]
fn test_binary_parse_benchmark_without_summary_reports_zero() {
    let (ok, stdout) = run_with_stdin(&["parse", "--format", "benchmark"], "no summary here\n");
    assert!(ok);
    assert!(stdout.contains("\"avg-iteration-time\":0.0"));
}
