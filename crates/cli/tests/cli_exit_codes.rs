//! End-to-end checks of the `seqrun` binary

#![cfg(unix)]

use std::path::Path;
use std::process::Command;

// `clean` talks on stdout, `all` fails: the binary step must never run
const NOISY_FAILING_MAKEFILE: &str = "\
clean:
\t@echo removing objects

all:
\t@echo 'csapp.h: No such file' 1>&2; exit 1
";

fn seqrun() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seqrun"));
    cmd.env_remove("SEQRUN_WORKING_DIR")
        .env_remove("SEQRUN_LOG_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

fn make_available() -> bool {
    Command::new("make")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn scratch_project(makefile: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Makefile"), makefile).unwrap();
    dir
}

fn run_in(dir: &Path, extra: &[&str]) -> std::process::Output {
    seqrun()
        .arg("--working-dir")
        .arg(dir)
        .args(extra)
        .output()
        .unwrap()
}

/// No Makefile: `make clean` fails (or `make` is missing) and nothing after it runs
#[test]
fn test_empty_dir_fails_on_first_command() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_in(dir.path(), &["--summary"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("seqrun: Error executing command: make clean"));
    assert!(stderr.contains("seqrun: Return code:"));
    assert!(stderr.contains("SKIPPED"));
    assert!(!stderr.contains("Error executing command: make all"));
}

#[test]
fn test_failure_output_is_plain_diagnostic_when_piped() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_in(dir.path(), &[]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("seqrun: Error executing command: make clean"));
    assert!(!stderr.contains('\u{1b}'), "ANSI escapes in: {:?}", stderr);
    assert!(!stderr.contains("WARN"), "log noise in: {:?}", stderr);
}

#[test]
fn test_shell_options_are_not_accepted() {
    let dir = tempfile::tempdir().unwrap();

    for extra in [
        &["--shell", "/no/such/shell"][..],
        &["--shell-flag=--bogus"][..],
    ] {
        let output = run_in(dir.path(), extra);

        assert_eq!(output.status.code(), Some(2), "args: {:?}", extra);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("unexpected argument"));
        assert!(!stderr.contains("Error executing command"));
    }
}

#[test]
fn test_invalid_working_dir_is_rejected_before_running() {
    let output = seqrun()
        .args(["--working-dir", "/definitely/not/a/real/dir/seqrun"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid runner configuration"));
    assert!(!stderr.contains("Error executing command"));
}

#[test]
fn test_json_format_emits_report() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_in(dir.path(), &["--format", "json"]);

    assert!(!output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["state"]["state"], "FAILED");
    assert_eq!(report["state"]["index"], 0);
    assert_eq!(report["total"], 3);
    assert_eq!(report["steps"].as_array().unwrap().len(), 1);
}

#[test]
fn test_text_mode_streams_successful_step_output() {
    if !make_available() {
        eprintln!("make not installed, skipping");
        return;
    }
    let dir = scratch_project(NOISY_FAILING_MAKEFILE);

    let output = run_in(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("removing objects"));
    assert!(stderr.contains("seqrun: Error executing command: make all"));
}

#[test]
fn test_json_mode_streams_to_stderr_and_keeps_stdout_clean() {
    if !make_available() {
        eprintln!("make not installed, skipping");
        return;
    }
    let dir = scratch_project(NOISY_FAILING_MAKEFILE);

    let output = run_in(dir.path(), &["--format", "json"]);

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["steps"][0]["stdout"], "removing objects\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("removing objects"));
}

#[test]
fn test_quiet_suppresses_streaming() {
    if !make_available() {
        eprintln!("make not installed, skipping");
        return;
    }
    let dir = scratch_project(NOISY_FAILING_MAKEFILE);

    let output = run_in(dir.path(), &["--quiet"]);

    assert!(!String::from_utf8_lossy(&output.stdout).contains("removing objects"));
    // Failing step output still reaches the diagnostic
    assert!(String::from_utf8_lossy(&output.stderr).contains("csapp.h: No such file"));
}
