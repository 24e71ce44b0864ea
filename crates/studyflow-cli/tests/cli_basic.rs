//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a snapshot in a temp
//! directory and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "studyflow-cli", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn init_snapshot(dir: &Path) -> String {
    let file = dir.join("studyflow.json");
    let path = file.to_string_lossy().to_string();
    let (_, stderr, code) = run_cli(&["snapshot", "init", "--file", &path]);
    assert_eq!(code, 0, "snapshot init failed: {stderr}");
    path
}

#[test]
fn test_snapshot_init_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = init_snapshot(dir.path());
    let (_, stderr, code) = run_cli(&["snapshot", "init", "--file", &path]);
    assert_ne!(code, 0);
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_plan_generate_writes_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = init_snapshot(dir.path());
    let (stdout, stderr, code) = run_cli(&[
        "plan",
        "generate",
        "--file",
        &path,
        "--today",
        "2026-03-02",
        "--write",
    ]);
    assert_eq!(code, 0, "plan generate failed: {stderr}");
    assert!(stdout.contains("planned"));

    let (stdout, _, code) = run_cli(&["plan", "show", "--file", &path]);
    assert_eq!(code, 0);
    assert!(!stdout.trim().is_empty());
}

#[test]
fn test_plan_generate_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = init_snapshot(dir.path());
    let (stdout, _, code) = run_cli(&[
        "plan",
        "generate",
        "--file",
        &path,
        "--today",
        "2026-03-02",
        "--json",
    ]);
    assert_eq!(code, 0);
    assert!(serde_json::from_str::<serde_json::Value>(&stdout).is_ok());
}

#[test]
fn test_lock_validate_and_apply() {
    let dir = tempfile::tempdir().unwrap();
    let path = init_snapshot(dir.path());
    let (_, _, code) = run_cli(&[
        "plan",
        "generate",
        "--file",
        &path,
        "--today",
        "2026-03-02",
        "--write",
    ]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(&[
        "lock",
        "validate",
        "2026-03-04",
        "--file",
        &path,
        "--today",
        "2026-03-02",
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("2026-03-04"));

    let (stdout, stderr, code) = run_cli(&[
        "lock",
        "apply",
        "2026-03-04",
        "--file",
        &path,
        "--today",
        "2026-03-02",
        "--evict",
        "--write",
    ]);
    assert_eq!(code, 0, "lock apply failed: {stderr}");
    assert!(stdout.contains("locked"));

    let (stdout, _, code) = run_cli(&["plan", "show", "--file", &path, "--date", "2026-03-04"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("[locked]"));
}

#[test]
fn test_lock_apply_refuses_pending_without_evict() {
    let dir = tempfile::tempdir().unwrap();
    let path = init_snapshot(dir.path());
    let (_, _, code) = run_cli(&[
        "plan",
        "generate",
        "--file",
        &path,
        "--today",
        "2026-03-02",
        "--write",
    ]);
    assert_eq!(code, 0);

    let (_, stderr, code) = run_cli(&[
        "lock",
        "apply",
        "2026-03-04",
        "--file",
        &path,
        "--today",
        "2026-03-02",
        "--write",
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("pending sessions remain"));
}

#[test]
fn test_plan_redistribute_runs_clean() {
    let dir = tempfile::tempdir().unwrap();
    let path = init_snapshot(dir.path());
    let (stdout, stderr, code) = run_cli(&[
        "plan",
        "redistribute",
        "--file",
        &path,
        "--today",
        "2026-03-02",
    ]);
    assert_eq!(code, 0, "redistribute failed: {stderr}");
    assert!(stdout.contains("moved 0 sessions"));
}

#[test]
fn test_check_frequency_reports_all_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let path = init_snapshot(dir.path());
    let (stdout, _, code) = run_cli(&[
        "check",
        "frequency",
        "--file",
        &path,
        "--today",
        "2026-03-02",
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("feasible"));
}

#[test]
fn test_check_unknown_commitment_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = init_snapshot(dir.path());
    let (_, stderr, code) = run_cli(&["check", "commitment", "--id", "nope", "--file", &path]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no such commitment"));
}

#[test]
fn test_sessions_combine_on_empty_day() {
    let dir = tempfile::tempdir().unwrap();
    let path = init_snapshot(dir.path());
    let (stdout, _, code) = run_cli(&["sessions", "combine", "2026-03-04", "--file", &path]);
    assert_eq!(code, 0);
    assert!(stdout.contains("merged 0"));
}
