//! End-to-end tests that drive the built `drift` binary against a temp
//! config. Targets use `file://` addresses so no network is involved.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

fn drift_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("drift");
    path
}

struct TestEnv {
    _tmp: TempDir,
    config_path: PathBuf,
    page_path: PathBuf,
    data_dir: PathBuf,
}

fn setup(backend: &str) -> TestEnv {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let page_path = root.join("page.txt");
    fs::write(&page_path, "hello").unwrap();

    let data_dir = root.join("data");
    let storage_path = match backend {
        "json" => data_dir.display().to_string(),
        _ => data_dir.join("drift.sqlite").display().to_string(),
    };

    let config_content = format!(
        r#"[storage]
backend = "{backend}"
path = "{storage_path}"

[watch]
interval_secs = 1
fetch_timeout_secs = 5

[[targets]]
address = "file://{page}"
extract = "whole page"
"#,
        page = page_path.display(),
    );

    let config_path = root.join("drift.toml");
    fs::write(&config_path, config_content).unwrap();

    TestEnv {
        _tmp: tmp,
        config_path,
        page_path,
        data_dir,
    }
}

fn run_drift(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = drift_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run drift binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_init_creates_storage() {
    let env = setup("json");

    let (stdout, stderr, success) = run_drift(&env.config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(env.data_dir.is_dir());

    // Idempotent
    let (_, _, success) = run_drift(&env.config_path, &["init"]);
    assert!(success, "Second init failed (not idempotent)");
}

#[test]
fn test_targets_lists_identifiers() {
    let env = setup("json");

    let (stdout, _, success) = run_drift(&env.config_path, &["targets"]);
    assert!(success);
    assert!(stdout.contains("IDENTIFIER"));
    assert!(stdout.contains("file://"));
    assert!(stdout.contains("whole page"));
}

#[test]
fn test_check_baseline_then_change() {
    let env = setup("json");
    run_drift(&env.config_path, &["init"]);

    // First check establishes the baseline.
    let (stdout, stderr, success) = run_drift(&env.config_path, &["check"]);
    assert!(success, "check failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("baseline saved"), "got: {}", stdout);

    // Unchanged content.
    let (stdout, _, success) = run_drift(&env.config_path, &["check"]);
    assert!(success);
    assert!(stdout.contains("unchanged"), "got: {}", stdout);

    // Content change is detected.
    fs::write(&env.page_path, "hello world").unwrap();
    let (stdout, _, success) = run_drift(&env.config_path, &["check"]);
    assert!(success);
    assert!(stdout.contains("changed"), "got: {}", stdout);

    // On-disk layout: one latest file, one history file with a line per
    // check.
    let entries: Vec<_> = fs::read_dir(&env.data_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    let latest = entries.iter().find(|n| n.ends_with("_latest.json")).unwrap();
    let history = entries
        .iter()
        .find(|n| n.ends_with("_history.jsonl"))
        .unwrap();
    assert_eq!(latest.trim_end_matches("_latest.json").len(), 16);

    let history_data = fs::read_to_string(env.data_dir.join(history)).unwrap();
    assert_eq!(history_data.lines().count(), 3);
}

#[test]
fn test_latest_and_history_output() {
    let env = setup("json");
    run_drift(&env.config_path, &["init"]);
    run_drift(&env.config_path, &["check"]);
    fs::write(&env.page_path, "hello world").unwrap();
    run_drift(&env.config_path, &["check"]);

    let (stdout, _, success) = run_drift(&env.config_path, &["latest"]);
    assert!(success);
    assert!(stdout.contains("fingerprint:"));
    assert!(stdout.contains("content_length: 11"));

    let address = format!("file://{}", env.page_path.display());
    let (stdout, _, success) = run_drift(&env.config_path, &["history", &address]);
    assert!(success);
    assert!(stdout.contains("CHECKED_AT"));
    assert!(stdout.contains("2 of 2 record(s)"));

    let (stdout, _, success) =
        run_drift(&env.config_path, &["history", &address, "--limit", "1"]);
    assert!(success);
    assert!(stdout.contains("1 of 2 record(s)"));
}

#[test]
fn test_latest_without_state_reports_cleanly() {
    let env = setup("json");
    run_drift(&env.config_path, &["init"]);

    let (stdout, _, success) = run_drift(&env.config_path, &["latest"]);
    assert!(success);
    assert!(stdout.contains("no state recorded"));
}

#[test]
fn test_check_failure_sets_exit_code() {
    let env = setup("json");
    run_drift(&env.config_path, &["init"]);

    let (_, stderr, success) = run_drift(
        &env.config_path,
        &["check", "file:///no/such/file.txt"],
    );
    assert!(!success);
    assert!(stderr.contains("error"), "got: {}", stderr);
}

#[test]
fn test_sqlite_backend_roundtrip() {
    let env = setup("sqlite");
    run_drift(&env.config_path, &["init"]);

    let (stdout, stderr, success) = run_drift(&env.config_path, &["check"]);
    assert!(success, "check failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("baseline saved"));

    let (stdout, _, success) = run_drift(&env.config_path, &["check"]);
    assert!(success);
    assert!(stdout.contains("unchanged"));

    let (stdout, _, success) = run_drift(&env.config_path, &["latest"]);
    assert!(success);
    assert!(stdout.contains("fingerprint:"));

    let address = format!("file://{}", env.page_path.display());
    let (stdout, _, success) = run_drift(&env.config_path, &["history", &address]);
    assert!(success);
    assert!(stdout.contains("2 of 2 record(s)"));
}

#[test]
fn test_unknown_backend_rejected() {
    let env = setup("json");
    let config = fs::read_to_string(&env.config_path).unwrap();
    fs::write(
        &env.config_path,
        config.replace("backend = \"json\"", "backend = \"redis\""),
    )
    .unwrap();

    let (_, stderr, success) = run_drift(&env.config_path, &["init"]);
    assert!(!success);
    assert!(stderr.contains("storage backend"), "got: {}", stderr);
}
