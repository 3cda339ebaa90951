//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs.

use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "interval-cli", "--"])
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Parse every stdout line as JSON.
fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("line is not JSON"))
        .collect()
}

#[test]
fn test_plan_reports_total() {
    let (stdout, _, code) = run_cli(&[
        "plan",
        "--get-ready",
        "5",
        "--rounds",
        "2",
        "--rest-rounds",
        "10",
        "--rest-exercises",
        "3",
        "--exercise",
        "Squats:20",
        "--exercise",
        "Plank:40",
    ]);
    assert_eq!(code, 0, "plan failed");
    let plan: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    // 5 + 2 * (20 + 3 + 40) + 10
    assert_eq!(plan["total_secs"], 141);
    assert_eq!(plan["total_clock"], "02:21");
    assert_eq!(plan["phases"][1]["label"], "Squats");
    assert_eq!(plan["phases"].as_array().unwrap().len(), 8);
}

#[test]
fn test_simulate_counts_planned_seconds() {
    let (stdout, _, code) = run_cli(&[
        "simulate",
        "--get-ready",
        "3",
        "--rounds",
        "1",
        "--exercise",
        "Sprint:2",
    ]);
    assert_eq!(code, 0, "simulate failed");
    let lines = json_lines(&stdout);
    assert_eq!(lines[0]["type"], "WorkoutStarted");
    let summary = lines.last().unwrap();
    assert_eq!(summary["type"], "Summary");
    assert_eq!(summary["ticks"], 5);
    assert_eq!(summary["elapsed_secs"], 5);
    assert_eq!(summary["total_secs"], 5);
    assert!(lines.iter().any(|l| l["type"] == "WorkoutCompleted"));
}

#[test]
fn test_run_to_completion_without_input() {
    let (stdout, _, code) = run_cli(&[
        "run",
        "--json",
        "--tick-millis",
        "20",
        "--get-ready",
        "1",
        "--rounds",
        "2",
        "--rest-rounds",
        "1",
        "--exercise",
        "Burpees:2",
    ]);
    assert_eq!(code, 0, "run failed");
    let lines = json_lines(&stdout);
    let last = lines.last().unwrap();
    assert_eq!(last["type"], "StateSnapshot");
    assert_eq!(last["phase"], "completed");
    assert_eq!(last["label"], "Completed!");
    let snapshots = lines.iter().filter(|l| l["type"] == "StateSnapshot").count();
    // 1 + 2 * 2 + 1
    assert_eq!(snapshots, 6);
}

#[test]
fn test_invalid_rounds_fails() {
    let (_, stderr, code) = run_cli(&["plan", "--rounds", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("workout.rounds"), "stderr was: {stderr}");
}

#[test]
fn test_config_get_unknown_key_fails() {
    let (_, stderr, code) = run_cli(&["config", "get", "workout.nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key: workout.nope"));
}

#[test]
fn test_missing_preset_fails() {
    let (_, stderr, code) = run_cli(&["config", "show", "--preset", "/nonexistent/interval.toml"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Failed to load configuration"));
}
