//! Integration tests for the CLI interface

mod common;

use assert_cmd::Command;
use cityforge::testing::fixtures;
use common::config_file;
use predicates::prelude::*;
use tempfile::TempDir;

fn cityforge() -> Command {
    let mut cmd = Command::cargo_bin("cityforge").unwrap();
    cmd.env_remove("CITYFORGE_API_KEY")
        .env_remove("GEMINI_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help_flag() {
    cityforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_invalid_command() {
    cityforge()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_parse_saved_plan() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("plan.md");
    std::fs::write(&file, fixtures::plan_text("₹12,34,567")).unwrap();
    let (_config_dir, config) = config_file("");

    cityforge()
        .arg("--config")
        .arg(&config)
        .arg("parse")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Grand total: ₹12,34,567 (over budget)"))
        .stdout(predicate::str::contains(fixtures::ASCII_BLUEPRINT));
}

#[test]
fn test_parse_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("plan.md");
    std::fs::write(&file, fixtures::plan_text("₹8,00,000")).unwrap();
    let (_config_dir, config) = config_file("");

    let output = cityforge()
        .arg("--config")
        .arg(&config)
        .args(["parse", "--json"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["grandTotal"], 800_000.0);
    assert_eq!(value["overBudget"], false);
}

#[test]
fn test_parse_missing_file_fails() {
    let (_config_dir, config) = config_file("");
    cityforge()
        .arg("--config")
        .arg(&config)
        .args(["parse", "/nonexistent/plan.md"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_plan_without_api_key_is_a_usage_error() {
    let (_config_dir, config) = config_file("[generation]\nmodel = \"gemini-1.5-flash\"\n");
    cityforge()
        .arg("--config")
        .arg(&config)
        .args(["plan", "a small coastal town"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("API key"));
}

#[test]
fn test_missing_config_file_is_a_usage_error() {
    cityforge()
        .args(["--config", "/nonexistent/cityforge.toml", "parse", "x"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Config file not found"));
}
