#!/usr/bin/env rust
//! Integration tests for the docoracle CLI
//!
//! Matching runs use a small vector table written to a temporary directory,
//! so no model download is needed.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Test helper to get the CLI binary
fn docoracle_cmd() -> Command {
    Command::cargo_bin("docoracle").unwrap()
}

const VECTORS: &str = "3 2\nempty 1.0 0.0\nsize 0.0 1.0\nitem 0.5 0.5\n";

const JOBS: &str = r#"[
  {
    "method": {"return_type": "void", "name": "org.example.Stack.push",
               "parameters": [{"name": "item", "type_name": "Object"}]},
    "comment": "if the stack is empty",
    "proposition": {"subject": {"text": "stack", "passive": false}, "predicate": "is empty"},
    "subject": {"kind": "general", "expression": "args[0]", "identifiers": ["item"]},
    "candidates": [
      {"kind": "bound_call", "member": {"name": "size"}, "receiver": "args[0]"},
      {"kind": "bound_call", "member": {"name": "isEmpty"}, "receiver": "args[0]"},
      {"kind": "bound_call", "member": {"name": "isEmpty"}, "receiver": "target"}
    ],
    "expected_match": "args[0]:isEmpty()"
  }
]"#;

/// Write a vector-table configuration, the vectors and the jobs into `dir`.
fn write_fixture(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let vectors = dir.join("vectors.txt");
    fs::write(&vectors, VECTORS).unwrap();

    let config = dir.join("docoracle.yml");
    fs::write(
        &config,
        format!(
            "embedding:\n  backend: vector_table\n  vectors_path: {}\n",
            vectors.display()
        ),
    )
    .unwrap();

    let jobs = dir.join("jobs.json");
    fs::write(&jobs, JOBS).unwrap();
    (config, jobs)
}

#[test]
fn test_cli_help() {
    docoracle_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("match"))
        .stdout(predicate::str::contains("classify"));
}

#[test]
fn test_print_default_config() {
    docoracle_cmd()
        .arg("print-default-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("distance_threshold: 3.6"))
        .stdout(predicate::str::contains("long_comment_threshold: 6.0"));
}

#[test]
fn test_init_config_refuses_overwrite() {
    let temp_dir = tempdir().unwrap();
    let output = temp_dir.path().join("config.yml");

    docoracle_cmd()
        .args(["init-config", "--output"])
        .arg(&output)
        .assert()
        .success();
    assert!(output.exists());

    docoracle_cmd()
        .args(["init-config", "--output"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    docoracle_cmd()
        .args(["init-config", "--force", "--output"])
        .arg(&output)
        .assert()
        .success();
}

#[test]
fn test_validate_config() {
    let temp_dir = tempdir().unwrap();
    let (config, _) = write_fixture(temp_dir.path());

    docoracle_cmd()
        .args(["validate-config", "--details", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));

    let invalid = temp_dir.path().join("invalid.yml");
    fs::write(&invalid, "matcher:\n  distance_threshold: -2.0\n").unwrap();
    docoracle_cmd()
        .args(["validate-config", "--config"])
        .arg(&invalid)
        .assert()
        .failure();
}

#[test]
fn test_match_json_output() {
    let temp_dir = tempdir().unwrap();
    let (config, jobs) = write_fixture(temp_dir.path());

    docoracle_cmd()
        .args(["match", "--format", "json", "--config"])
        .arg(&config)
        .arg("--jobs")
        .arg(&jobs)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""best": "args[0]:isEmpty()""#))
        .stdout(predicate::str::contains("target:isEmpty()").not());
}

#[test]
fn test_match_writes_audit_log() {
    let temp_dir = tempdir().unwrap();
    let (config, jobs) = write_fixture(temp_dir.path());
    let audit_dir = temp_dir.path().join("audit");

    docoracle_cmd()
        .args(["match", "--config"])
        .arg(&config)
        .arg("--jobs")
        .arg(&jobs)
        .arg("--audit-dir")
        .arg(&audit_dir)
        .assert()
        .success();

    let csv = fs::read_to_string(audit_dir.join("org.example.Stack.csv")).unwrap();
    assert!(csv.contains("Method;org.example.Stack.push(Object item)"));
    assert!(csv.contains("Comment;if the stack is empty"));
    assert!(csv.contains("Number of candidates;3"));
    assert!(csv.contains("Did match succeed;true"));
}

#[test]
fn test_match_fails_without_vectors() {
    let temp_dir = tempdir().unwrap();
    let (_, jobs) = write_fixture(temp_dir.path());
    let config = temp_dir.path().join("missing.yml");
    fs::write(
        &config,
        "embedding:\n  backend: vector_table\n  vectors_path: /nonexistent/vectors.txt\n",
    )
    .unwrap();

    docoracle_cmd()
        .args(["match", "--config"])
        .arg(&config)
        .arg("--jobs")
        .arg(&jobs)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Embedding initialization failed"));
}

#[test]
fn test_classify_missing_symbol_from_stdin() {
    docoracle_cmd()
        .args(["classify", "--diagnostic", "-", "--method", "org.example.Stack.push"])
        .write_stdin("Oracle.java:3: error: cannot find symbol\n  symbol:   variable myVar\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("myVar"))
        .stdout(predicate::str::contains("replace_symbols"));
}

#[test]
fn test_classify_oracle_mode() {
    let temp_dir = tempdir().unwrap();
    let diagnostic = temp_dir.path().join("diag.txt");
    fs::write(
        &diagnostic,
        "error: unreported exception java.io.IOException; must be caught or declared to be thrown",
    )
    .unwrap();

    docoracle_cmd()
        .args(["classify", "--mode", "oracle", "--method", "org.example.Stack.close"])
        .arg("--diagnostic")
        .arg(&diagnostic)
        .args(["--oracle", "target.close()"])
        .assert()
        .success()
        .stdout(predicate::str::contains("java.io.IOException"))
        .stdout(predicate::str::contains("declare_exception"));
}

#[test]
fn test_classify_rejects_unqualified_method() {
    docoracle_cmd()
        .args(["classify", "--diagnostic", "-", "--method", "push"])
        .write_stdin("error: incomparable types: int and String")
        .assert()
        .failure();
}
