use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write an empty (all-defaults) config so tests never pick up a user config.
fn config_file(dir: &TempDir) -> String {
    let path = dir.path().join("config.json");
    fs::write(&path, "{}").unwrap();
    path.to_string_lossy().into_owned()
}

fn expiry(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("expiry").unwrap();
    cmd.arg("--config").arg(config_file(dir));
    cmd
}

#[test]
fn test_text_from_stdin() {
    let dir = TempDir::new().unwrap();
    expiry(&dir)
        .args(["text", "--today", "2025-06-15"])
        .write_stdin("Best Before: 12/04/2025\nBatch: 99/99/0000\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Detected expiry date: 2025-04-12"))
        .stdout(predicate::str::contains("Status: expired"));
}

#[test]
fn test_text_not_expired() {
    let dir = TempDir::new().unwrap();
    expiry(&dir)
        .args(["text", "-", "--today", "2025-06-15"])
        .write_stdin("random text 2026-01")
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-01-01"))
        .stdout(predicate::str::contains("not expired"));
}

#[test]
fn test_text_json_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("label.txt");
    fs::write(&input, "EXP 05/23").unwrap();

    let output = expiry(&dir)
        .args(["text", "--format", "json", "--today", "2025-06-15"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["expiry"]["date"], "2023-05-01");
    assert_eq!(json["expiry"]["pass"], "keyword");
    assert_eq!(json["status"], "expired");
}

#[test]
fn test_text_no_date() {
    let dir = TempDir::new().unwrap();
    expiry(&dir)
        .args(["text"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("No valid expiry date found"));
}

#[test]
fn test_text_respects_day_order_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("us.json");
    fs::write(&config, r#"{"extraction": {"day_order": "month_first"}}"#).unwrap();

    Command::cargo_bin("expiry")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["text", "--today", "2025-01-01"])
        .write_stdin("use by 03/04/2025")
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-03-04"));
}

#[test]
fn test_text_missing_file() {
    let dir = TempDir::new().unwrap();
    expiry(&dir)
        .args(["text", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_check_missing_image() {
    let dir = TempDir::new().unwrap();
    expiry(&dir)
        .args(["check", "missing.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_check_missing_models() {
    let dir = TempDir::new().unwrap();
    let image_path = dir.path().join("label.png");
    image::GrayImage::from_pixel(32, 16, image::Luma([255]))
        .save(&image_path)
        .unwrap();
    let models = dir.path().join("models");

    expiry(&dir)
        .arg("check")
        .arg(&image_path)
        .arg("--model-dir")
        .arg(&models)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load OCR models"));
}

#[test]
fn test_config_init() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.json");

    Command::cargo_bin("expiry")
        .unwrap()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success();

    assert!(Path::new(&path).exists());
    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["extraction"]["plausibility_years"], 5);

    Command::cargo_bin("expiry")
        .unwrap()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
