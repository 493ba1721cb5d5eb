//! CLI Integration Tests
//!
//! Tests the CLI binary directly using assert_cmd to exercise main.rs code paths.

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use axum::{routing::post, Json, Router};
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tempfile::TempDir;
use xlsx_translator::excel::{ExcelExporter, ExcelImporter};
use xlsx_translator::{CellValue, Sheet, Workbook};

const ENV_VARS: [&str; 5] = [
    "RUST_LOG",
    "XLSX_TRANSLATOR_SOURCE",
    "XLSX_TRANSLATOR_TARGET",
    "XLSX_TRANSLATOR_ENDPOINT",
    "XLSX_TRANSLATOR_API_KEY",
];

fn translator_cmd() -> Command {
    let mut cmd = Command::cargo_bin("xlsx-translate").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

fn write_workbook(dir: &Path) -> PathBuf {
    let mut workbook = Workbook::new();
    workbook.add_sheet(
        Sheet::new("Menú")
            .with_headers(["plato", "precio"])
            .with_row(vec![CellValue::from("café"), CellValue::Number(2.5)])
            .with_row(vec![CellValue::from("té"), CellValue::Number(2.0)]),
    );
    workbook.add_sheet(Sheet::new("Info").with_row(["ascii only"]));

    let path = dir.join("menu.xlsx");
    ExcelExporter::new(workbook).export(&path).unwrap();
    path
}

/// Mock LibreTranslate service on a background thread; returns its URL
fn start_mock_service() -> String {
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let app = Router::new().route(
                "/translate",
                post(|Json(body): Json<Value>| async move {
                    let q = body["q"].as_str().unwrap_or_default();
                    let target = body["target"].as_str().unwrap_or_default();
                    Json(json!({"translatedText": format!("{} {}", target, q)}))
                }),
            );
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    let addr = rx.recv().unwrap();
    format!("http://{}/translate", addr)
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    translator_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("xlsx-translate"))
        .stdout(predicate::str::contains("COMMANDS"));
}

#[test]
fn test_cli_version() {
    translator_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xlsx-translate"));
}

#[test]
fn test_translate_help() {
    translator_cmd()
        .args(["translate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Translate a workbook"))
        .stdout(predicate::str::contains("--target"));
}

// ═══════════════════════════════════════════════════════════════════════════
// ERROR TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_translate_missing_file() {
    translator_cmd()
        .args(["translate", "does-not-exist.xlsx", "--target", "en"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FileNotFound"));
}

#[test]
fn test_translate_requires_target() {
    let dir = TempDir::new().unwrap();
    let input = write_workbook(dir.path());

    translator_cmd()
        .arg("translate")
        .arg(&input)
        .args(["--source", "es"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("target language is required"));

    assert!(!dir.path().join("translated_menu.xlsx").exists());
}

#[test]
fn test_translate_target_from_env() {
    let dir = TempDir::new().unwrap();
    let input = write_workbook(dir.path());
    let endpoint = start_mock_service();

    translator_cmd()
        .env("XLSX_TRANSLATOR_TARGET", "en")
        .arg("translate")
        .arg(&input)
        .args(["--endpoint", &endpoint])
        .assert()
        .success();

    assert!(dir.path().join("translated_menu.xlsx").exists());
}

// ═══════════════════════════════════════════════════════════════════════════
// TRANSLATE AND SCAN TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_translate_end_to_end() {
    let dir = TempDir::new().unwrap();
    let input = write_workbook(dir.path());
    let endpoint = start_mock_service();

    translator_cmd()
        .arg("translate")
        .arg(&input)
        .args(["-s", "es", "-t", "en", "--endpoint", &endpoint, "--workers", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Translation Complete"));

    let output = dir.path().join("translated_menu.xlsx");
    let workbook = ExcelImporter::new(&output).import().unwrap();

    assert_eq!(workbook.sheet_names(), vec!["en Menú", "Info"]);
    let menu = &workbook.sheets[0];
    assert_eq!(menu.cell(0, 0), Some(&CellValue::from("en café")));
    assert_eq!(menu.cell(1, 0), Some(&CellValue::from("en té")));
    assert_eq!(menu.cell(0, 1), Some(&CellValue::Number(2.5)));
}

#[test]
fn test_translate_unreachable_service_keeps_originals() {
    let dir = TempDir::new().unwrap();
    let input = write_workbook(dir.path());
    let output = dir.path().join("out.xlsx");

    translator_cmd()
        .arg("translate")
        .arg(&input)
        .args(["-t", "en", "--endpoint", "http://127.0.0.1:1/translate"])
        .args(["--timeout", "2", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("kept in their original language"))
        .stderr(predicate::str::contains("Translation call failed"))
        .stderr(predicate::str::contains("Failed to translate item"))
        .stderr(predicate::str::contains("Menú"));

    let workbook = ExcelImporter::new(&output).import().unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Menú", "Info"]);
    assert_eq!(
        workbook.sheets[0].cell(0, 0),
        Some(&CellValue::from("café"))
    );
}

#[test]
fn test_scan_lists_flagged_items() {
    let dir = TempDir::new().unwrap();
    let input = write_workbook(dir.path());

    translator_cmd()
        .arg("scan")
        .arg(&input)
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN"))
        .stdout(predicate::str::contains("Menú"))
        .stdout(predicate::str::contains("café"))
        .stdout(predicate::str::contains("Distinct strings to translate:"));

    assert!(!dir.path().join("translated_menu.xlsx").exists());
}

#[test]
fn test_scan_unknown_sheet() {
    let dir = TempDir::new().unwrap();
    let input = write_workbook(dir.path());

    translator_cmd()
        .arg("scan")
        .arg(&input)
        .args(["--sheet", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config"));
}
