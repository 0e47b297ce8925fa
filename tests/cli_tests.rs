//! CLI command tests

mod common;

use common::{header, lineup, row, write_csv, write_dual, write_unified};
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn json_stdout(output: std::process::Output) -> Value {
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    lineup()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("damper lengths"));
}

#[test]
fn test_version_displays() {
    lineup()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lineup"));
}

#[test]
fn test_unknown_command_fails() {
    lineup()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_analyze_without_data_fails() {
    lineup()
        .arg("analyze")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No survey data given"));
}

// ============================================================================
// Analyze Command Tests
// ============================================================================

#[test]
fn test_analyze_unified_tsv() {
    let tmp = TempDir::new().unwrap();
    let data = write_unified(tmp.path());

    let output = lineup()
        .args(["analyze", "--data"])
        .arg(&data)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[0].starts_with("CENTER\tCLIP\tLF\tRF\tLR\tRR"));
    // S2/B has the longest LF and sorts first; S3/C is dropped
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("S2\tB\t"));
    assert!(lines[2].starts_with("S1\tA\t"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Dropped survey.csv row 3"));
}

#[test]
fn test_analyze_dual_json() {
    let tmp = TempDir::new().unwrap();
    let (front, rear) = write_dual(tmp.path());

    let output = lineup()
        .args(["analyze", "--format", "json", "--front"])
        .arg(&front)
        .arg("--rear")
        .arg(&rear)
        .output()
        .unwrap();
    let json = json_stdout(output);

    assert_eq!(json["mode"], "dual");
    let combos = json["combinations"].as_array().unwrap();
    assert_eq!(combos.len(), 8);
    // S1/F1 has the longest LF
    assert_eq!(combos[0]["front_clip"], "F1");
    assert_eq!(combos[0]["ranks"]["lf"], 1);
}

#[test]
fn test_analyze_limit_and_sort() {
    let tmp = TempDir::new().unwrap();
    let (front, rear) = write_dual(tmp.path());

    let output = lineup()
        .args(["analyze", "-f", "json", "--sort", "center", "--limit", "3", "--front"])
        .arg(&front)
        .arg("--rear")
        .arg(&rear)
        .output()
        .unwrap();
    let json = json_stdout(output);
    let combos = json["combinations"].as_array().unwrap();
    assert_eq!(combos.len(), 3);
    assert!(combos.iter().all(|c| c["center_section"] == "S1"));
}

#[test]
fn test_missing_columns_are_listed() {
    let tmp = TempDir::new().unwrap();
    let data = write_csv(
        tmp.path(),
        "survey.csv",
        &header(&["LF", "RF", "LR"]),
        &[row("S1", "A", &[1.0, 1.0, 1.0])],
    );

    lineup()
        .args(["analyze", "--data"])
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("9 mapped column(s) not found"));
}

#[test]
fn test_disjoint_center_sections_fail() {
    let tmp = TempDir::new().unwrap();
    let front = write_csv(tmp.path(), "f.csv", &header(&["LF", "RF"]), &[row("S1", "F1", &[1.0, 1.0])]);
    let rear = write_csv(tmp.path(), "r.csv", &header(&["LR", "RR"]), &[row("S9", "R1", &[1.0, 1.0])]);

    lineup()
        .arg("analyze")
        .arg("--front")
        .arg(&front)
        .arg("--rear")
        .arg(&rear)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching center sections"));
}

#[test]
fn test_custom_mapping_file() {
    let tmp = TempDir::new().unwrap();
    let data = write_unified(tmp.path());
    let renamed = fs::read_to_string(&data)
        .unwrap()
        .replacen("Clip,", "Clip ID,", 1);
    fs::write(&data, renamed).unwrap();

    let mapping = tmp.path().join("mapping.yaml");
    fs::write(&mapping, "clip_col: Clip ID\n").unwrap();

    lineup()
        .args(["analyze", "--data"])
        .arg(&data)
        .arg("--mapping")
        .arg(&mapping)
        .assert()
        .success()
        .stdout(predicate::str::contains("S1\tA\t"));
}

// ============================================================================
// Rollup Command Tests
// ============================================================================

#[test]
fn test_rollup_by_front_clip() {
    let tmp = TempDir::new().unwrap();
    let (front, rear) = write_dual(tmp.path());

    lineup()
        .args(["rollup", "--by", "front-clip", "--front"])
        .arg(&front)
        .arg("--rear")
        .arg(&rear)
        .assert()
        .success()
        .stdout(predicate::str::contains("FRONT CLIP"))
        .stderr(predicate::str::contains("LF/RF length correlation"));
}

#[test]
fn test_rollup_by_center_json() {
    let tmp = TempDir::new().unwrap();
    let (front, rear) = write_dual(tmp.path());

    let output = lineup()
        .args(["rollup", "-f", "json", "--front"])
        .arg(&front)
        .arg("--rear")
        .arg(&rear)
        .output()
        .unwrap();
    let json = json_stdout(output);
    let groups = json["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["center_section"], "S1");
    assert_eq!(groups[0]["front"]["count"], 2);
}

// ============================================================================
// Lineup Command Tests
// ============================================================================

#[test]
fn test_lineup_assigns_each_clip_once() {
    let tmp = TempDir::new().unwrap();
    let (front, rear) = write_dual(tmp.path());

    let output = lineup()
        .args(["lineup", "-f", "json", "--front"])
        .arg(&front)
        .arg("--rear")
        .arg(&rear)
        .output()
        .unwrap();
    let json = json_stdout(output);

    let rows = json["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["center_section"], "S1");
    assert_eq!(rows[0]["front_clip"], "F1");
    assert_eq!(rows[0]["rear_clip"], "R1");
    assert_eq!(rows[1]["center_section"], "S2");
    assert_eq!(rows[1]["front_clip"], "F2");
    assert_eq!(rows[1]["rear_clip"], "R2");
    assert_eq!(json["manual"], false);
    assert!(json["warnings"].as_array().unwrap().is_empty());
}

#[test]
fn test_lineup_rejects_bad_weight_sum() {
    let tmp = TempDir::new().unwrap();
    let (front, rear) = write_dual(tmp.path());

    lineup()
        .args(["lineup", "--weights", "25,25,25,26", "--front"])
        .arg(&front)
        .arg("--rear")
        .arg(&rear)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must sum to 100"));
}

#[test]
fn test_lineup_override_flags_duplicates() {
    let tmp = TempDir::new().unwrap();
    let (front, rear) = write_dual(tmp.path());

    lineup()
        .args(["lineup", "--set-front", "S2=F1", "--track", "S2=ssw", "--front"])
        .arg(&front)
        .arg("--rear")
        .arg(&rear)
        .assert()
        .success()
        .stdout(predicate::str::contains("SSW"))
        .stdout(predicate::str::contains("dup-front"))
        .stderr(predicate::str::contains("Duplicate front clip F1 used by S1, S2"));
}

#[test]
fn test_lineup_override_unknown_clip_fails() {
    let tmp = TempDir::new().unwrap();
    let (front, rear) = write_dual(tmp.path());

    lineup()
        .args(["lineup", "--set-rear", "S1=R9", "--front"])
        .arg(&front)
        .arg("--rear")
        .arg(&rear)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown rear clip: R9"));
}

#[test]
fn test_lineup_single_sheet() {
    let tmp = TempDir::new().unwrap();
    let data = write_unified(tmp.path());

    lineup()
        .args(["lineup", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("S1"))
        .stdout(predicate::str::contains("S2"));
}

// ============================================================================
// What-If Command Tests
// ============================================================================

#[test]
fn test_whatif_shows_availability() {
    let tmp = TempDir::new().unwrap();
    let (front, rear) = write_dual(tmp.path());

    let output = lineup()
        .args(["whatif", "--center", "S2", "--axle", "front", "-f", "csv", "--front"])
        .arg(&front)
        .arg("--rear")
        .arg(&rear)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("F1,,assigned to S1,"));
    assert!(lines[2].starts_with("F2,yes,available,"));
    assert!(lines[2].ends_with("+0.000,+0.000"));
}

#[test]
fn test_whatif_unknown_center_fails() {
    let tmp = TempDir::new().unwrap();
    let (front, rear) = write_dual(tmp.path());

    lineup()
        .args(["whatif", "--center", "S7", "--front"])
        .arg(&front)
        .arg("--rear")
        .arg(&rear)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown center section: S7"));
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_init_and_show() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("mapping.json");

    lineup()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created column mapping"));
    assert!(path.exists());

    lineup()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    lineup()
        .args(["config", "init", "--force", "--output"])
        .arg(&path)
        .assert()
        .success();

    lineup()
        .args(["config", "show", "--mapping"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("lf_upper_x: LF_Upper_X"));
}

#[test]
fn test_config_rejects_unknown_extension() {
    let tmp = TempDir::new().unwrap();
    lineup()
        .args(["config", "init", "--output"])
        .arg(tmp.path().join("mapping.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported mapping file extension"));
}

#[test]
fn test_completions() {
    lineup()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lineup"));
}
