//! Shared test helpers for integration tests
//!
//! Survey fixtures use the default column mapping. Every corner is built so
//! its damper length is `sqrt(offset² + h²)` for an upper mount height `h`:
//! upper mount at `(0, 0, h)`, LCA pivots at `(±1, 0, 0)`.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

/// Helper to get a lineup command
pub fn lineup() -> Command {
    Command::new(cargo::cargo_bin!("lineup"))
}

const POINTS: [&str; 3] = ["Upper", "LCA_Front", "LCA_Rear"];
const AXES: [&str; 3] = ["X", "Y", "Z"];

/// Header row for the given corners, e.g. `["LF", "RF"]`
pub fn header(corners: &[&str]) -> String {
    let mut cols = vec!["Center_Section".to_string(), "Clip".to_string()];
    for corner in corners {
        for point in POINTS {
            for axis in AXES {
                cols.push(format!("{}_{}_{}", corner, point, axis));
            }
        }
    }
    cols.join(",")
}

/// One data row with an upper mount height per corner
pub fn row(center: &str, clip: &str, heights: &[f64]) -> String {
    let mut cells = vec![center.to_string(), clip.to_string()];
    for h in heights {
        for v in [0.0, 0.0, *h, -1.0, 0.0, 0.0, 1.0, 0.0, 0.0] {
            cells.push(v.to_string());
        }
    }
    cells.join(",")
}

pub fn write_csv(dir: &Path, name: &str, header: &str, rows: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut contents = format!("{}\n", header);
    for r in rows {
        contents.push_str(r);
        contents.push('\n');
    }
    fs::write(&path, contents).unwrap();
    path
}

/// Front and rear sheets for two center sections
///
/// Front heights: S1/F1 30, S1/F2 20, S2/F1 10, S2/F2 25.
/// Rear heights: S1/R1 30, S1/R2 20, S2/R1 20, S2/R2 25.
pub fn write_dual(dir: &Path) -> (PathBuf, PathBuf) {
    let front = write_csv(
        dir,
        "front.csv",
        &header(&["LF", "RF"]),
        &[
            row("S1", "F1", &[30.0, 30.0]),
            row("S1", "F2", &[20.0, 20.0]),
            row("S2", "F1", &[10.0, 10.0]),
            row("S2", "F2", &[25.0, 25.0]),
        ],
    );
    let rear = write_csv(
        dir,
        "rear.csv",
        &header(&["LR", "RR"]),
        &[
            row("S1", "R1", &[30.0, 30.0]),
            row("S1", "R2", &[20.0, 20.0]),
            row("S2", "R1", &[20.0, 20.0]),
            row("S2", "R2", &[25.0, 25.0]),
        ],
    );
    (front, rear)
}

/// A unified sheet with one incomplete record (S3/C has a blank cell)
pub fn write_unified(dir: &Path) -> PathBuf {
    let mut incomplete = row("S3", "C", &[1.0, 1.0, 1.0, 1.0]);
    incomplete.truncate(incomplete.len() - 1);
    write_csv(
        dir,
        "survey.csv",
        &header(&["LF", "RF", "LR", "RR"]),
        &[
            row("S1", "A", &[10.0, 20.0, 30.0, 40.0]),
            row("S2", "B", &[50.0, 5.0, 5.0, 5.0]),
            incomplete,
        ],
    )
}
