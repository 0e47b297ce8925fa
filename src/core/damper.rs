//! Damper length calculator
//!
//! For each corner the lower damper mount is derived from the lower control
//! arm (LCA):
//!
//! ```text
//! lca_center  = (lca_front + lca_rear) / 2
//! lower_mount = (lca_center.x, lca_center.y ∓ |offset|, lca_center.z)
//! length      = |upper_mount - lower_mount|
//! ```
//!
//! The offset moves outboard: `-` for left corners, `+` for right corners.
//!
//! With Z normalization enabled, the median of every raw `lca_center.z` in the
//! whole batch (all sheets, all corners) replaces each corner's Z. The median
//! is taken once, from raw data, before any lower mount is derived.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::error::Warning;
use crate::core::geometry::{distance3, median, midpoint3, Point3};
use crate::entities::corner::{Corner, PerCorner, Side};
use crate::entities::survey::{CornerHardpoints, SurveyRecord};

/// Derived geometry for one corner of one record
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CornerGeometry {
    pub lca_center: Point3,
    pub lower_mount: Point3,
    pub damper_length: f64,
}

/// LCA center: midpoint of the front and rear pivots
pub fn lca_center(hp: &CornerHardpoints) -> Point3 {
    midpoint3(&hp.lca_front, &hp.lca_rear)
}

/// Lower damper mount: LCA center pushed outboard by the offset magnitude
pub fn lower_mount(corner: Corner, lca_center: &Point3, offset: f64) -> Point3 {
    let outboard = match corner.side() {
        Side::Left => -offset.abs(),
        Side::Right => offset.abs(),
    };
    Point3::new(lca_center.x, lca_center.y + outboard, lca_center.z)
}

/// Full corner geometry, optionally with the LCA center Z replaced
pub fn corner_geometry(
    corner: Corner,
    hp: &CornerHardpoints,
    offset: f64,
    z_override: Option<f64>,
) -> CornerGeometry {
    let mut center = lca_center(hp);
    if let Some(z) = z_override {
        center.z = z;
    }
    let lower = lower_mount(corner, &center, offset);
    CornerGeometry {
        lca_center: center,
        lower_mount: lower,
        damper_length: distance3(&hp.upper, &lower),
    }
}

/// Whether any surveyed coordinate of the corner is missing
fn has_missing_coordinate(hp: &CornerHardpoints) -> bool {
    [hp.upper, hp.lca_front, hp.lca_rear]
        .iter()
        .any(|p| p.iter().any(|v| v.is_nan()))
}

/// Median raw LCA center Z across every corner of every record in `sheets`
pub fn lca_median_z(sheets: &[&[SurveyRecord]]) -> Option<f64> {
    median(
        sheets
            .iter()
            .flat_map(|records| records.iter())
            .flat_map(|rec| rec.corners().map(|(_, hp)| lca_center(hp).z)),
    )
}

/// A record with all carried corners measured
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasuredRecord {
    pub row: usize,
    pub center_section: String,
    pub clip: String,
    pub geometry: PerCorner<Option<CornerGeometry>>,
}

impl MeasuredRecord {
    pub fn length(&self, corner: Corner) -> Option<f64> {
        self.geometry[corner].map(|g| g.damper_length)
    }
}

/// One sheet after measurement
#[derive(Debug, Clone, Default)]
pub struct MeasuredSheet {
    pub name: String,
    /// Records with every carried corner finite, in sheet order
    pub records: Vec<MeasuredRecord>,
    /// Dropped records
    pub warnings: Vec<Warning>,
}

/// Result of measuring a batch of sheets
#[derive(Debug, Clone)]
pub struct DamperRun {
    pub sheets: Vec<MeasuredSheet>,
    /// Median LCA Z applied to every corner, when normalization ran
    pub median_z: Option<f64>,
}

/// Damper length calculator for one recompute
#[derive(Debug, Clone, Copy)]
pub struct DamperCalculator {
    offsets: PerCorner<f64>,
    normalize_z: bool,
}

impl DamperCalculator {
    pub fn new(offsets: PerCorner<f64>, normalize_z: bool) -> Self {
        Self {
            offsets: offsets.map(|_, o| o.abs()),
            normalize_z,
        }
    }

    /// Measure every record of every sheet
    ///
    /// The normalization median, when enabled, is computed over all sheets
    /// together before any record is measured.
    pub fn run(&self, sheets: &[(&str, &[SurveyRecord])]) -> DamperRun {
        let median_z = if self.normalize_z {
            let raw: Vec<&[SurveyRecord]> = sheets.iter().map(|(_, records)| *records).collect();
            let median_z = lca_median_z(&raw);
            if let Some(z) = median_z {
                info!(median_z = z, "LCA Z heights normalized to median");
            }
            median_z
        } else {
            None
        };

        let sheets = sheets
            .iter()
            .map(|(name, records)| self.measure_sheet(name, records, median_z))
            .collect();

        DamperRun { sheets, median_z }
    }

    fn measure_sheet(
        &self,
        name: &str,
        records: &[SurveyRecord],
        z_override: Option<f64>,
    ) -> MeasuredSheet {
        let mut sheet = MeasuredSheet {
            name: name.to_string(),
            ..Default::default()
        };

        for rec in records {
            let geometry = rec.hardpoints.map(|corner, hp| {
                hp.as_ref()
                    .map(|hp| corner_geometry(corner, hp, self.offsets[corner], z_override))
            });

            // a normalized Z can hide a blank LCA height, so check raw input too
            let incomplete: Vec<Corner> = geometry
                .iter()
                .filter_map(|(corner, g)| {
                    let missing = rec.hardpoints[corner]
                        .as_ref()
                        .is_some_and(has_missing_coordinate);
                    match g {
                        Some(g) if missing || g.damper_length.is_nan() => Some(corner),
                        _ => None,
                    }
                })
                .collect();

            if incomplete.is_empty() {
                sheet.records.push(MeasuredRecord {
                    row: rec.row,
                    center_section: rec.center_section.clone(),
                    clip: rec.clip.clone(),
                    geometry,
                });
            } else {
                warn!(
                    sheet = name,
                    row = rec.row,
                    center_section = %rec.center_section,
                    clip = %rec.clip,
                    "dropping record with incomplete geometry"
                );
                sheet.warnings.push(Warning::IncompleteRecord {
                    sheet: name.to_string(),
                    row: rec.row,
                    center_section: rec.center_section.clone(),
                    clip: rec.clip.clone(),
                    corners: incomplete,
                });
            }
        }

        debug!(
            sheet = name,
            measured = sheet.records.len(),
            dropped = sheet.warnings.len(),
            "measured damper lengths"
        );
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hp(upper: [f64; 3], lca_front: [f64; 3], lca_rear: [f64; 3]) -> CornerHardpoints {
        CornerHardpoints {
            upper: Point3::from(upper),
            lca_front: Point3::from(lca_front),
            lca_rear: Point3::from(lca_rear),
        }
    }

    fn record(row: usize, cs: &str, clip: &str, lca_z: f64) -> SurveyRecord {
        let corner = |y: f64| {
            Some(hp(
                [0.0, y, 20.0],
                [-2.0, y, lca_z],
                [2.0, y, lca_z],
            ))
        };
        SurveyRecord {
            row,
            center_section: cs.to_string(),
            clip: clip.to_string(),
            hardpoints: PerCorner::new(corner(-10.0), corner(10.0), corner(-12.0), corner(12.0)),
        }
    }

    #[test]
    fn test_lower_mount_moves_outboard() {
        let center = Point3::new(1.0, 5.0, 2.0);
        let left = lower_mount(Corner::Lf, &center, 3.0);
        let right = lower_mount(Corner::Rr, &center, 3.0);
        assert_eq!(left, Point3::new(1.0, 2.0, 2.0));
        assert_eq!(right, Point3::new(1.0, 8.0, 2.0));
    }

    #[test]
    fn test_offset_sign_is_ignored() {
        let center = Point3::new(0.0, 0.0, 0.0);
        for offset in [4.0, -4.0] {
            assert!(lower_mount(Corner::Lr, &center, offset).y < center.y);
            assert!(lower_mount(Corner::Rf, &center, offset).y > center.y);
        }
    }

    #[test]
    fn test_corner_geometry_length() {
        // LCA center (0, 0, 0), offset 3 outboard-left -> lower (0, -3, 0)
        let hp = hp([0.0, -3.0, 4.0], [-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let g = corner_geometry(Corner::Lf, &hp, 3.0, None);
        assert_eq!(g.lca_center, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(g.lower_mount, Point3::new(0.0, -3.0, 0.0));
        assert!((g.damper_length - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_length_when_mounts_coincide() {
        let hp = hp([0.0, 3.0, 0.0], [-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let g = corner_geometry(Corner::Rf, &hp, 3.0, None);
        assert_eq!(g.damper_length, 0.0);
    }

    #[test]
    fn test_median_spans_all_sheets() {
        let front = vec![record(1, "S1", "F1", 1.0)];
        let rear = vec![record(1, "S1", "R1", 5.0), record(2, "S1", "R2", 9.0)];
        // 4 corners each: four 1.0s, four 5.0s, four 9.0s
        let z = lca_median_z(&[&front[..], &rear[..]]).unwrap();
        assert_eq!(z, 5.0);
    }

    #[test]
    fn test_normalization_overrides_every_corner() {
        let records = vec![record(1, "S1", "A", 1.0), record(2, "S2", "B", 3.0)];
        let calc = DamperCalculator::new(PerCorner::new(1.0, 1.0, 1.0, 1.0), true);
        let run = calc.run(&[("sheet", &records[..])]);

        assert_eq!(run.median_z, Some(2.0));
        for rec in &run.sheets[0].records {
            for (_, g) in rec.geometry.iter() {
                assert_eq!(g.unwrap().lca_center.z, 2.0);
            }
        }
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let records = vec![record(1, "S1", "A", 1.0), record(2, "S2", "B", 4.0)];
        let calc = DamperCalculator::new(PerCorner::new(1.0, 2.0, 3.0, 4.0), true);
        let first = calc.run(&[("sheet", &records[..])]);
        let second = calc.run(&[("sheet", &records[..])]);
        assert_eq!(first.median_z, second.median_z);
        assert_eq!(first.sheets[0].records, second.sheets[0].records);
    }

    #[test]
    fn test_incomplete_record_is_dropped_whole() {
        let mut bad = record(2, "S2", "B", 1.0);
        if let Some(hp) = bad.hardpoints.rr.as_mut() {
            hp.upper.z = f64::NAN;
        }
        let records = vec![record(1, "S1", "A", 1.0), bad];

        let calc = DamperCalculator::new(PerCorner::default(), false);
        let run = calc.run(&[("survey", &records[..])]);
        let sheet = &run.sheets[0];

        assert_eq!(sheet.records.len(), 1);
        assert_eq!(sheet.records[0].clip, "A");
        assert_eq!(
            sheet.warnings,
            vec![Warning::IncompleteRecord {
                sheet: "survey".into(),
                row: 2,
                center_section: "S2".into(),
                clip: "B".into(),
                corners: vec![Corner::Rr],
            }]
        );
    }

    #[test]
    fn test_blank_lca_height_is_dropped_when_normalized() {
        let mut bad = record(2, "S2", "B", 1.0);
        if let Some(hp) = bad.hardpoints.rr.as_mut() {
            hp.lca_front.z = f64::NAN;
        }
        let records = vec![record(1, "S1", "A", 1.0), bad];

        let calc = DamperCalculator::new(PerCorner::default(), true);
        let run = calc.run(&[("survey", &records[..])]);
        let sheet = &run.sheets[0];

        assert_eq!(run.median_z, Some(1.0));
        assert_eq!(sheet.records.len(), 1);
        assert_eq!(sheet.records[0].clip, "A");
        assert_eq!(
            sheet.warnings,
            vec![Warning::IncompleteRecord {
                sheet: "survey".into(),
                row: 2,
                center_section: "S2".into(),
                clip: "B".into(),
                corners: vec![Corner::Rr],
            }]
        );
    }

    #[test]
    fn test_lengths_are_non_negative() {
        let records = vec![record(1, "S1", "A", -3.0), record(2, "S1", "B", 40.0)];
        let calc = DamperCalculator::new(PerCorner::new(12.1, 12.6, 14.5, 15.6), false);
        let run = calc.run(&[("sheet", &records[..])]);
        for rec in &run.sheets[0].records {
            for corner in Corner::ALL {
                assert!(rec.length(corner).unwrap() >= 0.0);
            }
        }
    }
}
