//! Combination expander for dual-sheet surveys
//!
//! Front and rear clips are surveyed independently against the same center
//! sections. Every front clip can pair with every rear clip measured on the
//! same center section, so the ranked population is the inner join of the two
//! sheets on center section identity.

use tracing::debug;

use crate::core::damper::MeasuredSheet;
use crate::core::error::AnalysisError;
use crate::core::ranking::Combination;
use crate::entities::corner::{Corner, PerCorner};

/// Cross every front record with every rear record on the same center section
///
/// Order follows the front sheet, then the rear sheet within each front record.
/// An empty join is a configuration error.
pub fn expand(front: &MeasuredSheet, rear: &MeasuredSheet) -> Result<Vec<Combination>, AnalysisError> {
    let mut combos = Vec::new();

    for f in &front.records {
        let (Some(lf), Some(rf)) = (f.length(Corner::Lf), f.length(Corner::Rf)) else {
            continue;
        };
        for r in rear
            .records
            .iter()
            .filter(|r| r.center_section == f.center_section)
        {
            let (Some(lr), Some(rr)) = (r.length(Corner::Lr), r.length(Corner::Rr)) else {
                continue;
            };
            combos.push(Combination {
                center_section: f.center_section.clone(),
                front_clip: f.clip.clone(),
                rear_clip: r.clip.clone(),
                lengths: PerCorner::new(lf, rf, lr, rr),
            });
        }
    }

    if combos.is_empty() {
        return Err(AnalysisError::EmptyJoin {
            front: front.name.clone(),
            rear: rear.name.clone(),
        });
    }

    debug!(combinations = combos.len(), "expanded front x rear combinations");
    Ok(combos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::damper::{CornerGeometry, MeasuredRecord};
    use crate::core::geometry::Point3;

    fn geometry(length: f64) -> Option<CornerGeometry> {
        Some(CornerGeometry {
            lca_center: Point3::zeros(),
            lower_mount: Point3::zeros(),
            damper_length: length,
        })
    }

    fn front(cs: &str, clip: &str, lf: f64, rf: f64) -> MeasuredRecord {
        MeasuredRecord {
            row: 1,
            center_section: cs.into(),
            clip: clip.into(),
            geometry: PerCorner::new(geometry(lf), geometry(rf), None, None),
        }
    }

    fn rear(cs: &str, clip: &str, lr: f64, rr: f64) -> MeasuredRecord {
        MeasuredRecord {
            row: 1,
            center_section: cs.into(),
            clip: clip.into(),
            geometry: PerCorner::new(None, None, geometry(lr), geometry(rr)),
        }
    }

    fn sheet(name: &str, records: Vec<MeasuredRecord>) -> MeasuredSheet {
        MeasuredSheet {
            name: name.into(),
            records,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_cross_product_per_center_section() {
        let f = sheet(
            "front",
            vec![
                front("S1", "F1", 1.0, 2.0),
                front("S1", "F2", 3.0, 4.0),
                front("S2", "F1", 5.0, 6.0),
            ],
        );
        let r = sheet(
            "rear",
            vec![
                rear("S1", "R1", 7.0, 8.0),
                rear("S1", "R2", 9.0, 10.0),
                rear("S3", "R1", 11.0, 12.0),
            ],
        );

        let combos = expand(&f, &r).unwrap();
        let pairs: Vec<(&str, &str, &str)> = combos
            .iter()
            .map(|c| (c.center_section.as_str(), c.front_clip.as_str(), c.rear_clip.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("S1", "F1", "R1"),
                ("S1", "F1", "R2"),
                ("S1", "F2", "R1"),
                ("S1", "F2", "R2"),
            ]
        );
        assert_eq!(combos[1].lengths, PerCorner::new(1.0, 2.0, 9.0, 10.0));
    }

    #[test]
    fn test_no_shared_center_sections_is_an_error() {
        let f = sheet("front.csv", vec![front("S1", "F1", 1.0, 2.0)]);
        let r = sheet("rear.csv", vec![rear("S9", "R1", 1.0, 2.0)]);

        let err = expand(&f, &r).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyJoin { .. }));
        assert!(err.to_string().contains("front.csv"));
    }
}
