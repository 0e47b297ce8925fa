//! Grouped rollups over axle rank tables
//!
//! Read-only reporting views: means of ranks and lengths grouped by center
//! section or by clip. Nothing here feeds back into ranking or assignment.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::core::ranking::{AxleRankRow, AxleTable};
use crate::entities::corner::Axle;

/// Means over a group of axle rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxleMeans {
    pub count: usize,
    /// (left, right) mean corner ranks
    pub ranks: [f64; 2],
    pub axle_rank: f64,
    /// (left, right) mean lengths
    pub lengths: [f64; 2],
}

fn mean_of(rows: &[&AxleRankRow], f: impl Fn(&AxleRankRow) -> f64) -> f64 {
    rows.iter().map(|r| f(*r)).sum::<f64>() / rows.len() as f64
}

impl AxleMeans {
    fn of(rows: &[&AxleRankRow]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        Some(Self {
            count: rows.len(),
            ranks: [
                mean_of(rows, |r| r.ranks[0] as f64),
                mean_of(rows, |r| r.ranks[1] as f64),
            ],
            axle_rank: mean_of(rows, |r| r.axle_rank as f64),
            lengths: [
                mean_of(rows, |r| r.lengths[0]),
                mean_of(rows, |r| r.lengths[1]),
            ],
        })
    }
}

/// Front and rear means for one center section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CenterRollup {
    pub center_section: String,
    pub front: Option<AxleMeans>,
    pub rear: Option<AxleMeans>,
}

/// Means for one clip of one axle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipRollup {
    pub clip: String,
    pub axle: Axle,
    pub means: AxleMeans,
}

fn group_by<'a>(
    table: &'a AxleTable,
    key: impl Fn(&'a AxleRankRow) -> &'a str,
) -> BTreeMap<&'a str, Vec<&'a AxleRankRow>> {
    let mut groups: BTreeMap<&str, Vec<&AxleRankRow>> = BTreeMap::new();
    for row in &table.rows {
        groups.entry(key(row)).or_default().push(row);
    }
    groups
}

/// Compare optional means by axle rank, missing last
fn by_axle_rank(a: Option<&AxleMeans>, b: Option<&AxleMeans>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.axle_rank.total_cmp(&b.axle_rank),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Means per center section, front and rear side by side
///
/// Sections present in only one table keep `None` for the other axle.
/// Sorted by mean front rank, then by identifier.
pub fn rollup_by_center(front: &AxleTable, rear: &AxleTable) -> Vec<CenterRollup> {
    let front_groups = group_by(front, |r| r.center_section.as_str());
    let rear_groups = group_by(rear, |r| r.center_section.as_str());

    let mut sections: Vec<&str> = front_groups.keys().chain(rear_groups.keys()).copied().collect();
    sections.sort_unstable();
    sections.dedup();

    let mut rollups: Vec<CenterRollup> = sections
        .into_iter()
        .map(|cs| CenterRollup {
            center_section: cs.to_string(),
            front: front_groups.get(cs).and_then(|rows| AxleMeans::of(rows)),
            rear: rear_groups.get(cs).and_then(|rows| AxleMeans::of(rows)),
        })
        .collect();

    rollups.sort_by(|a, b| by_axle_rank(a.front.as_ref(), b.front.as_ref()));
    rollups
}

/// Means per clip of one axle, sorted by mean axle rank then identifier
pub fn rollup_by_clip(table: &AxleTable) -> Vec<ClipRollup> {
    let mut rollups: Vec<ClipRollup> = group_by(table, |r| r.clip.as_str())
        .into_iter()
        .filter_map(|(clip, rows)| {
            AxleMeans::of(&rows).map(|means| ClipRollup {
                clip: clip.to_string(),
                axle: table.axle,
                means,
            })
        })
        .collect();

    rollups.sort_by(|a, b| a.means.axle_rank.total_cmp(&b.means.axle_rank));
    rollups
}

/// Pearson correlation between the axle's left and right lengths
///
/// `None` with fewer than two rows or when either side has no variance.
pub fn length_correlation(table: &AxleTable) -> Option<f64> {
    let n = table.rows.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mean_l = table.rows.iter().map(|r| r.lengths[0]).sum::<f64>() / nf;
    let mean_r = table.rows.iter().map(|r| r.lengths[1]).sum::<f64>() / nf;

    let (mut cov, mut var_l, mut var_r) = (0.0, 0.0, 0.0);
    for row in &table.rows {
        let dl = row.lengths[0] - mean_l;
        let dr = row.lengths[1] - mean_r;
        cov += dl * dr;
        var_l += dl * dl;
        var_r += dr * dr;
    }

    let denom = (var_l * var_r).sqrt();
    if denom < 1e-12 {
        None
    } else {
        Some(cov / denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cs: &str, clip: &str, lengths: [f64; 2], ranks: [u32; 2], axle_rank: u32) -> AxleRankRow {
        AxleRankRow {
            center_section: cs.into(),
            clip: clip.into(),
            lengths,
            ranks,
            weighted_score: 2 * ranks[0] + ranks[1],
            axle_rank,
        }
    }

    fn front_table() -> AxleTable {
        AxleTable {
            axle: Axle::Front,
            rows: vec![
                row("S1", "F1", [10.0, 9.0], [1, 2], 1),
                row("S1", "F2", [8.0, 10.0], [3, 1], 3),
                row("S2", "F1", [9.0, 8.0], [2, 3], 2),
            ],
        }
    }

    #[test]
    fn test_center_rollup_means() {
        let rear = AxleTable {
            axle: Axle::Rear,
            rows: vec![row("S3", "R1", [5.0, 5.0], [1, 1], 1)],
        };
        let rollups = rollup_by_center(&front_table(), &rear);

        assert_eq!(rollups.len(), 3);
        // S1 and S2 tie on mean front rank; identifier order breaks the tie
        assert_eq!(rollups[0].center_section, "S1");
        let s1 = rollups[0].front.as_ref().unwrap();
        assert_eq!(s1.count, 2);
        assert_eq!(s1.ranks, [2.0, 1.5]);
        assert_eq!(s1.axle_rank, 2.0);
        assert_eq!(s1.lengths, [9.0, 9.5]);
        assert!(rollups[0].rear.is_none());

        // S3 has no front rows and sorts last
        assert_eq!(rollups[2].center_section, "S3");
        assert!(rollups[2].front.is_none());
        assert!(rollups[2].rear.is_some());
    }

    #[test]
    fn test_clip_rollup_sorted_by_axle_rank() {
        let rollups = rollup_by_clip(&front_table());
        let clips: Vec<&str> = rollups.iter().map(|r| r.clip.as_str()).collect();
        assert_eq!(clips, vec!["F1", "F2"]);
        assert_eq!(rollups[0].means.axle_rank, 1.5);
        assert_eq!(rollups[0].axle, Axle::Front);
    }

    #[test]
    fn test_length_correlation() {
        let table = AxleTable {
            axle: Axle::Front,
            rows: vec![
                row("S1", "A", [1.0, 2.0], [3, 3], 3),
                row("S1", "B", [2.0, 4.0], [2, 2], 2),
                row("S1", "C", [3.0, 6.0], [1, 1], 1),
            ],
        };
        let r = length_correlation(&table).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_correlation_degenerate() {
        let table = AxleTable {
            axle: Axle::Rear,
            rows: vec![row("S1", "A", [1.0, 2.0], [1, 1], 1)],
        };
        assert!(length_correlation(&table).is_none());
    }
}
