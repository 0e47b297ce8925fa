//! Ranking engine
//!
//! Ranks use the "min" method: tied values share the lowest rank of their
//! group and the next distinct value resumes at `1 + number of values strictly
//! better`. Damper lengths rank descending (longest = 1); weighted scores rank
//! ascending (lowest = 1).
//!
//! Axle scores weight the left corner double:
//! ```text
//! front_weighted_score = 2·LF_rank + RF_rank
//! rear_weighted_score  = 2·LR_rank + RR_rank
//! ```

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::core::damper::MeasuredRecord;
use crate::entities::corner::{Axle, Corner, PerCorner};

/// Min-method ranks under `cmp`, where `Ordering::Less` means "better"
fn min_rank_by<T>(values: &[T], cmp: impl Fn(&T, &T) -> Ordering) -> Vec<u32> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| cmp(&values[a], &values[b]));

    let mut ranks = vec![0u32; values.len()];
    for (pos, &idx) in order.iter().enumerate() {
        ranks[idx] = match pos.checked_sub(1).map(|p| order[p]) {
            Some(prev) if cmp(&values[prev], &values[idx]) == Ordering::Equal => ranks[prev],
            _ => pos as u32 + 1,
        };
    }
    ranks
}

/// Rank lengths descending: the longest gets rank 1
pub fn rank_descending(values: &[f64]) -> Vec<u32> {
    min_rank_by(values, |a, b| b.total_cmp(a))
}

/// Rank scores ascending: the lowest gets rank 1
pub fn rank_ascending<T: Ord>(values: &[T]) -> Vec<u32> {
    min_rank_by(values, |a, b| a.cmp(b))
}

/// Weighted axle score from the (left, right) corner ranks
pub fn axle_weighted_score(left_rank: u32, right_rank: u32) -> u32 {
    2 * left_rank + right_rank
}

/// A unified-sheet record or a front × rear pair, before ranking
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    pub center_section: String,
    pub front_clip: String,
    pub rear_clip: String,
    pub lengths: PerCorner<f64>,
}

impl Combination {
    /// A unified-sheet record: one clip carries both axles
    pub fn from_record(rec: &MeasuredRecord) -> Option<Self> {
        let lengths = PerCorner::new(
            rec.length(Corner::Lf)?,
            rec.length(Corner::Rf)?,
            rec.length(Corner::Lr)?,
            rec.length(Corner::Rr)?,
        );
        Some(Self {
            center_section: rec.center_section.clone(),
            front_clip: rec.clip.clone(),
            rear_clip: rec.clip.clone(),
            lengths,
        })
    }
}

/// A combination with its corner ranks and axle scores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCombination {
    pub center_section: String,
    pub front_clip: String,
    pub rear_clip: String,
    pub lengths: PerCorner<f64>,
    pub ranks: PerCorner<u32>,
    pub front_weighted_score: u32,
    pub rear_weighted_score: u32,
    pub front_rank: u32,
    pub rear_rank: u32,
}

impl RankedCombination {
    /// Display label: the clip, or "front / rear" for a pair
    pub fn label(&self) -> String {
        if self.front_clip == self.rear_clip {
            self.front_clip.clone()
        } else {
            format!("{} / {}", self.front_clip, self.rear_clip)
        }
    }
}

/// Rank a working set
///
/// Output is ordered by LF length, longest first; ties keep input order.
pub fn rank_combinations(combos: Vec<Combination>) -> Vec<RankedCombination> {
    let corner_ranks = PerCorner::from_fn(|corner| {
        let lengths: Vec<f64> = combos.iter().map(|c| c.lengths[corner]).collect();
        rank_descending(&lengths)
    });

    let ranks: Vec<PerCorner<u32>> = (0..combos.len())
        .map(|i| corner_ranks.map(|_, r| r[i]))
        .collect();
    let front_scores: Vec<u32> = ranks
        .iter()
        .map(|r| axle_weighted_score(r.lf, r.rf))
        .collect();
    let rear_scores: Vec<u32> = ranks
        .iter()
        .map(|r| axle_weighted_score(r.lr, r.rr))
        .collect();
    let front_ranks = rank_ascending(&front_scores);
    let rear_ranks = rank_ascending(&rear_scores);

    let mut ranked: Vec<RankedCombination> = combos
        .into_iter()
        .enumerate()
        .map(|(i, c)| RankedCombination {
            center_section: c.center_section,
            front_clip: c.front_clip,
            rear_clip: c.rear_clip,
            lengths: c.lengths,
            ranks: ranks[i],
            front_weighted_score: front_scores[i],
            rear_weighted_score: rear_scores[i],
            front_rank: front_ranks[i],
            rear_rank: rear_ranks[i],
        })
        .collect();

    ranked.sort_by(|a, b| b.lengths.lf.total_cmp(&a.lengths.lf));
    ranked
}

/// One `(center section, clip)` row of an axle rank table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxleRankRow {
    pub center_section: String,
    pub clip: String,
    /// (left, right) corner lengths
    pub lengths: [f64; 2],
    /// (left, right) corner ranks within this axle's table
    pub ranks: [u32; 2],
    pub weighted_score: u32,
    pub axle_rank: u32,
}

/// Per-axle rank table keyed by center section and clip
///
/// Ranks are computed over this table's rows only. The optimizer, rollups and
/// clip comparisons read these tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxleTable {
    pub axle: Axle,
    pub rows: Vec<AxleRankRow>,
}

impl AxleTable {
    /// Rank the axle's corners over `records`
    ///
    /// Records that do not carry both of the axle's corners are skipped.
    pub fn from_records(axle: Axle, records: &[MeasuredRecord]) -> Self {
        let [left, right] = axle.corners();
        let measured: Vec<(&MeasuredRecord, [f64; 2])> = records
            .iter()
            .filter_map(|rec| Some((rec, [rec.length(left)?, rec.length(right)?])))
            .collect();

        let left_lengths: Vec<f64> = measured.iter().map(|(_, l)| l[0]).collect();
        let right_lengths: Vec<f64> = measured.iter().map(|(_, l)| l[1]).collect();
        let left_ranks = rank_descending(&left_lengths);
        let right_ranks = rank_descending(&right_lengths);
        let scores: Vec<u32> = left_ranks
            .iter()
            .zip(&right_ranks)
            .map(|(&l, &r)| axle_weighted_score(l, r))
            .collect();
        let axle_ranks = rank_ascending(&scores);

        let rows = measured
            .into_iter()
            .enumerate()
            .map(|(i, (rec, lengths))| AxleRankRow {
                center_section: rec.center_section.clone(),
                clip: rec.clip.clone(),
                lengths,
                ranks: [left_ranks[i], right_ranks[i]],
                weighted_score: scores[i],
                axle_rank: axle_ranks[i],
            })
            .collect();

        Self { axle, rows }
    }

    /// First row for a `(center section, clip)` pair
    pub fn get(&self, center_section: &str, clip: &str) -> Option<&AxleRankRow> {
        self.rows
            .iter()
            .find(|r| r.center_section == center_section && r.clip == clip)
    }

    /// Distinct clip ids, sorted
    pub fn clips(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|r| r.clip.as_str()).collect()
    }

    /// Distinct center section ids, sorted
    pub fn center_sections(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|r| r.center_section.as_str()).collect()
    }

    pub fn has_clip(&self, clip: &str) -> bool {
        self.rows.iter().any(|r| r.clip == clip)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
