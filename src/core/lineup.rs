//! Greedy lineup optimizer
//!
//! Pairs one front clip and one rear clip with every center section. Center
//! sections are processed in identifier order; each takes the unused pair with
//! the lowest weighted corner-rank score:
//!
//! ```text
//! score = (w_LF·LF_rank + w_RF·RF_rank + w_LR·LR_rank + w_RR·RR_rank) / 100
//! ```
//!
//! A clip committed to one section is unavailable to every later section, so
//! the result depends on processing order and is not a global optimum. When no
//! unused pair has rows at a section, any unused clip is assigned instead and
//! the entry is flagged.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::core::error::{AnalysisError, Warning};
use crate::core::ranking::{AxleRankRow, AxleTable};
use crate::entities::corner::{Axle, Corner, PerCorner};

/// Corner weights in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CornerWeights(pub PerCorner<f64>);

impl Default for CornerWeights {
    fn default() -> Self {
        Self(PerCorner::new(25.0, 25.0, 25.0, 25.0))
    }
}

impl CornerWeights {
    /// Allowed distance of the weight total from 100
    pub const SUM_TOLERANCE: f64 = 0.01;

    pub fn new(lf: f64, rf: f64, lr: f64, rr: f64) -> Self {
        Self(PerCorner::new(lf, rf, lr, rr))
    }

    pub fn total(&self) -> f64 {
        self.0.iter().map(|(_, w)| *w).sum()
    }

    /// Refuse weights outside 0..=100 or not summing to 100
    ///
    /// Weights are never renormalized.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (corner, &value) in self.0.iter() {
            if !(0.0..=100.0).contains(&value) {
                return Err(AnalysisError::WeightRange { corner, value });
            }
        }
        let total = self.total();
        if (total - 100.0).abs() > Self::SUM_TOLERANCE {
            return Err(AnalysisError::WeightSum { total });
        }
        Ok(())
    }

    /// Weighted rank score of a front row paired with a rear row
    pub fn score(&self, front: &AxleRankRow, rear: &AxleRankRow) -> f64 {
        let w = &self.0;
        (w.lf * front.ranks[0] as f64
            + w.rf * front.ranks[1] as f64
            + w.lr * rear.ranks[0] as f64
            + w.rr * rear.ranks[1] as f64)
            / 100.0
    }
}

impl FromStr for CornerWeights {
    type Err = String;

    /// Parse `LF,RF,LR,RR`, e.g. `40,20,20,20`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(format!(
                "expected 4 comma-separated weights (LF,RF,LR,RR), got {}",
                parts.len()
            ));
        }
        let mut values = [0.0; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse()
                .map_err(|_| format!("invalid weight '{}'", part))?;
        }
        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}

impl fmt::Display for CornerWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Corner::ALL
            .iter()
            .map(|&c| format!("{}={}", c, self.0[c]))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Track a center section is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrackType {
    #[default]
    #[serde(rename = "INT")]
    Intermediate,
    #[serde(rename = "ST")]
    ShortTrack,
    #[serde(rename = "RC")]
    RoadCourse,
    Utility,
    #[serde(rename = "SSW")]
    Superspeedway,
    Backup,
}

impl TrackType {
    pub const ALL: [TrackType; 6] = [
        TrackType::Intermediate,
        TrackType::ShortTrack,
        TrackType::RoadCourse,
        TrackType::Utility,
        TrackType::Superspeedway,
        TrackType::Backup,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            TrackType::Intermediate => "INT",
            TrackType::ShortTrack => "ST",
            TrackType::RoadCourse => "RC",
            TrackType::Utility => "Utility",
            TrackType::Superspeedway => "SSW",
            TrackType::Backup => "Backup",
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TrackType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrackType::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let codes: Vec<&str> = TrackType::ALL.iter().map(|t| t.code()).collect();
                format!("unknown track type '{}' (expected {})", s, codes.join(", "))
            })
    }
}

/// Assigned clips for one center section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupEntry {
    pub front_clip: String,
    pub rear_clip: String,
    /// Optimizer score; infinite for fallback entries and pairs without rows
    pub score: f64,
    pub fallback: bool,
    pub track: TrackType,
}

/// Clips used by more than one center section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Duplicates {
    pub front: BTreeSet<String>,
    pub rear: BTreeSet<String>,
}

impl Duplicates {
    pub fn is_empty(&self) -> bool {
        self.front.is_empty() && self.rear.is_empty()
    }
}

/// Mean ranks over the assigned pairs that have rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupSummary {
    pub sections: usize,
    pub ranks: PerCorner<f64>,
    pub front_rank: f64,
    pub rear_rank: f64,
}

/// One lineup row joined with its rank rows, for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupRow {
    pub center_section: String,
    pub track: TrackType,
    pub front_clip: String,
    pub rear_clip: String,
    pub front: Option<AxleRankRow>,
    pub rear: Option<AxleRankRow>,
    /// Weighted score under the lineup's current weights
    pub score: f64,
    pub fallback: bool,
    pub duplicate_front: bool,
    pub duplicate_rear: bool,
}

/// Whether a clip is free for the selected center section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "center_section", rename_all = "snake_case")]
pub enum Availability {
    Available,
    AssignedTo(String),
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Available => f.write_str("available"),
            Availability::AssignedTo(cs) => write!(f, "assigned to {}", cs),
        }
    }
}

/// One alternative clip for a center section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipDelta {
    pub clip: String,
    pub current: bool,
    pub availability: Availability,
    /// (left, right) lengths of this clip at the section
    pub lengths: [f64; 2],
    /// (left, right) length change versus the assigned clip; `None` when the
    /// assigned clip has no row at the section
    pub deltas: Option<[f64; 2]>,
}

/// Rows of a table grouped by center section, then clip; first row wins
fn by_section(table: &AxleTable) -> BTreeMap<&str, BTreeMap<&str, &AxleRankRow>> {
    let mut sections: BTreeMap<&str, BTreeMap<&str, &AxleRankRow>> = BTreeMap::new();
    for row in &table.rows {
        sections
            .entry(row.center_section.as_str())
            .or_default()
            .entry(row.clip.as_str())
            .or_insert(row);
    }
    sections
}

fn mean_rank(
    pairs: &[(&AxleRankRow, &AxleRankRow)],
    f: impl Fn(&AxleRankRow, &AxleRankRow) -> u32,
) -> f64 {
    pairs.iter().map(|(a, b)| f(a, b) as f64).sum::<f64>() / pairs.len() as f64
}

/// First clip not in `used`, or the first clip overall when all are used
fn fallback_clip<'a>(clips: &BTreeSet<&'a str>, used: &BTreeSet<&str>) -> Option<&'a str> {
    clips
        .iter()
        .find(|c| !used.contains(*c))
        .or_else(|| clips.first())
        .copied()
}

/// A center section to clip assignment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lineup {
    pub entries: BTreeMap<String, LineupEntry>,
    pub weights: CornerWeights,
    /// Set by any manual override; freezes display order to identifier order
    pub manual: bool,
}

impl Lineup {
    /// Run the greedy optimizer over the rank tables
    ///
    /// Sections with rows in both tables are assigned. Invalid weights are
    /// refused before any work is done.
    pub fn optimize(
        front: &AxleTable,
        rear: &AxleTable,
        weights: CornerWeights,
    ) -> Result<(Self, Vec<Warning>), AnalysisError> {
        weights.validate()?;

        let front_rows = by_section(front);
        let rear_rows = by_section(rear);
        let all_front = front.clips();
        let all_rear = rear.clips();

        let mut used_front: BTreeSet<&str> = BTreeSet::new();
        let mut used_rear: BTreeSet<&str> = BTreeSet::new();
        let mut entries = BTreeMap::new();
        let mut warnings = Vec::new();

        for (&cs, fronts) in &front_rows {
            let Some(rears) = rear_rows.get(cs) else {
                continue;
            };

            let mut best: Option<(f64, &str, &str)> = None;
            for (&fc, frow) in fronts.iter().filter(|(c, _)| !used_front.contains(*c)) {
                for (&rc, rrow) in rears.iter().filter(|(c, _)| !used_rear.contains(*c)) {
                    let score = weights.score(frow, rrow);
                    if best.map_or(true, |(b, _, _)| score < b) {
                        best = Some((score, fc, rc));
                    }
                }
            }

            let (score, fc, rc, fallback) = match best {
                Some((score, fc, rc)) => (score, fc, rc, false),
                None => {
                    let (Some(fc), Some(rc)) = (
                        fallback_clip(&all_front, &used_front),
                        fallback_clip(&all_rear, &used_rear),
                    ) else {
                        continue;
                    };
                    warn!(
                        center_section = cs,
                        front_clip = fc,
                        rear_clip = rc,
                        "no unused clip pair, assigning fallback"
                    );
                    warnings.push(Warning::InfeasibleAssignment {
                        center_section: cs.to_string(),
                        front_clip: fc.to_string(),
                        rear_clip: rc.to_string(),
                    });
                    (f64::INFINITY, fc, rc, true)
                }
            };

            debug!(center_section = cs, front_clip = fc, rear_clip = rc, score, "assigned");
            used_front.insert(fc);
            used_rear.insert(rc);
            entries.insert(
                cs.to_string(),
                LineupEntry {
                    front_clip: fc.to_string(),
                    rear_clip: rc.to_string(),
                    score,
                    fallback,
                    track: TrackType::default(),
                },
            );
        }

        info!(
            sections = entries.len(),
            fallbacks = warnings.len(),
            weights = %weights,
            "lineup optimized"
        );

        Ok((
            Self {
                entries,
                weights,
                manual: false,
            },
            warnings,
        ))
    }

    fn entry_mut(&mut self, center_section: &str) -> Result<&mut LineupEntry, AnalysisError> {
        self.entries
            .get_mut(center_section)
            .ok_or_else(|| AnalysisError::UnknownCenterSection(center_section.to_string()))
    }

    /// Manually assign one section's front or rear clip
    ///
    /// Other sections are left alone, so duplicates may appear. Display order
    /// freezes to identifier order until the optimizer runs again. Naming the
    /// clip already assigned changes nothing.
    pub fn set_clip(
        &mut self,
        axle: Axle,
        center_section: &str,
        clip: &str,
        front: &AxleTable,
        rear: &AxleTable,
    ) -> Result<(), AnalysisError> {
        let table = match axle {
            Axle::Front => front,
            Axle::Rear => rear,
        };
        if !table.has_clip(clip) {
            return Err(AnalysisError::UnknownClip {
                axle,
                clip: clip.to_string(),
            });
        }

        let weights = self.weights;
        let entry = self.entry_mut(center_section)?;
        let assigned = match axle {
            Axle::Front => &mut entry.front_clip,
            Axle::Rear => &mut entry.rear_clip,
        };
        if *assigned == clip {
            return Ok(());
        }
        *assigned = clip.to_string();
        entry.fallback = false;
        entry.score = match (
            front.get(center_section, &entry.front_clip),
            rear.get(center_section, &entry.rear_clip),
        ) {
            (Some(f), Some(r)) => weights.score(f, r),
            _ => f64::INFINITY,
        };
        self.manual = true;

        debug!(center_section, %axle, clip, "manual clip override");
        Ok(())
    }

    /// Tag a section with a track type; display order is unaffected
    pub fn set_track(&mut self, center_section: &str, track: TrackType) -> Result<(), AnalysisError> {
        self.entry_mut(center_section)?.track = track;
        Ok(())
    }

    /// Current weighted score of a section's assigned pair, `+inf` without rows
    pub fn current_score(&self, center_section: &str, front: &AxleTable, rear: &AxleTable) -> f64 {
        self.entries
            .get(center_section)
            .and_then(|e| {
                let f = front.get(center_section, &e.front_clip)?;
                let r = rear.get(center_section, &e.rear_clip)?;
                Some(self.weights.score(f, r))
            })
            .unwrap_or(f64::INFINITY)
    }

    /// Section identifiers in display order
    ///
    /// Ascending current score, ties in identifier order; identifier order
    /// alone after a manual override.
    pub fn display_order(&self, front: &AxleTable, rear: &AxleTable) -> Vec<&str> {
        let mut order: Vec<(&str, f64)> = self
            .entries
            .keys()
            .map(|cs| (cs.as_str(), self.current_score(cs, front, rear)))
            .collect();
        if !self.manual {
            order.sort_by(|a, b| a.1.total_cmp(&b.1));
        }
        order.into_iter().map(|(cs, _)| cs).collect()
    }

    /// Sections per clip for one axle, in identifier order
    fn clip_users(&self, axle: Axle) -> BTreeMap<&str, Vec<&str>> {
        let mut users: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (cs, entry) in &self.entries {
            let clip = match axle {
                Axle::Front => &entry.front_clip,
                Axle::Rear => &entry.rear_clip,
            };
            users.entry(clip.as_str()).or_default().push(cs.as_str());
        }
        users
    }

    pub fn duplicates(&self) -> Duplicates {
        let dupes = |axle: Axle| -> BTreeSet<String> {
            self.clip_users(axle)
                .into_iter()
                .filter(|(_, sections)| sections.len() > 1)
                .map(|(clip, _)| clip.to_string())
                .collect()
        };
        Duplicates {
            front: dupes(Axle::Front),
            rear: dupes(Axle::Rear),
        }
    }

    pub fn duplicate_warnings(&self) -> Vec<Warning> {
        [Axle::Front, Axle::Rear]
            .into_iter()
            .flat_map(|axle| {
                self.clip_users(axle)
                    .into_iter()
                    .filter(|(_, sections)| sections.len() > 1)
                    .map(move |(clip, sections)| Warning::DuplicateClip {
                        axle,
                        clip: clip.to_string(),
                        center_sections: sections.into_iter().map(String::from).collect(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Lineup rows in display order
    pub fn rows(&self, front: &AxleTable, rear: &AxleTable) -> Vec<LineupRow> {
        let dupes = self.duplicates();
        self.display_order(front, rear)
            .into_iter()
            .filter_map(|cs| {
                let entry = self.entries.get(cs)?;
                Some(LineupRow {
                    center_section: cs.to_string(),
                    track: entry.track,
                    front_clip: entry.front_clip.clone(),
                    rear_clip: entry.rear_clip.clone(),
                    front: front.get(cs, &entry.front_clip).cloned(),
                    rear: rear.get(cs, &entry.rear_clip).cloned(),
                    score: self.current_score(cs, front, rear),
                    fallback: entry.fallback,
                    duplicate_front: dupes.front.contains(&entry.front_clip),
                    duplicate_rear: dupes.rear.contains(&entry.rear_clip),
                })
            })
            .collect()
    }

    /// Mean ranks over sections whose assigned pair has rows
    pub fn summary(&self, front: &AxleTable, rear: &AxleTable) -> Option<LineupSummary> {
        let pairs: Vec<(&AxleRankRow, &AxleRankRow)> = self
            .entries
            .iter()
            .filter_map(|(cs, e)| Some((front.get(cs, &e.front_clip)?, rear.get(cs, &e.rear_clip)?)))
            .collect();
        if pairs.is_empty() {
            return None;
        }

        Some(LineupSummary {
            sections: pairs.len(),
            ranks: PerCorner::new(
                mean_rank(&pairs, |f, _| f.ranks[0]),
                mean_rank(&pairs, |f, _| f.ranks[1]),
                mean_rank(&pairs, |_, r| r.ranks[0]),
                mean_rank(&pairs, |_, r| r.ranks[1]),
            ),
            front_rank: mean_rank(&pairs, |f, _| f.axle_rank),
            rear_rank: mean_rank(&pairs, |_, r| r.axle_rank),
        })
    }

    /// Every clip measured at `center_section` on `axle`, compared with the
    /// assigned clip
    pub fn clip_deltas(
        &self,
        center_section: &str,
        axle: Axle,
        front: &AxleTable,
        rear: &AxleTable,
    ) -> Result<Vec<ClipDelta>, AnalysisError> {
        let entry = self
            .entries
            .get(center_section)
            .ok_or_else(|| AnalysisError::UnknownCenterSection(center_section.to_string()))?;
        let (table, assigned) = match axle {
            Axle::Front => (front, entry.front_clip.as_str()),
            Axle::Rear => (rear, entry.rear_clip.as_str()),
        };
        let current = table.get(center_section, assigned).map(|r| r.lengths);

        let order = self.display_order(front, rear);
        let users = self.clip_users(axle);
        let assigned_elsewhere = |clip: &str| -> Option<String> {
            let sections = users.get(clip)?;
            order
                .iter()
                .find(|cs| **cs != center_section && sections.contains(*cs))
                .map(|cs| cs.to_string())
        };

        let rows = by_section(table);
        let deltas = rows
            .get(center_section)
            .map(|clips| {
                clips
                    .iter()
                    .map(|(&clip, row)| ClipDelta {
                        clip: clip.to_string(),
                        current: clip == assigned,
                        availability: assigned_elsewhere(clip)
                            .map_or(Availability::Available, Availability::AssignedTo),
                        lengths: row.lengths,
                        deltas: current
                            .map(|c| [row.lengths[0] - c[0], row.lengths[1] - c[1]]),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(deltas)
    }
}
