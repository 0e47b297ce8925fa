//! Analysis session
//!
//! Holds the current working set, lineup and corner weights. Every operation
//! builds its result in full before replacing held state, so a failed
//! operation leaves earlier results untouched.

use serde::Serialize;
use tracing::info;

use crate::core::damper::DamperCalculator;
use crate::core::error::{AnalysisError, MissingColumn, Warning};
use crate::core::expander::expand;
use crate::core::lineup::{ClipDelta, CornerWeights, Lineup, LineupRow, LineupSummary, TrackType};
use crate::core::ranking::{rank_combinations, AxleTable, Combination, RankedCombination};
use crate::core::resolve::{missing_columns, read_records};
use crate::entities::corner::Axle;
use crate::entities::mapping::ColumnMapping;
use crate::entities::survey::SheetScope;
use crate::entities::table::SurveyTable;

/// Raw survey input
#[derive(Debug, Clone)]
pub enum SurveyInput {
    /// One sheet carrying all four corners per record
    Single(SurveyTable),
    /// Front clips and rear clips measured on separate sheets
    Dual { front: SurveyTable, rear: SurveyTable },
}

impl SurveyInput {
    fn sheets(&self) -> Vec<(&SurveyTable, SheetScope)> {
        match self {
            SurveyInput::Single(table) => vec![(table, SheetScope::Full)],
            SurveyInput::Dual { front, rear } => vec![
                (front, SheetScope::Axle(Axle::Front)),
                (rear, SheetScope::Axle(Axle::Rear)),
            ],
        }
    }

    /// Every mapped column missing from any sheet
    pub fn missing_columns(&self, mapping: &ColumnMapping) -> Vec<MissingColumn> {
        self.sheets()
            .into_iter()
            .flat_map(|(table, scope)| missing_columns(table, mapping, scope))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetMode {
    Single,
    Dual,
}

/// Everything derived from one recompute
#[derive(Debug, Clone, Serialize)]
pub struct WorkingSet {
    pub mode: SheetMode,
    /// Ranked combinations, longest LF first
    pub combinations: Vec<RankedCombination>,
    pub front: AxleTable,
    pub rear: AxleTable,
    pub median_z: Option<f64>,
    pub warnings: Vec<Warning>,
}

impl WorkingSet {
    /// Resolve, measure, expand and rank a survey
    ///
    /// Column checks cover every sheet before any record is read.
    pub fn build(
        input: &SurveyInput,
        mapping: &ColumnMapping,
        normalize_z: bool,
    ) -> Result<Self, AnalysisError> {
        let missing = input.missing_columns(mapping);
        if !missing.is_empty() {
            return Err(AnalysisError::MissingColumns { missing });
        }

        let sheets = input.sheets();
        let records: Vec<_> = sheets
            .iter()
            .map(|(table, scope)| read_records(table, mapping, *scope))
            .collect();
        let named: Vec<(&str, &[_])> = sheets
            .iter()
            .zip(&records)
            .map(|((table, _), recs)| (table.name.as_str(), recs.as_slice()))
            .collect();

        let run = DamperCalculator::new(mapping.offsets(), normalize_z).run(&named);
        let warnings: Vec<Warning> = run
            .sheets
            .iter()
            .flat_map(|s| s.warnings.iter().cloned())
            .collect();

        let (mode, combos, front, rear) = match run.sheets.as_slice() {
            [unified] => {
                let combos: Vec<Combination> = unified
                    .records
                    .iter()
                    .filter_map(Combination::from_record)
                    .collect();
                (
                    SheetMode::Single,
                    combos,
                    AxleTable::from_records(Axle::Front, &unified.records),
                    AxleTable::from_records(Axle::Rear, &unified.records),
                )
            }
            [front, rear, ..] => (
                SheetMode::Dual,
                expand(front, rear)?,
                AxleTable::from_records(Axle::Front, &front.records),
                AxleTable::from_records(Axle::Rear, &rear.records),
            ),
            [] => (
                SheetMode::Single,
                Vec::new(),
                AxleTable::from_records(Axle::Front, &[]),
                AxleTable::from_records(Axle::Rear, &[]),
            ),
        };

        let combinations = rank_combinations(combos);
        info!(
            combinations = combinations.len(),
            dropped = warnings.len(),
            "working set ranked"
        );

        Ok(Self {
            mode,
            combinations,
            front,
            rear,
            median_z: run.median_z,
            warnings,
        })
    }
}

/// Current working set, lineup and weights
#[derive(Debug, Default)]
pub struct Session {
    working_set: Option<WorkingSet>,
    lineup: Option<Lineup>,
    weights: CornerWeights,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn working_set(&self) -> Option<&WorkingSet> {
        self.working_set.as_ref()
    }

    pub fn lineup(&self) -> Option<&Lineup> {
        self.lineup.as_ref()
    }

    /// Weights of the last accepted optimizer run
    pub fn weights(&self) -> CornerWeights {
        self.weights
    }

    fn require_working_set(&self) -> Result<&WorkingSet, AnalysisError> {
        self.working_set.as_ref().ok_or(AnalysisError::NoWorkingSet)
    }

    fn require_lineup(&self) -> Result<(&WorkingSet, &Lineup), AnalysisError> {
        let ws = self.require_working_set()?;
        let lineup = self.lineup.as_ref().ok_or(AnalysisError::NoLineup)?;
        Ok((ws, lineup))
    }

    /// Rebuild the working set; the previous lineup no longer applies
    pub fn recompute(
        &mut self,
        input: &SurveyInput,
        mapping: &ColumnMapping,
        normalize_z: bool,
    ) -> Result<&WorkingSet, AnalysisError> {
        let ws = WorkingSet::build(input, mapping, normalize_z)?;
        self.lineup = None;
        Ok(self.working_set.insert(ws))
    }

    /// Run the optimizer; refused weights keep the previous lineup
    pub fn optimize(&mut self, weights: CornerWeights) -> Result<Vec<Warning>, AnalysisError> {
        let ws = self.require_working_set()?;
        let (lineup, warnings) = Lineup::optimize(&ws.front, &ws.rear, weights)?;
        self.lineup = Some(lineup);
        self.weights = weights;
        Ok(warnings)
    }

    /// Manually assign a clip to a center section
    pub fn set_clip(&mut self, axle: Axle, center_section: &str, clip: &str) -> Result<(), AnalysisError> {
        let ws = self.working_set.as_ref().ok_or(AnalysisError::NoWorkingSet)?;
        let lineup = self.lineup.as_mut().ok_or(AnalysisError::NoLineup)?;
        lineup.set_clip(axle, center_section, clip, &ws.front, &ws.rear)
    }

    pub fn set_track(&mut self, center_section: &str, track: TrackType) -> Result<(), AnalysisError> {
        self.lineup
            .as_mut()
            .ok_or(AnalysisError::NoLineup)?
            .set_track(center_section, track)
    }

    pub fn lineup_rows(&self) -> Result<Vec<LineupRow>, AnalysisError> {
        let (ws, lineup) = self.require_lineup()?;
        Ok(lineup.rows(&ws.front, &ws.rear))
    }

    pub fn lineup_summary(&self) -> Result<Option<LineupSummary>, AnalysisError> {
        let (ws, lineup) = self.require_lineup()?;
        Ok(lineup.summary(&ws.front, &ws.rear))
    }

    pub fn clip_deltas(&self, center_section: &str, axle: Axle) -> Result<Vec<ClipDelta>, AnalysisError> {
        let (ws, lineup) = self.require_lineup()?;
        lineup.clip_deltas(center_section, axle, &ws.front, &ws.rear)
    }
}
