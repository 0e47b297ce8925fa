//! Core module - geometry, ranking and lineup optimization

pub mod config;
pub mod damper;
pub mod error;
pub mod expander;
pub mod geometry;
pub mod lineup;
pub mod ranking;
pub mod resolve;
pub mod rollup;
pub mod session;

pub use config::{load_mapping, save_mapping, ConfigError};
pub use damper::{CornerGeometry, DamperCalculator, DamperRun, MeasuredRecord, MeasuredSheet};
pub use error::{AnalysisError, MissingColumn, Warning};
pub use expander::expand;
pub use geometry::{distance3, median, midpoint3, Point3};
pub use lineup::{
    Availability, ClipDelta, CornerWeights, Duplicates, Lineup, LineupEntry, LineupRow,
    LineupSummary, TrackType,
};
pub use ranking::{rank_combinations, AxleRankRow, AxleTable, Combination, RankedCombination};
pub use resolve::{missing_columns, resolve_records};
pub use rollup::{length_correlation, rollup_by_center, rollup_by_clip, AxleMeans, CenterRollup, ClipRollup};
pub use session::{Session, SheetMode, SurveyInput, WorkingSet};
