//! Analysis errors and warnings
//!
//! Errors abort the current operation and leave prior session state intact.
//! Warnings are collected alongside successful output.

use miette::Diagnostic;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::entities::corner::{Axle, Corner};

/// A logical field whose mapped column is absent from a sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingColumn {
    pub field: String,
    pub column: String,
    pub sheet: String,
}

impl fmt::Display for MissingColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> '{}' (not in sheet '{}')", self.field, self.column, self.sheet)
    }
}

fn list_missing(missing: &[MissingColumn]) -> String {
    missing
        .iter()
        .map(|m| format!("  • {}", m))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors that stop an analysis operation
#[derive(Debug, Error, Diagnostic)]
pub enum AnalysisError {
    #[error("Configuration error: {} mapped column(s) not found\n{}", .missing.len(), list_missing(.missing))]
    #[diagnostic(
        code(lineup::config::missing_columns),
        help("Update the column mapping so every field points at a column of the sheet it is read from")
    )]
    MissingColumns { missing: Vec<MissingColumn> },

    #[error("No matching center sections between sheets '{front}' and '{rear}'")]
    #[diagnostic(
        code(lineup::join::empty),
        help("Make sure the front and rear sheets use the same center section values")
    )]
    EmptyJoin { front: String, rear: String },

    #[error("Corner weights must sum to 100% (got {total}%)")]
    #[diagnostic(code(lineup::weights::sum))]
    WeightSum { total: f64 },

    #[error("Corner weight for {corner} must be between 0 and 100 (got {value})")]
    #[diagnostic(code(lineup::weights::range))]
    WeightRange { corner: Corner, value: f64 },

    #[error("Unknown center section: {0}")]
    #[diagnostic(code(lineup::lineup::unknown_center))]
    UnknownCenterSection(String),

    #[error("Unknown {axle} clip: {clip}")]
    #[diagnostic(code(lineup::lineup::unknown_clip))]
    UnknownClip { axle: Axle, clip: String },

    #[error("No results computed yet")]
    #[diagnostic(help("Run a recompute before optimizing or overriding"))]
    NoWorkingSet,

    #[error("No lineup computed yet")]
    #[diagnostic(help("Run the optimizer before overriding or comparing clips"))]
    NoLineup,
}

/// Non-fatal conditions reported with results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A record produced a NaN damper length and was dropped
    IncompleteRecord {
        sheet: String,
        row: usize,
        center_section: String,
        clip: String,
        corners: Vec<Corner>,
    },
    /// No unused pair existed for a center section; fallback clips assigned
    InfeasibleAssignment {
        center_section: String,
        front_clip: String,
        rear_clip: String,
    },
    /// A clip is assigned to more than one center section
    DuplicateClip {
        axle: Axle,
        clip: String,
        center_sections: Vec<String>,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::IncompleteRecord {
                sheet,
                row,
                center_section,
                clip,
                corners,
            } => {
                let corners: Vec<String> = corners.iter().map(|c| c.to_string()).collect();
                write!(
                    f,
                    "Dropped {} row {} ({} / {}): incomplete {} geometry",
                    sheet,
                    row,
                    center_section,
                    clip,
                    corners.join(", ")
                )
            }
            Warning::InfeasibleAssignment {
                center_section,
                front_clip,
                rear_clip,
            } => write!(
                f,
                "No unused clip pair for {}; assigned {} / {} (not optimal)",
                center_section, front_clip, rear_clip
            ),
            Warning::DuplicateClip {
                axle,
                clip,
                center_sections,
            } => write!(
                f,
                "Duplicate {} clip {} used by {}",
                axle,
                clip,
                center_sections.join(", ")
            ),
        }
    }
}
