//! `lineup lineup` command - greedy clip assignment

use miette::{miette, Result};
use serde::Serialize;

use crate::cli::helpers::{format_mean, print_status, print_warnings, SectionValue};
use crate::cli::input::load_session;
use crate::cli::output::{effective_format, is_structured, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::{CornerWeights, Duplicates, LineupRow, LineupSummary, Session, TrackType, Warning};
use crate::entities::Axle;

/// Optimizer inputs and manual overrides, shared with `whatif`
#[derive(clap::Args, Debug, Clone)]
pub struct LineupOpts {
    /// Corner weights in percent as LF,RF,LR,RR; must sum to 100
    #[arg(long, short = 'w', default_value = "25,25,25,25")]
    pub weights: CornerWeights,

    /// Override a front clip after optimizing (CENTER=CLIP, repeatable)
    #[arg(long = "set-front", value_name = "CENTER=CLIP")]
    pub set_front: Vec<SectionValue>,

    /// Override a rear clip after optimizing (CENTER=CLIP, repeatable)
    #[arg(long = "set-rear", value_name = "CENTER=CLIP")]
    pub set_rear: Vec<SectionValue>,

    /// Tag a center section with a track type (CENTER=INT|ST|RC|Utility|SSW|Backup)
    #[arg(long, value_name = "CENTER=TYPE")]
    pub track: Vec<SectionValue>,
}

#[derive(clap::Args, Debug)]
pub struct LineupArgs {
    #[command(flatten)]
    pub opts: LineupOpts,
}

const LINEUP_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("track", "TRACK"),
    ColumnDef::new("center", "CENTER"),
    ColumnDef::new("front_clip", "FRONT"),
    ColumnDef::new("lf", "LF"),
    ColumnDef::new("rf", "RF"),
    ColumnDef::new("lf_rank", "LF RK"),
    ColumnDef::new("rf_rank", "RF RK"),
    ColumnDef::new("front_rank", "F RANK"),
    ColumnDef::new("rear_clip", "REAR"),
    ColumnDef::new("lr", "LR"),
    ColumnDef::new("rr", "RR"),
    ColumnDef::new("lr_rank", "LR RK"),
    ColumnDef::new("rr_rank", "RR RK"),
    ColumnDef::new("rear_rank", "R RANK"),
    ColumnDef::new("score", "SCORE"),
    ColumnDef::new("flags", "FLAGS"),
];

#[derive(Serialize)]
struct LineupReport {
    weights: CornerWeights,
    manual: bool,
    rows: Vec<LineupRow>,
    duplicates: Duplicates,
    summary: Option<LineupSummary>,
    warnings: Vec<Warning>,
}

/// Run the optimizer and apply overrides in order: fronts, rears, tracks
///
/// Returns the optimizer's fallback warnings.
pub fn apply(session: &mut Session, opts: &LineupOpts) -> Result<Vec<Warning>> {
    let warnings = session.optimize(opts.weights)?;
    for o in &opts.set_front {
        session.set_clip(Axle::Front, &o.center_section, &o.value)?;
    }
    for o in &opts.set_rear {
        session.set_clip(Axle::Rear, &o.center_section, &o.value)?;
    }
    for o in &opts.track {
        let track: TrackType = o.value.parse().map_err(|e: String| miette!("{}", e))?;
        session.set_track(&o.center_section, track)?;
    }
    Ok(warnings)
}

fn flags(row: &LineupRow) -> String {
    let mut flags = Vec::new();
    if row.fallback {
        flags.push("fallback");
    }
    if row.duplicate_front {
        flags.push("dup-front");
    }
    if row.duplicate_rear {
        flags.push("dup-rear");
    }
    flags.join(",")
}

fn lineup_row(row: &LineupRow) -> TableRow {
    let mut out = TableRow::new()
        .text("track", row.track.to_string())
        .text("center", &row.center_section)
        .text("front_clip", &row.front_clip)
        .text("rear_clip", &row.rear_clip)
        .cell("score", CellValue::Score(row.score))
        .text("flags", flags(row));
    if let Some(f) = &row.front {
        out = out
            .cell("lf", CellValue::Length(f.lengths[0]))
            .cell("rf", CellValue::Length(f.lengths[1]))
            .cell("lf_rank", f.ranks[0])
            .cell("rf_rank", f.ranks[1])
            .cell("front_rank", f.axle_rank);
    }
    if let Some(r) = &row.rear {
        out = out
            .cell("lr", CellValue::Length(r.lengths[0]))
            .cell("rr", CellValue::Length(r.lengths[1]))
            .cell("lr_rank", r.ranks[0])
            .cell("rr_rank", r.ranks[1])
            .cell("rear_rank", r.axle_rank);
    }
    out
}

fn summary_line(summary: &LineupSummary) -> String {
    format!(
        "Mean ranks over {} section(s): LF {} RF {} LR {} RR {} | front {} rear {}",
        summary.sections,
        format_mean(summary.ranks.lf),
        format_mean(summary.ranks.rf),
        format_mean(summary.ranks.lr),
        format_mean(summary.ranks.rr),
        format_mean(summary.front_rank),
        format_mean(summary.rear_rank),
    )
}

pub fn run(args: LineupArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = load_session(global)?;
    let mut warnings = apply(&mut session, &args.opts)?;

    let lineup = session
        .lineup()
        .ok_or_else(|| miette!("No lineup computed"))?;
    warnings.extend(lineup.duplicate_warnings());
    let duplicates = lineup.duplicates();
    let (weights, manual) = (lineup.weights, lineup.manual);
    let rows = session.lineup_rows()?;
    let summary = session.lineup_summary()?;

    let format = effective_format(global.format, true);
    if is_structured(format) {
        return print_structured(
            &LineupReport {
                weights,
                manual,
                rows,
                duplicates,
                summary,
                warnings,
            },
            format,
        );
    }

    let table: Vec<TableRow> = rows.iter().map(lineup_row).collect();
    TableFormatter::new(LINEUP_COLUMNS, "center section").output(&table, format, &[])?;

    print_status(format!("Weights: {}", weights), global.quiet);
    if let Some(summary) = &summary {
        print_status(summary_line(summary), global.quiet);
    }
    print_warnings(&warnings, global.quiet);
    Ok(())
}
