//! `lineup analyze` command - ranked working set

use clap::ValueEnum;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::print_status;
use crate::cli::input::load_session;
use crate::cli::output::{effective_format, is_structured, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::{RankedCombination, SheetMode};

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// Sort column
    #[arg(long, short = 's', value_enum, default_value = "lf-length")]
    pub sort: SortColumn,

    /// Reverse the sort
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Show at most N rows
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortColumn {
    /// Longest LF first
    LfLength,
    /// Center section identifier
    Center,
    /// Best front axle rank first
    FrontRank,
    /// Best rear axle rank first
    RearRank,
    /// Best combined axle rank first
    Combined,
}

const ANALYZE_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("center", "CENTER"),
    ColumnDef::new("clip", "CLIP"),
    ColumnDef::new("front_clip", "FRONT"),
    ColumnDef::new("rear_clip", "REAR"),
    ColumnDef::new("lf", "LF"),
    ColumnDef::new("rf", "RF"),
    ColumnDef::new("lr", "LR"),
    ColumnDef::new("rr", "RR"),
    ColumnDef::new("lf_rank", "LF RK"),
    ColumnDef::new("rf_rank", "RF RK"),
    ColumnDef::new("lr_rank", "LR RK"),
    ColumnDef::new("rr_rank", "RR RK"),
    ColumnDef::new("front_score", "F SCORE"),
    ColumnDef::new("rear_score", "R SCORE"),
    ColumnDef::new("front_rank", "F RANK"),
    ColumnDef::new("rear_rank", "R RANK"),
];

#[derive(Serialize)]
struct AnalyzeReport<'a> {
    mode: SheetMode,
    median_z: Option<f64>,
    combinations: Vec<&'a RankedCombination>,
}

fn sort_rows(rows: &mut [&RankedCombination], sort: SortColumn) {
    match sort {
        // working set order already
        SortColumn::LfLength => {}
        SortColumn::Center => rows.sort_by(|a, b| a.center_section.cmp(&b.center_section)),
        SortColumn::FrontRank => rows.sort_by_key(|r| r.front_rank),
        SortColumn::RearRank => rows.sort_by_key(|r| r.rear_rank),
        SortColumn::Combined => rows.sort_by_key(|r| r.front_rank + r.rear_rank),
    }
}

fn combination_row(c: &RankedCombination) -> TableRow {
    TableRow::new()
        .text("center", &c.center_section)
        .text("clip", c.label())
        .text("front_clip", &c.front_clip)
        .text("rear_clip", &c.rear_clip)
        .cell("lf", CellValue::Length(c.lengths.lf))
        .cell("rf", CellValue::Length(c.lengths.rf))
        .cell("lr", CellValue::Length(c.lengths.lr))
        .cell("rr", CellValue::Length(c.lengths.rr))
        .cell("lf_rank", c.ranks.lf)
        .cell("rf_rank", c.ranks.rf)
        .cell("lr_rank", c.ranks.lr)
        .cell("rr_rank", c.ranks.rr)
        .cell("front_score", c.front_weighted_score)
        .cell("rear_score", c.rear_weighted_score)
        .cell("front_rank", c.front_rank)
        .cell("rear_rank", c.rear_rank)
}

pub fn run(args: AnalyzeArgs, global: &GlobalOpts) -> Result<()> {
    let session = load_session(global)?;
    let Some(ws) = session.working_set() else {
        return Ok(());
    };

    let mut rows: Vec<&RankedCombination> = ws.combinations.iter().collect();
    sort_rows(&mut rows, args.sort);
    if args.reverse {
        rows.reverse();
    }
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }

    let format = effective_format(global.format, true);
    if is_structured(format) {
        return print_structured(
            &AnalyzeReport {
                mode: ws.mode,
                median_z: ws.median_z,
                combinations: rows,
            },
            format,
        );
    }

    if rows.is_empty() {
        print_status("No complete records to rank.", global.quiet);
        return Ok(());
    }

    let keys: Vec<&str> = ANALYZE_COLUMNS
        .iter()
        .map(|c| c.key)
        .filter(|k| match ws.mode {
            SheetMode::Single => !matches!(*k, "front_clip" | "rear_clip"),
            SheetMode::Dual => *k != "clip",
        })
        .collect();
    let table: Vec<TableRow> = rows.into_iter().map(combination_row).collect();
    TableFormatter::new(ANALYZE_COLUMNS, "combination").output(&table, format, &keys)
}
