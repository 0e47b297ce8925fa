//! `lineup rollup` command - grouped means

use clap::ValueEnum;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::print_status;
use crate::cli::input::load_session;
use crate::cli::output::{effective_format, is_structured, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::{
    length_correlation, rollup_by_center, rollup_by_clip, AxleMeans, AxleTable, CenterRollup,
    ClipRollup,
};
use crate::entities::Axle;

#[derive(clap::Args, Debug)]
pub struct RollupArgs {
    /// Grouping
    #[arg(long, short = 'b', value_enum, default_value = "center")]
    pub by: RollupBy,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RollupBy {
    /// Per center section, front and rear side by side
    Center,
    /// Per front clip
    FrontClip,
    /// Per rear clip
    RearClip,
}

const CENTER_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("center", "CENTER"),
    ColumnDef::new("front_n", "F N"),
    ColumnDef::new("lf_rank", "LF RK"),
    ColumnDef::new("rf_rank", "RF RK"),
    ColumnDef::new("front_rank", "F RANK"),
    ColumnDef::new("lf", "LF"),
    ColumnDef::new("rf", "RF"),
    ColumnDef::new("rear_n", "R N"),
    ColumnDef::new("lr_rank", "LR RK"),
    ColumnDef::new("rr_rank", "RR RK"),
    ColumnDef::new("rear_rank", "R RANK"),
    ColumnDef::new("lr", "LR"),
    ColumnDef::new("rr", "RR"),
];

const FRONT_CLIP_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("clip", "FRONT CLIP"),
    ColumnDef::new("n", "N"),
    ColumnDef::new("left_rank", "LF RK"),
    ColumnDef::new("right_rank", "RF RK"),
    ColumnDef::new("axle_rank", "F RANK"),
    ColumnDef::new("left", "LF"),
    ColumnDef::new("right", "RF"),
];

const REAR_CLIP_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("clip", "REAR CLIP"),
    ColumnDef::new("n", "N"),
    ColumnDef::new("left_rank", "LR RK"),
    ColumnDef::new("right_rank", "RR RK"),
    ColumnDef::new("axle_rank", "R RANK"),
    ColumnDef::new("left", "LR"),
    ColumnDef::new("right", "RR"),
];

#[derive(Serialize)]
struct Correlation {
    front: Option<f64>,
    rear: Option<f64>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Groups {
    Center(Vec<CenterRollup>),
    Clip(Vec<ClipRollup>),
}

#[derive(Serialize)]
struct RollupReport {
    groups: Groups,
    correlation: Correlation,
}

/// Add one axle's means under the given column keys
fn axle_cells(row: TableRow, keys: [&'static str; 6], means: Option<&AxleMeans>) -> TableRow {
    let [n, left_rank, right_rank, axle_rank, left, right] = keys;
    match means {
        Some(m) => row
            .cell(n, CellValue::Rank(m.count as u32))
            .cell(left_rank, CellValue::Mean(m.ranks[0]))
            .cell(right_rank, CellValue::Mean(m.ranks[1]))
            .cell(axle_rank, CellValue::Mean(m.axle_rank))
            .cell(left, CellValue::Length(m.lengths[0]))
            .cell(right, CellValue::Length(m.lengths[1])),
        None => row,
    }
}

fn center_row(r: &CenterRollup) -> TableRow {
    let row = TableRow::new().text("center", &r.center_section);
    let row = axle_cells(
        row,
        ["front_n", "lf_rank", "rf_rank", "front_rank", "lf", "rf"],
        r.front.as_ref(),
    );
    axle_cells(
        row,
        ["rear_n", "lr_rank", "rr_rank", "rear_rank", "lr", "rr"],
        r.rear.as_ref(),
    )
}

fn clip_row(r: &ClipRollup) -> TableRow {
    axle_cells(
        TableRow::new().text("clip", &r.clip),
        ["n", "left_rank", "right_rank", "axle_rank", "left", "right"],
        Some(&r.means),
    )
}

fn correlation_line(table: &AxleTable, value: Option<f64>) -> String {
    let [left, right] = table.axle.corners();
    match value {
        Some(r) => format!("{}/{} length correlation: {:.3}", left, right, r),
        None => format!("{}/{} length correlation: n/a", left, right),
    }
}

pub fn run(args: RollupArgs, global: &GlobalOpts) -> Result<()> {
    let session = load_session(global)?;
    let Some(ws) = session.working_set() else {
        return Ok(());
    };

    let correlation = Correlation {
        front: length_correlation(&ws.front),
        rear: length_correlation(&ws.rear),
    };
    let groups = match args.by {
        RollupBy::Center => Groups::Center(rollup_by_center(&ws.front, &ws.rear)),
        RollupBy::FrontClip => Groups::Clip(rollup_by_clip(&ws.front)),
        RollupBy::RearClip => Groups::Clip(rollup_by_clip(&ws.rear)),
    };

    let format = effective_format(global.format, true);
    if is_structured(format) {
        return print_structured(&RollupReport { groups, correlation }, format);
    }

    match &groups {
        Groups::Center(rollups) => {
            let rows: Vec<TableRow> = rollups.iter().map(center_row).collect();
            TableFormatter::new(CENTER_COLUMNS, "center section").output(&rows, format, &[])?;
        }
        Groups::Clip(rollups) => {
            let columns = if args.by == RollupBy::FrontClip {
                FRONT_CLIP_COLUMNS
            } else {
                REAR_CLIP_COLUMNS
            };
            let rows: Vec<TableRow> = rollups.iter().map(clip_row).collect();
            TableFormatter::new(columns, "clip").output(&rows, format, &[])?;
        }
    }

    let axles: Vec<(Axle, Option<f64>)> = match args.by {
        RollupBy::Center => vec![(Axle::Front, correlation.front), (Axle::Rear, correlation.rear)],
        RollupBy::FrontClip => vec![(Axle::Front, correlation.front)],
        RollupBy::RearClip => vec![(Axle::Rear, correlation.rear)],
    };
    for (axle, value) in axles {
        let table = match axle {
            Axle::Front => &ws.front,
            Axle::Rear => &ws.rear,
        };
        print_status(correlation_line(table, value), global.quiet);
    }
    Ok(())
}
