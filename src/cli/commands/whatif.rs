//! `lineup whatif` command - clip alternatives for one center section

use clap::ValueEnum;
use miette::Result;
use serde::Serialize;

use crate::cli::commands::lineup::{apply, LineupOpts};
use crate::cli::helpers::{print_status, print_warnings};
use crate::cli::input::load_session;
use crate::cli::output::{effective_format, is_structured, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::ClipDelta;
use crate::entities::Axle;

#[derive(clap::Args, Debug)]
pub struct WhatifArgs {
    /// Center section to inspect
    #[arg(long, short = 'c')]
    pub center: String,

    /// Axle whose clips are compared
    #[arg(long, short = 'a', value_enum, default_value = "front")]
    pub axle: AxleArg,

    #[command(flatten)]
    pub opts: LineupOpts,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum AxleArg {
    Front,
    Rear,
}

impl From<AxleArg> for Axle {
    fn from(axle: AxleArg) -> Self {
        match axle {
            AxleArg::Front => Axle::Front,
            AxleArg::Rear => Axle::Rear,
        }
    }
}

const FRONT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("clip", "FRONT CLIP"),
    ColumnDef::new("current", "CURRENT"),
    ColumnDef::new("availability", "AVAILABILITY"),
    ColumnDef::new("left", "LF"),
    ColumnDef::new("right", "RF"),
    ColumnDef::new("left_delta", "LF Δ"),
    ColumnDef::new("right_delta", "RF Δ"),
];

const REAR_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("clip", "REAR CLIP"),
    ColumnDef::new("current", "CURRENT"),
    ColumnDef::new("availability", "AVAILABILITY"),
    ColumnDef::new("left", "LR"),
    ColumnDef::new("right", "RR"),
    ColumnDef::new("left_delta", "LR Δ"),
    ColumnDef::new("right_delta", "RR Δ"),
];

#[derive(Serialize)]
struct WhatifReport<'a> {
    center_section: &'a str,
    axle: Axle,
    assigned: Option<&'a str>,
    clips: Vec<ClipDelta>,
}

fn delta_row(d: &ClipDelta) -> TableRow {
    let row = TableRow::new()
        .text("clip", &d.clip)
        .cell("current", CellValue::Flag(d.current))
        .text("availability", d.availability.to_string())
        .cell("left", CellValue::Length(d.lengths[0]))
        .cell("right", CellValue::Length(d.lengths[1]));
    match d.deltas {
        Some([left, right]) => row
            .cell("left_delta", CellValue::Delta(left))
            .cell("right_delta", CellValue::Delta(right)),
        None => row,
    }
}

pub fn run(args: WhatifArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = load_session(global)?;
    let warnings = apply(&mut session, &args.opts)?;

    let axle = Axle::from(args.axle);
    let clips = session.clip_deltas(&args.center, axle)?;
    let assigned = session
        .lineup()
        .and_then(|l| l.entries.get(&args.center))
        .map(|e| match axle {
            Axle::Front => e.front_clip.as_str(),
            Axle::Rear => e.rear_clip.as_str(),
        });

    let format = effective_format(global.format, true);
    if is_structured(format) {
        return print_structured(
            &WhatifReport {
                center_section: &args.center,
                axle,
                assigned,
                clips,
            },
            format,
        );
    }

    let columns = match axle {
        Axle::Front => FRONT_COLUMNS,
        Axle::Rear => REAR_COLUMNS,
    };
    let rows: Vec<TableRow> = clips.iter().map(delta_row).collect();
    TableFormatter::new(columns, "clip").output(&rows, format, &[])?;

    if let Some(clip) = assigned {
        print_status(
            format!("{} {} clip: {}", args.center, axle, clip),
            global.quiet,
        );
    }
    print_warnings(&warnings, global.quiet);
    Ok(())
}
