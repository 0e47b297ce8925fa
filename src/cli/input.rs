//! Survey and mapping loading for commands

use miette::{miette, IntoDiagnostic, Result, WrapErr};
use std::path::Path;

use crate::cli::helpers::{print_status, print_warnings};
use crate::cli::GlobalOpts;
use crate::core::{load_mapping, Session, SurveyInput};
use crate::entities::{ColumnMapping, SurveyTable};

/// Read a CSV file into a raw table named after the file
pub fn read_csv(path: &Path) -> Result<SurveyTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to open {}", path.display()))?;

    let columns: Vec<String> = reader
        .headers()
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read header row of {}", path.display()))?
        .iter()
        .map(String::from)
        .collect();

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mut table = SurveyTable::new(name, columns);

    for record in reader.records() {
        let record = record
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        table.push_row(record.iter().map(String::from).collect());
    }
    Ok(table)
}

/// The mapping named by `--mapping`, or the default mapping
pub fn mapping(global: &GlobalOpts) -> Result<ColumnMapping> {
    match &global.mapping {
        Some(path) => Ok(load_mapping(path)?),
        None => Ok(ColumnMapping::default()),
    }
}

/// The survey named by `--data` or `--front`/`--rear`
pub fn survey(global: &GlobalOpts) -> Result<SurveyInput> {
    match (&global.data, &global.front, &global.rear) {
        (Some(data), _, _) => Ok(SurveyInput::Single(read_csv(data)?)),
        (None, Some(front), Some(rear)) => Ok(SurveyInput::Dual {
            front: read_csv(front)?,
            rear: read_csv(rear)?,
        }),
        _ => Err(miette!(
            help = "Pass --data <csv> for a unified survey, or --front <csv> --rear <csv>",
            "No survey data given"
        )),
    }
}

/// Load the survey and build a session with a computed working set
pub fn load_session(global: &GlobalOpts) -> Result<Session> {
    let mapping = mapping(global)?;
    let input = survey(global)?;

    let mut session = Session::new();
    let ws = session.recompute(&input, &mapping, !global.no_normalize)?;

    if let Some(z) = ws.median_z {
        print_status(format!("LCA Z heights normalized to median {:.3}", z), global.quiet);
    }
    print_warnings(&ws.warnings, global.quiet);
    Ok(session)
}
