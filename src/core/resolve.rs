//! Record resolution - typed survey records from raw sheets
//!
//! The column mapping is the only lookup table: no header inference happens
//! here. Every mapped column a sheet needs is checked up front so a
//! configuration error can name all missing fields at once.

use tracing::debug;

use crate::core::error::{AnalysisError, MissingColumn};
use crate::core::geometry::Point3;
use crate::entities::corner::PerCorner;
use crate::entities::mapping::{ColumnMapping, HardpointKind};
use crate::entities::survey::{CornerHardpoints, SheetScope, SurveyRecord};
use crate::entities::table::{parse_number, SurveyTable};

/// Every mapped column `scope` needs that `table` lacks
pub fn missing_columns(
    table: &SurveyTable,
    mapping: &ColumnMapping,
    scope: SheetScope,
) -> Vec<MissingColumn> {
    let mut fields = mapping.key_fields();
    for corner in scope.corners() {
        fields.extend(mapping.corner_fields(corner));
    }

    fields
        .into_iter()
        .filter(|(_, column)| !table.has_column(column))
        .map(|(field, column)| MissingColumn {
            field,
            column,
            sheet: table.name.clone(),
        })
        .collect()
}

/// Read typed records from a sheet
///
/// Fails with [`AnalysisError::MissingColumns`] listing every absent column.
pub fn resolve_records(
    table: &SurveyTable,
    mapping: &ColumnMapping,
    scope: SheetScope,
) -> Result<Vec<SurveyRecord>, AnalysisError> {
    let missing = missing_columns(table, mapping, scope);
    if !missing.is_empty() {
        return Err(AnalysisError::MissingColumns { missing });
    }
    Ok(read_records(table, mapping, scope))
}

/// Read records from a sheet already checked with [`missing_columns`]
///
/// Absent columns read as empty cells, which become NaN coordinates.
pub fn read_records(
    table: &SurveyTable,
    mapping: &ColumnMapping,
    scope: SheetScope,
) -> Vec<SurveyRecord> {
    let cell = |row: &[String], column: &str| -> String {
        table
            .column_index(column)
            .and_then(|i| row.get(i))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let corner_columns = PerCorner::from_fn(|corner| {
        scope
            .carries(corner)
            .then(|| mapping.corner_columns(corner))
    });

    let records: Vec<SurveyRecord> = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let row = row.as_slice();
            let point = |columns: &[String; 3]| {
                Point3::new(
                    parse_number(&cell(row, columns[0].as_str())),
                    parse_number(&cell(row, columns[1].as_str())),
                    parse_number(&cell(row, columns[2].as_str())),
                )
            };

            let hardpoints = corner_columns.map(|_, columns| {
                columns.as_ref().map(|columns| CornerHardpoints {
                    upper: point(columns.get(HardpointKind::Upper)),
                    lca_front: point(columns.get(HardpointKind::LcaFront)),
                    lca_rear: point(columns.get(HardpointKind::LcaRear)),
                })
            });

            SurveyRecord {
                row: i + 1,
                center_section: cell(row, mapping.center_section_col.as_str()),
                clip: cell(row, mapping.clip_col.as_str()),
                hardpoints,
            }
        })
        .collect();

    debug!(
        sheet = %table.name,
        records = records.len(),
        "resolved survey records"
    );
    records
}
