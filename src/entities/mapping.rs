//! Column mapping - which sheet columns hold which hardpoint coordinates
//!
//! The mapping is flat so saved files read the same as the field list:
//! `center_section_col`, `clip_col`, then `<corner>_<point>_<axis>` for every
//! corner, point and axis, then `<corner>_y_offset`.

use serde::{Deserialize, Serialize};

use crate::entities::corner::{Corner, PerCorner};

/// Hardpoints measured at each corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardpointKind {
    Upper,
    LcaFront,
    LcaRear,
}

impl HardpointKind {
    pub const ALL: [HardpointKind; 3] = [
        HardpointKind::Upper,
        HardpointKind::LcaFront,
        HardpointKind::LcaRear,
    ];

    fn key(self) -> &'static str {
        match self {
            HardpointKind::Upper => "upper",
            HardpointKind::LcaFront => "lca_front",
            HardpointKind::LcaRear => "lca_rear",
        }
    }
}

const AXES: [&str; 3] = ["x", "y", "z"];

/// Column names for one corner's three hardpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CornerColumns {
    pub upper: [String; 3],
    pub lca_front: [String; 3],
    pub lca_rear: [String; 3],
}

impl CornerColumns {
    pub fn get(&self, kind: HardpointKind) -> &[String; 3] {
        match kind {
            HardpointKind::Upper => &self.upper,
            HardpointKind::LcaFront => &self.lca_front,
            HardpointKind::LcaRear => &self.lca_rear,
        }
    }
}

/// Flat column mapping plus lower mount Y offsets
///
/// Fields absent from a saved mapping keep their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub center_section_col: String,
    pub clip_col: String,

    pub lf_upper_x: String,
    pub lf_upper_y: String,
    pub lf_upper_z: String,
    pub rf_upper_x: String,
    pub rf_upper_y: String,
    pub rf_upper_z: String,
    pub lr_upper_x: String,
    pub lr_upper_y: String,
    pub lr_upper_z: String,
    pub rr_upper_x: String,
    pub rr_upper_y: String,
    pub rr_upper_z: String,

    pub lf_lca_front_x: String,
    pub lf_lca_front_y: String,
    pub lf_lca_front_z: String,
    pub lf_lca_rear_x: String,
    pub lf_lca_rear_y: String,
    pub lf_lca_rear_z: String,
    pub rf_lca_front_x: String,
    pub rf_lca_front_y: String,
    pub rf_lca_front_z: String,
    pub rf_lca_rear_x: String,
    pub rf_lca_rear_y: String,
    pub rf_lca_rear_z: String,
    pub lr_lca_front_x: String,
    pub lr_lca_front_y: String,
    pub lr_lca_front_z: String,
    pub lr_lca_rear_x: String,
    pub lr_lca_rear_y: String,
    pub lr_lca_rear_z: String,
    pub rr_lca_front_x: String,
    pub rr_lca_front_y: String,
    pub rr_lca_front_z: String,
    pub rr_lca_rear_x: String,
    pub rr_lca_rear_y: String,
    pub rr_lca_rear_z: String,

    /// Outboard distance from LCA center to lower damper mount (magnitudes)
    pub lf_y_offset: f64,
    pub rf_y_offset: f64,
    pub lr_y_offset: f64,
    pub rr_y_offset: f64,
}

fn default_lf_offset() -> f64 {
    12.1
}

fn default_rf_offset() -> f64 {
    12.6
}

fn default_lr_offset() -> f64 {
    14.5
}

fn default_rr_offset() -> f64 {
    15.6
}

/// Default column name for a hardpoint coordinate, e.g. `LF_LCA_Front_X`
fn default_column(corner: Corner, kind: HardpointKind, axis: &str) -> String {
    let point = match kind {
        HardpointKind::Upper => "Upper",
        HardpointKind::LcaFront => "LCA_Front",
        HardpointKind::LcaRear => "LCA_Rear",
    };
    format!("{}_{}_{}", corner, point, axis.to_uppercase())
}

impl Default for ColumnMapping {
    fn default() -> Self {
        use Corner::{Lf, Lr, Rf, Rr};
        use HardpointKind::{LcaFront, LcaRear, Upper};
        let c = default_column;
        Self {
            center_section_col: "Center_Section".to_string(),
            clip_col: "Clip".to_string(),
            lf_upper_x: c(Lf, Upper, "x"),
            lf_upper_y: c(Lf, Upper, "y"),
            lf_upper_z: c(Lf, Upper, "z"),
            rf_upper_x: c(Rf, Upper, "x"),
            rf_upper_y: c(Rf, Upper, "y"),
            rf_upper_z: c(Rf, Upper, "z"),
            lr_upper_x: c(Lr, Upper, "x"),
            lr_upper_y: c(Lr, Upper, "y"),
            lr_upper_z: c(Lr, Upper, "z"),
            rr_upper_x: c(Rr, Upper, "x"),
            rr_upper_y: c(Rr, Upper, "y"),
            rr_upper_z: c(Rr, Upper, "z"),
            lf_lca_front_x: c(Lf, LcaFront, "x"),
            lf_lca_front_y: c(Lf, LcaFront, "y"),
            lf_lca_front_z: c(Lf, LcaFront, "z"),
            lf_lca_rear_x: c(Lf, LcaRear, "x"),
            lf_lca_rear_y: c(Lf, LcaRear, "y"),
            lf_lca_rear_z: c(Lf, LcaRear, "z"),
            rf_lca_front_x: c(Rf, LcaFront, "x"),
            rf_lca_front_y: c(Rf, LcaFront, "y"),
            rf_lca_front_z: c(Rf, LcaFront, "z"),
            rf_lca_rear_x: c(Rf, LcaRear, "x"),
            rf_lca_rear_y: c(Rf, LcaRear, "y"),
            rf_lca_rear_z: c(Rf, LcaRear, "z"),
            lr_lca_front_x: c(Lr, LcaFront, "x"),
            lr_lca_front_y: c(Lr, LcaFront, "y"),
            lr_lca_front_z: c(Lr, LcaFront, "z"),
            lr_lca_rear_x: c(Lr, LcaRear, "x"),
            lr_lca_rear_y: c(Lr, LcaRear, "y"),
            lr_lca_rear_z: c(Lr, LcaRear, "z"),
            rr_lca_front_x: c(Rr, LcaFront, "x"),
            rr_lca_front_y: c(Rr, LcaFront, "y"),
            rr_lca_front_z: c(Rr, LcaFront, "z"),
            rr_lca_rear_x: c(Rr, LcaRear, "x"),
            rr_lca_rear_y: c(Rr, LcaRear, "y"),
            rr_lca_rear_z: c(Rr, LcaRear, "z"),
            lf_y_offset: default_lf_offset(),
            rf_y_offset: default_rf_offset(),
            lr_y_offset: default_lr_offset(),
            rr_y_offset: default_rr_offset(),
        }
    }
}

impl ColumnMapping {
    /// Column names for one corner
    pub fn corner_columns(&self, corner: Corner) -> CornerColumns {
        let cols = |x: &String, y: &String, z: &String| [x.clone(), y.clone(), z.clone()];
        match corner {
            Corner::Lf => CornerColumns {
                upper: cols(&self.lf_upper_x, &self.lf_upper_y, &self.lf_upper_z),
                lca_front: cols(&self.lf_lca_front_x, &self.lf_lca_front_y, &self.lf_lca_front_z),
                lca_rear: cols(&self.lf_lca_rear_x, &self.lf_lca_rear_y, &self.lf_lca_rear_z),
            },
            Corner::Rf => CornerColumns {
                upper: cols(&self.rf_upper_x, &self.rf_upper_y, &self.rf_upper_z),
                lca_front: cols(&self.rf_lca_front_x, &self.rf_lca_front_y, &self.rf_lca_front_z),
                lca_rear: cols(&self.rf_lca_rear_x, &self.rf_lca_rear_y, &self.rf_lca_rear_z),
            },
            Corner::Lr => CornerColumns {
                upper: cols(&self.lr_upper_x, &self.lr_upper_y, &self.lr_upper_z),
                lca_front: cols(&self.lr_lca_front_x, &self.lr_lca_front_y, &self.lr_lca_front_z),
                lca_rear: cols(&self.lr_lca_rear_x, &self.lr_lca_rear_y, &self.lr_lca_rear_z),
            },
            Corner::Rr => CornerColumns {
                upper: cols(&self.rr_upper_x, &self.rr_upper_y, &self.rr_upper_z),
                lca_front: cols(&self.rr_lca_front_x, &self.rr_lca_front_y, &self.rr_lca_front_z),
                lca_rear: cols(&self.rr_lca_rear_x, &self.rr_lca_rear_y, &self.rr_lca_rear_z),
            },
        }
    }

    /// Y offsets as magnitudes, one per corner
    pub fn offsets(&self) -> PerCorner<f64> {
        PerCorner::new(
            self.lf_y_offset.abs(),
            self.rf_y_offset.abs(),
            self.lr_y_offset.abs(),
            self.rr_y_offset.abs(),
        )
    }

    /// `(logical field, column)` pairs a corner reads, e.g. `("lr_upper_x", "LR_Upper_X")`
    pub fn corner_fields(&self, corner: Corner) -> Vec<(String, String)> {
        let columns = self.corner_columns(corner);
        let mut fields = Vec::with_capacity(9);
        for kind in HardpointKind::ALL {
            for (axis, column) in AXES.iter().zip(columns.get(kind)) {
                fields.push((
                    format!("{}_{}_{}", corner.key(), kind.key(), axis),
                    column.clone(),
                ));
            }
        }
        fields
    }

    /// `(logical field, column)` pairs for the identifier columns
    pub fn key_fields(&self) -> Vec<(String, String)> {
        vec![
            ("center_section_col".to_string(), self.center_section_col.clone()),
            ("clip_col".to_string(), self.clip_col.clone()),
        ]
    }
}
