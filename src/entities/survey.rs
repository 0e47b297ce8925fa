//! Survey records - typed hardpoint measurements for one clip on one center section

use serde::Serialize;

use crate::core::geometry::Point3;
use crate::entities::corner::{Axle, Corner, PerCorner};

/// Which corners a sheet carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetScope {
    /// Unified sheet: every row measures all four corners
    Full,
    /// One axle's sheet in dual-sheet mode
    Axle(Axle),
}

impl SheetScope {
    pub fn carries(self, corner: Corner) -> bool {
        match self {
            SheetScope::Full => true,
            SheetScope::Axle(axle) => corner.axle() == axle,
        }
    }

    pub fn corners(self) -> Vec<Corner> {
        Corner::ALL.into_iter().filter(|c| self.carries(*c)).collect()
    }
}

/// The three surveyed hardpoints of one corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerHardpoints {
    pub upper: Point3,
    pub lca_front: Point3,
    pub lca_rear: Point3,
}

/// One surveyed clip on one center section
///
/// Corners outside the sheet's scope are `None`. Coordinates read from empty or
/// non-numeric cells are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRecord {
    /// 1-based data row within its sheet
    pub row: usize,
    pub center_section: String,
    pub clip: String,
    pub hardpoints: PerCorner<Option<CornerHardpoints>>,
}

impl SurveyRecord {
    /// Corners this record carries, in survey order
    pub fn corners(&self) -> impl Iterator<Item = (Corner, &CornerHardpoints)> {
        self.hardpoints
            .iter()
            .filter_map(|(corner, hp)| hp.as_ref().map(|hp| (corner, hp)))
    }
}
