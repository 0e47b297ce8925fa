//! Domain types: corners, column mappings, raw sheets and survey records

pub mod corner;
pub mod mapping;
pub mod survey;
pub mod table;

pub use corner::{Axle, Corner, PerCorner, Side};
pub use mapping::{ColumnMapping, CornerColumns, HardpointKind};
pub use survey::{CornerHardpoints, SheetScope, SurveyRecord};
pub use table::SurveyTable;
