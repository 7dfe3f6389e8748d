//! Statement normalization: header mapping, row validation, metadata
//! extraction and the structured/fallback decision.

pub mod columns;
pub mod decide;
pub mod layout;
pub mod metadata;
pub mod rows;

pub use columns::ColumnMap;
pub use decide::{decide, inspect, ParseMode, ParseReport, ParseStats};
pub use metadata::extract_metadata;
pub use rows::{validate_row, RowVerdict};
