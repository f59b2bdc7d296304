//! Typed tabular data consumed by the pipeline.

mod column;
mod infer;
mod representation;
mod table;
mod types;

pub use column::{Column, ColumnValues};
pub use infer::{infer_kind, parse_datetime};
pub use representation::{ColumnInfo, DataRepresentation, RepresentationMetadata};
pub use table::Dataset;
pub use types::ColumnKind;
