//! Column kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic kind of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating-point measurements.
    Numerical,
    /// Discrete text labels.
    Categorical,
    /// Dates or timestamps.
    Datetime,
    /// True/false flags.
    Boolean,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numerical => "numerical",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Datetime => "datetime",
            ColumnKind::Boolean => "boolean",
        }
    }

    /// Approximate in-memory size of one cell, used for the memory estimate.
    pub(crate) fn cell_bytes(&self) -> usize {
        match self {
            ColumnKind::Numerical => 16,
            ColumnKind::Categorical => 24,
            ColumnKind::Datetime => 16,
            ColumnKind::Boolean => 2,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
