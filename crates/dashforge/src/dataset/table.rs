//! The immutable dataset the pipeline reads from.

use std::collections::HashSet;

use serde::Serialize;

use super::column::{Column, ColumnValues};
use super::types::ColumnKind;
use crate::error::{DashforgeError, Result};

/// Named, typed columns of equal length.
///
/// Construction validates the shape; afterwards the pipeline only reads it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Assemble a dataset, rejecting duplicate names and ragged columns.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if column.name.trim().is_empty() {
                return Err(DashforgeError::InvalidDataset(
                    "column names must not be empty".to_string(),
                ));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(DashforgeError::InvalidDataset(format!(
                    "duplicate column '{}'",
                    column.name
                )));
            }
        }

        let row_count = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != row_count) {
            return Err(DashforgeError::InvalidDataset(format!(
                "column '{}' has {} rows, expected {}",
                bad.name,
                bad.len(),
                row_count
            )));
        }

        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Names of the columns of one kind, in dataset order.
    pub fn names_of_kind(&self, kind: ColumnKind) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind() == kind)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Total missing cells across all columns.
    pub fn missing_cells(&self) -> usize {
        self.columns.iter().map(|c| c.values.missing_count()).sum()
    }

    /// Rough in-memory footprint in bytes.
    pub fn estimated_memory_bytes(&self) -> usize {
        self.columns
            .iter()
            .map(|c| {
                let text: usize = match &c.values {
                    ColumnValues::Categorical(v) => v.iter().flatten().map(String::len).sum(),
                    _ => 0,
                };
                c.kind().cell_bytes() * self.row_count + text + c.name.len()
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Dataset::new(vec![
            Column::numerical("a", vec![Some(1.0)]),
            Column::numerical("a", vec![Some(2.0)]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate column 'a'"));
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let err = Dataset::new(vec![
            Column::numerical("a", vec![Some(1.0), Some(2.0)]),
            Column::categorical("b", vec![Some("x")]),
        ])
        .unwrap_err();
        assert!(matches!(err, DashforgeError::InvalidDataset(_)));
    }

    #[test]
    fn test_names_of_kind_preserve_order() {
        let ds = Dataset::new(vec![
            Column::numerical("z", vec![Some(1.0)]),
            Column::categorical("c", vec![Some("x")]),
            Column::numerical("a", vec![None]),
        ])
        .unwrap();
        assert_eq!(ds.names_of_kind(ColumnKind::Numerical), vec!["z", "a"]);
        assert_eq!(ds.missing_cells(), 1);
        assert!(ds.estimated_memory_bytes() > 0);
    }
}
