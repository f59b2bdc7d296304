//! Typed column storage.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::ColumnKind;

/// Cell values of one column; `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ColumnValues {
    Numerical(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
    Datetime(Vec<Option<NaiveDateTime>>),
    Boolean(Vec<Option<bool>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numerical(v) => v.len(),
            ColumnValues::Categorical(v) => v.len(),
            ColumnValues::Datetime(v) => v.len(),
            ColumnValues::Boolean(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnValues::Numerical(_) => ColumnKind::Numerical,
            ColumnValues::Categorical(_) => ColumnKind::Categorical,
            ColumnValues::Datetime(_) => ColumnKind::Datetime,
            ColumnValues::Boolean(_) => ColumnKind::Boolean,
        }
    }

    pub fn missing_count(&self) -> usize {
        match self {
            ColumnValues::Numerical(v) => v.iter().filter(|x| x.is_none_or(f64::is_nan)).count(),
            ColumnValues::Categorical(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnValues::Datetime(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnValues::Boolean(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    pub fn new(name: impl Into<String>, values: ColumnValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn numerical(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnValues::Numerical(values))
    }

    pub fn categorical<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        Self::new(name, ColumnValues::Categorical(values))
    }

    pub fn datetime(name: impl Into<String>, values: Vec<Option<NaiveDateTime>>) -> Self {
        Self::new(name, ColumnValues::Datetime(values))
    }

    pub fn boolean(name: impl Into<String>, values: Vec<Option<bool>>) -> Self {
        Self::new(name, ColumnValues::Boolean(values))
    }

    pub fn kind(&self) -> ColumnKind {
        self.values.kind()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Non-missing numbers, in row order. Empty for non-numerical columns.
    pub fn numbers(&self) -> Vec<f64> {
        match &self.values {
            ColumnValues::Numerical(v) => v.iter().flatten().copied().filter(|x| !x.is_nan()).collect(),
            _ => Vec::new(),
        }
    }

    /// The cell at `row` rendered as a JSON value (`null` when missing).
    pub fn json_value(&self, row: usize) -> Value {
        match &self.values {
            ColumnValues::Numerical(v) => v
                .get(row)
                .copied()
                .flatten()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ColumnValues::Categorical(v) => v
                .get(row)
                .cloned()
                .flatten()
                .map(Value::String)
                .unwrap_or(Value::Null),
            ColumnValues::Datetime(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|d| Value::String(d.format("%Y-%m-%dT%H:%M:%S").to_string()))
                .unwrap_or(Value::Null),
            ColumnValues::Boolean(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(Value::Bool)
                .unwrap_or(Value::Null),
        }
    }

    /// The cell at `row` as a grouping label (`None` when missing).
    pub fn label(&self, row: usize) -> Option<String> {
        match &self.values {
            ColumnValues::Categorical(v) => v.get(row).cloned().flatten(),
            ColumnValues::Boolean(v) => v.get(row).copied().flatten().map(|b| b.to_string()),
            ColumnValues::Numerical(v) => v.get(row).copied().flatten().map(|x| x.to_string()),
            ColumnValues::Datetime(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_counts_nan() {
        let col = Column::numerical("x", vec![Some(1.0), None, Some(f64::NAN)]);
        assert_eq!(col.values.missing_count(), 2);
        assert_eq!(col.numbers(), vec![1.0]);
    }

    #[test]
    fn test_json_value() {
        let col = Column::categorical("c", vec![Some("a"), None]);
        assert_eq!(col.json_value(0), Value::String("a".into()));
        assert_eq!(col.json_value(1), Value::Null);
        assert_eq!(col.json_value(9), Value::Null);
    }
}
