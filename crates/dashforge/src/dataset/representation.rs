//! JSON-ready view of a dataset for renderers and prompts.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::table::Dataset;
use super::types::ColumnKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepresentationMetadata {
    pub total_rows: usize,
    pub total_columns: usize,
    /// Rows copied into `records`.
    pub sampled_rows: usize,
    pub memory_usage_bytes: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
}

/// Metadata, column roster and the leading rows as records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRepresentation {
    pub metadata: RepresentationMetadata,
    pub columns: Vec<ColumnInfo>,
    pub records: Vec<IndexMap<String, Value>>,
}

impl DataRepresentation {
    /// Describe `dataset`, copying at most `sample_rows` leading rows.
    pub fn from_dataset(dataset: &Dataset, sample_rows: usize) -> Self {
        let sampled = dataset.row_count().min(sample_rows);
        let records = (0..sampled)
            .map(|row| {
                dataset
                    .columns()
                    .iter()
                    .map(|c| (c.name.clone(), c.json_value(row)))
                    .collect()
            })
            .collect();

        Self {
            metadata: RepresentationMetadata {
                total_rows: dataset.row_count(),
                total_columns: dataset.column_count(),
                sampled_rows: sampled,
                memory_usage_bytes: dataset.estimated_memory_bytes(),
                created_at: Utc::now(),
            },
            columns: dataset
                .columns()
                .iter()
                .map(|c| ColumnInfo {
                    name: c.name.clone(),
                    kind: c.kind(),
                    missing: c.values.missing_count(),
                })
                .collect(),
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    #[test]
    fn test_records_are_capped_and_ordered() {
        let ds = Dataset::new(vec![
            Column::numerical("b", vec![Some(1.5), None, Some(3.0)]),
            Column::categorical("a", vec![Some("x"), Some("y"), None]),
        ])
        .unwrap();

        let rep = DataRepresentation::from_dataset(&ds, 2);
        assert_eq!(rep.metadata.total_rows, 3);
        assert_eq!(rep.metadata.sampled_rows, 2);
        assert_eq!(rep.records.len(), 2);
        let keys: Vec<_> = rep.records[0].keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(rep.records[1]["b"], Value::Null);
        assert_eq!(rep.columns[0].missing, 1);
    }
}
