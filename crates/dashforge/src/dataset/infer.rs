//! Column kind inference for raw tables.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::column::{Column, ColumnValues};
use super::table::Dataset;
use super::types::ColumnKind;
use crate::error::Result;
use crate::input::DataTable;

/// Share of non-null cells that must agree before a non-text kind is chosen.
const KIND_AGREEMENT: f64 = 0.9;

static DATE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}[-/]\d{2}[-/]\d{2}|\d{2}[-/]\d{2}[-/]\d{4})").expect("valid date regex")
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

impl Dataset {
    /// Build a typed dataset from raw cells, inferring each column's kind.
    pub fn from_table(table: &DataTable) -> Result<Self> {
        let columns = table
            .headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells: Vec<&str> = table.column_values(idx).collect();
                let kind = infer_kind(&cells);
                Column::new(name.clone(), convert(&cells, kind))
            })
            .collect();
        Dataset::new(columns)
    }
}

/// Majority-vote the kind of a column from its non-null cells.
///
/// A column with no values at all is numerical, so it profiles as `no_data`.
pub fn infer_kind(cells: &[&str]) -> ColumnKind {
    let present: Vec<&str> = cells
        .iter()
        .copied()
        .filter(|c| !DataTable::is_null_value(c))
        .collect();
    if present.is_empty() {
        return ColumnKind::Numerical;
    }

    let mut counts: HashMap<ColumnKind, usize> = HashMap::new();
    for cell in &present {
        *counts.entry(detect_cell_kind(cell)).or_insert(0) += 1;
    }

    let total = present.len() as f64;
    [ColumnKind::Boolean, ColumnKind::Numerical, ColumnKind::Datetime]
        .into_iter()
        .find(|kind| counts.get(kind).copied().unwrap_or(0) as f64 / total >= KIND_AGREEMENT)
        .unwrap_or(ColumnKind::Categorical)
}

fn detect_cell_kind(cell: &str) -> ColumnKind {
    let trimmed = cell.trim();
    if parse_bool(trimmed).is_some() {
        ColumnKind::Boolean
    } else if parse_number(trimmed).is_some() {
        ColumnKind::Numerical
    } else if parse_datetime(trimmed).is_some() {
        ColumnKind::Datetime
    } else {
        ColumnKind::Categorical
    }
}

fn convert(cells: &[&str], kind: ColumnKind) -> ColumnValues {
    let present = |c: &str| (!DataTable::is_null_value(c)).then(|| c.trim().to_string());
    let present = cells.iter().map(|c| present(*c));
    match kind {
        ColumnKind::Numerical => ColumnValues::Numerical(
            present.map(|c| c.and_then(|c| parse_number(&c))).collect(),
        ),
        ColumnKind::Boolean => {
            ColumnValues::Boolean(present.map(|c| c.and_then(|c| parse_bool(&c))).collect())
        }
        ColumnKind::Datetime => ColumnValues::Datetime(
            present.map(|c| c.and_then(|c| parse_datetime(&c))).collect(),
        ),
        ColumnKind::Categorical => ColumnValues::Categorical(present.collect()),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value
        .replace('_', "")
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
}

/// Parse the date and datetime spellings seen in exported spreadsheets.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if !DATE_PREFIX.is_match(value) {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_kinds() {
        assert_eq!(infer_kind(&["1", "2.5", "NA"]), ColumnKind::Numerical);
        assert_eq!(infer_kind(&["true", "false", "yes"]), ColumnKind::Boolean);
        assert_eq!(infer_kind(&["2024-01-01", "2024-02-01"]), ColumnKind::Datetime);
        assert_eq!(infer_kind(&["north", "south", "1"]), ColumnKind::Categorical);
        assert_eq!(infer_kind(&["", "NA"]), ColumnKind::Numerical);
    }

    #[test]
    fn test_parse_datetime_variants() {
        assert!(parse_datetime("2024-03-05").is_some());
        assert!(parse_datetime("2024-03-05 10:30:00").is_some());
        assert!(parse_datetime("03/05/2024").is_some());
        assert!(parse_datetime("March 5").is_none());
    }

    #[test]
    fn test_from_table() {
        let table = DataTable::new(
            vec!["age".into(), "region".into()],
            vec![
                vec!["31".into(), "north".into()],
                vec!["".into(), "south".into()],
            ],
        );
        let ds = Dataset::from_table(&table).unwrap();
        assert_eq!(ds.column("age").unwrap().kind(), ColumnKind::Numerical);
        assert_eq!(ds.column("region").unwrap().kind(), ColumnKind::Categorical);
        assert_eq!(ds.missing_cells(), 1);
    }
}
