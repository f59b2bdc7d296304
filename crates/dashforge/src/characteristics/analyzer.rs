//! Builds a [`CharacteristicsProfile`] from a dataset.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::profile::{
    BasicInfo, BooleanPattern, CategoricalPattern, CharacteristicsProfile, ColumnTypes,
    CorrelationMatrix, CorrelationPair, CorrelationStrength, CorrelationSummary, DataPattern,
    DatetimePattern, DistributionType, NumericalPattern, Relationships, MODERATE_CORRELATION,
    STRONG_CORRELATION,
};
use super::stats::{self, Moments};
use crate::dataset::{Column, ColumnKind, ColumnValues, Dataset};

/// Number of most frequent categories kept in a categorical pattern.
const TOP_CATEGORIES: usize = 5;

/// Cardinality above which a categorical column counts as having rare categories.
const RARE_CATEGORY_CARDINALITY: usize = 10;

/// Computes per-column patterns and pairwise correlations.
///
/// Pure: the same dataset always produces the same profile.
#[derive(Debug, Clone)]
pub struct CharacteristicsAnalyzer {
    /// Outlier fence multiplier for the IQR rule.
    iqr_multiplier: f64,
}

impl Default for CharacteristicsAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacteristicsAnalyzer {
    pub fn new() -> Self {
        Self { iqr_multiplier: 1.5 }
    }

    pub fn analyze(&self, dataset: &Dataset) -> CharacteristicsProfile {
        let row_count = dataset.row_count();
        let column_count = dataset.column_count();
        let cells = row_count * column_count;
        let missing_data_percent = if cells == 0 {
            0.0
        } else {
            dataset.missing_cells() as f64 / cells as f64 * 100.0
        };

        let basic_info = BasicInfo {
            row_count,
            column_count,
            missing_data_percent,
            memory_usage_mb: dataset.estimated_memory_bytes() as f64 / (1024.0 * 1024.0),
        };

        let column_types = ColumnTypes {
            numerical: dataset.names_of_kind(ColumnKind::Numerical),
            categorical: dataset.names_of_kind(ColumnKind::Categorical),
            datetime: dataset.names_of_kind(ColumnKind::Datetime),
            boolean: dataset.names_of_kind(ColumnKind::Boolean),
        };

        let data_patterns: IndexMap<String, DataPattern> = dataset
            .columns()
            .iter()
            .map(|c| (c.name.clone(), self.column_pattern(c, row_count)))
            .collect();

        let relationships = Relationships {
            correlations: correlation_summary(dataset, &column_types.numerical),
        };

        let hints = hints(&data_patterns);

        tracing::debug!(
            rows = row_count,
            columns = column_count,
            numerical = column_types.numerical.len(),
            categorical = column_types.categorical.len(),
            "analyzed dataset characteristics"
        );

        CharacteristicsProfile {
            basic_info,
            column_types,
            data_patterns,
            relationships,
            hints,
        }
    }

    fn column_pattern(&self, column: &Column, row_count: usize) -> DataPattern {
        match &column.values {
            ColumnValues::Numerical(_) => {
                DataPattern::Numerical(self.numerical_pattern(&column.numbers(), row_count))
            }
            ColumnValues::Categorical(values) => {
                DataPattern::Categorical(categorical_pattern(values, row_count))
            }
            ColumnValues::Boolean(values) => {
                let present: Vec<bool> = values.iter().flatten().copied().collect();
                let true_percentage = if present.is_empty() {
                    0.0
                } else {
                    present.iter().filter(|b| **b).count() as f64 / present.len() as f64 * 100.0
                };
                DataPattern::Boolean(BooleanPattern {
                    true_percentage,
                    missing: values.len() - present.len(),
                })
            }
            ColumnValues::Datetime(values) => {
                let min = values.iter().flatten().min().copied();
                let max = values.iter().flatten().max().copied();
                let span_days = match (min, max) {
                    (Some(lo), Some(hi)) => (hi - lo).num_days(),
                    _ => 0,
                };
                DataPattern::Datetime(DatetimePattern { min, max, span_days })
            }
        }
    }

    fn numerical_pattern(&self, values: &[f64], row_count: usize) -> NumericalPattern {
        if values.is_empty() {
            return NumericalPattern {
                distribution_type: DistributionType::NoData,
                outlier_percentage: 0.0,
                data_range: None,
                variability: 0.0,
                unique_values: 0,
                zero_percentage: 0.0,
                skewness: None,
                kurtosis: None,
            };
        }

        let moments = Moments::from_values(values);
        let skewness = moments.skewness();
        let kurtosis = moments.kurtosis();
        let sorted = stats::sorted(values);

        let q1 = stats::quantile(&sorted, 0.25);
        let q3 = stats::quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let outlier_percentage = if iqr > 0.0 && row_count > 0 {
            let lower = q1 - self.iqr_multiplier * iqr;
            let upper = q3 + self.iqr_multiplier * iqr;
            let outliers = values.iter().filter(|v| **v < lower || **v > upper).count();
            outliers as f64 / row_count as f64 * 100.0
        } else {
            0.0
        };

        let variability = match moments.std() {
            Some(std) if moments.mean != 0.0 => std / moments.mean,
            _ => 0.0,
        };

        let mut unique_values = sorted.clone();
        unique_values.dedup();

        let zero_percentage = if row_count == 0 {
            0.0
        } else {
            values.iter().filter(|v| **v == 0.0).count() as f64 / row_count as f64 * 100.0
        };

        NumericalPattern {
            distribution_type: DistributionType::classify(skewness, kurtosis),
            outlier_percentage,
            data_range: Some((sorted[0], sorted[sorted.len() - 1])),
            variability,
            unique_values: unique_values.len(),
            zero_percentage,
            skewness,
            kurtosis,
        }
    }
}

fn categorical_pattern(values: &[Option<String>], row_count: usize) -> CategoricalPattern {
    // Count in first-seen order so ties rank deterministically.
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for value in values.iter().flatten() {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let cardinality = ranked.len();
    let rows = row_count.max(1) as f64;
    let top_category_dominance = ranked.first().map(|(_, n)| *n as f64 / rows).unwrap_or(0.0);

    let distribution_evenness = if cardinality < 2 {
        1.0
    } else {
        let freqs: Vec<f64> = ranked.iter().map(|(_, n)| *n as f64).collect();
        let m = Moments::from_values(&freqs);
        match m.std() {
            Some(std) if m.mean > 0.0 => 1.0 - std / m.mean,
            _ => 1.0,
        }
    };

    CategoricalPattern {
        cardinality,
        cardinality_ratio: if row_count == 0 { 0.0 } else { cardinality as f64 / rows },
        top_category_dominance,
        distribution_evenness,
        has_rare_categories: cardinality > RARE_CATEGORY_CARDINALITY,
        top_categories: ranked
            .iter()
            .take(TOP_CATEGORIES)
            .map(|(v, n)| (v.to_string(), *n))
            .collect(),
    }
}

fn correlation_summary(dataset: &Dataset, numerical: &[String]) -> Option<CorrelationSummary> {
    if numerical.len() < 2 {
        return None;
    }

    let matrix = correlation_matrix(dataset, numerical);
    let mut summary = CorrelationSummary {
        strong_positive: Vec::new(),
        strong_negative: Vec::new(),
        moderate: Vec::new(),
        max_correlation: 0.0,
        matrix: CorrelationMatrix {
            columns: Vec::new(),
            values: Vec::new(),
        },
    };

    let names = &matrix.columns;
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            let Some(r) = matrix.values[i][j] else { continue };
            summary.max_correlation = summary.max_correlation.max(r.abs());

            let pair = |strength| CorrelationPair {
                variable1: names[i].clone(),
                variable2: names[j].clone(),
                correlation: r,
                strength,
            };
            if r >= STRONG_CORRELATION {
                summary.strong_positive.push(pair(CorrelationStrength::Strong));
            } else if r <= -STRONG_CORRELATION {
                summary.strong_negative.push(pair(CorrelationStrength::Strong));
            } else if r.abs() >= MODERATE_CORRELATION {
                summary.moderate.push(pair(CorrelationStrength::Moderate));
            }
        }
    }

    summary.matrix = matrix;
    Some(summary)
}

/// Pairwise-complete Pearson matrix over the named numerical columns.
///
/// Names that are missing or not numerical are skipped.
pub(crate) fn correlation_matrix(dataset: &Dataset, columns: &[String]) -> CorrelationMatrix {
    let series: Vec<(&String, &[Option<f64>])> = columns
        .iter()
        .filter_map(|name| match &dataset.column(name)?.values {
            ColumnValues::Numerical(v) => Some((name, v.as_slice())),
            _ => None,
        })
        .collect();

    let n = series.len();
    let mut values = vec![vec![None; n]; n];
    let mut cache: HashMap<(usize, usize), Option<f64>> = HashMap::new();
    for i in 0..n {
        for j in 0..n {
            if i == j {
                // A column with any spread correlates perfectly with itself.
                values[i][j] = self_correlation(series[i].1);
                continue;
            }
            let (a, b) = (i.min(j), i.max(j));
            values[i][j] = *cache
                .entry((a, b))
                .or_insert_with(|| stats::pearson(series[a].1, series[b].1));
        }
    }

    CorrelationMatrix {
        columns: series.iter().map(|(name, _)| (*name).clone()).collect(),
        values,
    }
}

fn self_correlation(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().filter(|x| !x.is_nan()).collect();
    let first = *present.first()?;
    present.iter().any(|x| *x != first).then_some(1.0)
}

fn hints(patterns: &IndexMap<String, DataPattern>) -> Vec<String> {
    let mut hints = Vec::new();
    for (name, pattern) in patterns {
        match pattern {
            DataPattern::Numerical(p) => match p.distribution_type {
                DistributionType::RightSkewed => hints.push(format!(
                    "Consider a log transformation for '{name}' (right skewed)"
                )),
                DistributionType::HeavyTailed => hints.push(format!(
                    "Use box plots to examine outliers in '{name}' (heavy tails)"
                )),
                _ => {}
            },
            DataPattern::Categorical(p) if p.cardinality > 20 => hints.push(format!(
                "Consider a treemap or top-N filtering for '{name}' ({} categories)",
                p.cardinality
            )),
            _ => {}
        }
    }
    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(columns: Vec<Column>) -> Dataset {
        Dataset::new(columns).unwrap()
    }

    #[test]
    fn test_constant_column_has_no_outliers() {
        let ds = dataset(vec![Column::numerical("flat", vec![Some(5.0); 50])]);
        let profile = CharacteristicsAnalyzer::new().analyze(&ds);
        let p = profile.numerical("flat").unwrap();
        assert_eq!(p.outlier_percentage, 0.0);
        assert!(!p.outlier_percentage.is_nan());
        assert_eq!(p.skewness, Some(0.0));
    }

    #[test]
    fn test_all_missing_is_no_data() {
        let ds = dataset(vec![Column::numerical("empty", vec![None; 4])]);
        let profile = CharacteristicsAnalyzer::new().analyze(&ds);
        assert_eq!(
            profile.numerical("empty").unwrap().distribution_type,
            DistributionType::NoData
        );
        assert_eq!(profile.basic_info.missing_data_percent, 100.0);
    }

    #[test]
    fn test_outliers_are_share_of_rows() {
        let mut values: Vec<Option<f64>> = (1..=19).map(|x| Some(x as f64)).collect();
        values.push(Some(1000.0));
        let ds = dataset(vec![Column::numerical("x", values)]);
        let profile = CharacteristicsAnalyzer::new().analyze(&ds);
        let p = profile.numerical("x").unwrap();
        assert!((p.outlier_percentage - 5.0).abs() < 1e-9);
        assert_eq!(p.distribution_type, DistributionType::RightSkewed);
        assert_eq!(p.data_range, Some((1.0, 1000.0)));
    }

    #[test]
    fn test_categorical_pattern() {
        let ds = dataset(vec![Column::categorical(
            "region",
            vec![Some("n"), Some("n"), Some("s"), Some("e"), None],
        )]);
        let profile = CharacteristicsAnalyzer::new().analyze(&ds);
        let p = profile.categorical("region").unwrap();
        assert_eq!(p.cardinality, 3);
        assert!((p.cardinality_ratio - 0.6).abs() < 1e-9);
        assert!((p.top_category_dominance - 0.4).abs() < 1e-9);
        assert_eq!(p.top_categories[0], ("n".to_string(), 2));
        assert!(!p.has_rare_categories);
    }

    #[test]
    fn test_correlation_buckets() {
        let x: Vec<Option<f64>> = (0..20).map(|i| Some(i as f64)).collect();
        let y: Vec<Option<f64>> = (0..20).map(|i| Some(2.0 * i as f64 + 1.0)).collect();
        let z: Vec<Option<f64>> = (0..20).map(|i| Some(-(i as f64))).collect();
        let flat = vec![Some(3.0); 20];
        let ds = dataset(vec![
            Column::numerical("x", x),
            Column::numerical("y", y),
            Column::numerical("z", z),
            Column::numerical("flat", flat),
        ]);
        let profile = CharacteristicsAnalyzer::new().analyze(&ds);
        let corr = profile.relationships.correlations.as_ref().unwrap();

        assert_eq!(corr.strong_positive.len(), 1);
        assert_eq!(corr.strong_negative.len(), 2);
        assert!(corr.moderate.is_empty());
        assert!((corr.max_correlation - 1.0).abs() < 1e-9);
        assert_eq!(corr.matrix.get("x", "flat"), None);
        assert_eq!(corr.matrix.get("x", "x"), Some(1.0));
        assert!(profile.correlation_between("y", "x").is_some());
    }

    #[test]
    fn test_single_numerical_has_no_correlations() {
        let ds = dataset(vec![
            Column::numerical("x", vec![Some(1.0), Some(2.0)]),
            Column::categorical("c", vec![Some("a"), Some("b")]),
        ]);
        let profile = CharacteristicsAnalyzer::new().analyze(&ds);
        assert!(profile.relationships.correlations.is_none());
        assert_eq!(profile.column_types.categorical, vec!["c"]);
    }

    #[test]
    fn test_hints_flag_high_cardinality() {
        let values: Vec<Option<String>> = (0..30).map(|i| Some(format!("c{i}"))).collect();
        let ds = dataset(vec![Column::categorical("id", values)]);
        let profile = CharacteristicsAnalyzer::new().analyze(&ds);
        assert!(profile.hints.iter().any(|h| h.contains("treemap")));
    }
}
