use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::characteristics::{CharacteristicsProfile, DataPattern, DistributionType};
use crate::recommend::ChartSpecification;
use crate::request::DashboardType;

/// Columns described individually in a [`DataSummary`].
const SUMMARY_COLUMNS: usize = 5;

/// Bullets per category before the summarizer stops listing.
const MAX_LISTED: usize = 3;

/// Completeness-based quality score in `0..=100`.
///
/// Each missing percentage point costs two points.
pub fn quality_score(profile: &CharacteristicsProfile) -> u8 {
    (100.0 - profile.basic_info.missing_data_percent * 2.0)
        .clamp(0.0, 100.0)
        .round() as u8
}

/// Deterministic insight bullets for a dashboard type.
pub fn summarize(
    profile: &CharacteristicsProfile,
    dashboard_type: DashboardType,
    charts: &[ChartSpecification],
) -> Vec<String> {
    let info = &profile.basic_info;
    let completeness = 100.0 - info.missing_data_percent;
    let mut out = vec![
        format!(
            "Dashboard generated for {} records across {} variables",
            info.row_count, info.column_count
        ),
        format!("Analysis type: {}", dashboard_type.title()),
        format!("Data completeness: {completeness:.1}%"),
    ];

    match dashboard_type {
        DashboardType::Executive => {
            out.push(format!(
                "{} numerical metrics available as KPIs",
                profile.column_types.numerical.len()
            ));
            out.push(format!("{} charts prioritized for executive review", charts.len()));
        }
        DashboardType::DataQuality => {
            out.push(format!("Quality score: {}/100", quality_score(profile)));
            out.push(format!(
                "Missing data: {:.1}% of total values",
                info.missing_data_percent
            ));
            out.extend(outlier_notes(profile));
        }
        DashboardType::Exploratory | DashboardType::Correlation => {
            out.extend(correlation_notes(profile));
            out.extend(distribution_notes(profile));
        }
        DashboardType::TimeSeries => {
            match profile.column_types.datetime.first() {
                Some(date) => {
                    if let Some(DataPattern::Datetime(p)) = profile.data_patterns.get(date) {
                        out.push(format!("Time axis '{date}' spans {} days", p.span_days));
                    }
                }
                None => out.push("No date column detected; trends shown by row order".to_string()),
            }
            out.extend(correlation_notes(profile));
        }
    }

    out
}

fn correlation_notes(profile: &CharacteristicsProfile) -> Vec<String> {
    let Some(corr) = &profile.relationships.correlations else {
        return Vec::new();
    };
    corr.strong_positive
        .iter()
        .chain(&corr.strong_negative)
        .take(MAX_LISTED)
        .map(|p| {
            let direction = if p.correlation > 0.0 { "positive" } else { "negative" };
            format!(
                "Strong {direction} correlation between {} and {} ({:.2})",
                p.variable1, p.variable2, p.correlation
            )
        })
        .collect()
}

fn distribution_notes(profile: &CharacteristicsProfile) -> Vec<String> {
    profile
        .data_patterns
        .iter()
        .filter_map(|(name, pattern)| match pattern {
            DataPattern::Numerical(p) => match p.distribution_type {
                DistributionType::RightSkewed => Some(format!("{name} is right skewed")),
                DistributionType::LeftSkewed => Some(format!("{name} is left skewed")),
                DistributionType::HeavyTailed => Some(format!("{name} has heavy tails")),
                _ => None,
            },
            _ => None,
        })
        .take(MAX_LISTED)
        .collect()
}

fn outlier_notes(profile: &CharacteristicsProfile) -> Vec<String> {
    profile
        .data_patterns
        .iter()
        .filter_map(|(name, pattern)| match pattern {
            DataPattern::Numerical(p) if p.outlier_percentage > 5.0 => Some(format!(
                "{name}: {:.1}% of rows are outliers",
                p.outlier_percentage
            )),
            _ => None,
        })
        .take(MAX_LISTED)
        .collect()
}

/// Per-column numeric context for prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericSummary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub distribution: DistributionType,
    pub unique_values: usize,
}

/// Compact description of a dataset used as prompt context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSummary {
    pub total_rows: usize,
    pub total_columns: usize,
    pub numerical_columns: usize,
    pub categorical_columns: usize,
    pub missing_percentage: f64,
    pub numerical_stats: IndexMap<String, NumericSummary>,
    /// Most common value per categorical column.
    pub categorical_stats: IndexMap<String, (usize, Option<String>)>,
}

impl DataSummary {
    pub fn from_profile(profile: &CharacteristicsProfile) -> Self {
        let mut numerical_stats = IndexMap::new();
        let mut categorical_stats = IndexMap::new();
        for (name, pattern) in &profile.data_patterns {
            match pattern {
                DataPattern::Numerical(p) if numerical_stats.len() < SUMMARY_COLUMNS => {
                    numerical_stats.insert(
                        name.clone(),
                        NumericSummary {
                            min: p.data_range.map(|r| r.0),
                            max: p.data_range.map(|r| r.1),
                            distribution: p.distribution_type,
                            unique_values: p.unique_values,
                        },
                    );
                }
                DataPattern::Categorical(p) if categorical_stats.len() < SUMMARY_COLUMNS => {
                    let top = p.top_categories.first().map(|(v, _)| v.clone());
                    categorical_stats.insert(name.clone(), (p.cardinality, top));
                }
                _ => {}
            }
        }

        Self {
            total_rows: profile.basic_info.row_count,
            total_columns: profile.basic_info.column_count,
            numerical_columns: profile.column_types.numerical.len(),
            categorical_columns: profile.column_types.categorical.len(),
            missing_percentage: profile.basic_info.missing_data_percent,
            numerical_stats,
            categorical_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characteristics::CharacteristicsAnalyzer;
    use crate::dataset::{Column, Dataset};

    fn profile() -> CharacteristicsProfile {
        let ds = Dataset::new(vec![
            Column::numerical("a", (0..20).map(|i| Some(i as f64)).collect()),
            Column::numerical("b", (0..20).map(|i| Some(i as f64 * 2.0)).collect()),
            Column::categorical("c", (0..20).map(|i| (i % 4 != 0).then(|| "x")).collect()),
        ])
        .unwrap();
        CharacteristicsAnalyzer::new().analyze(&ds)
    }

    #[test]
    fn test_quality_score() {
        let p = profile();
        // 5 of 60 cells missing.
        assert_eq!(quality_score(&p), 83);
    }

    #[test]
    fn test_exploratory_mentions_correlation() {
        let bullets = summarize(&profile(), DashboardType::Exploratory, &[]);
        assert_eq!(bullets[0], "Dashboard generated for 20 records across 3 variables");
        assert!(bullets.iter().any(|b| b.contains("Strong positive correlation between a and b")));
    }

    #[test]
    fn test_quality_bullets() {
        let bullets = summarize(&profile(), DashboardType::DataQuality, &[]);
        assert!(bullets.iter().any(|b| b.starts_with("Quality score:")));
        assert!(bullets.iter().any(|b| b.starts_with("Missing data: 8.3%")));
    }

    #[test]
    fn test_data_summary() {
        let summary = DataSummary::from_profile(&profile());
        assert_eq!(summary.numerical_columns, 2);
        assert_eq!(summary.categorical_stats["c"], (1, Some("x".to_string())));
    }
}
