//! Rule-based chart recommendation.
//!
//! Candidate generation is declarative: each rule looks at the profile and
//! emits zero or more [`ChartSpecification`]s. Audience filtering and ranking
//! run afterwards, then the list is capped.

use super::audience::{Audience, ChartPurpose};
use super::chart::{
    AnalysisPurpose, ChartConfig, ChartSpecification, ChartType, Orientation, Priority,
};
use crate::characteristics::{CharacteristicsProfile, CorrelationStrength, DistributionType};

/// Default cap on the number of recommendations returned.
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 10;

/// Rows beyond which scatter-family charts are ranked down.
const LARGE_DATASET_ROWS: usize = 10_000;
const LARGE_DATASET_PENALTY: i32 = 3;
const CORE_PURPOSE_BONUS: i32 = 5;

/// Outlier share (percent) above which a box plot is worth showing.
const BOX_PLOT_OUTLIER_PERCENT: f64 = 5.0;

const MIXED_NUMERICAL_LIMIT: usize = 3;
const MIXED_CATEGORICAL_LIMIT: usize = 2;
const GROUPED_BOX_MAX_CARDINALITY: usize = 20;
const GROUPED_BAR_MAX_CARDINALITY: usize = 10;
const PIE_MAX_CARDINALITY: usize = 7;
const SCATTER_MATRIX_MAX_COLUMNS: usize = 5;
const PARALLEL_MAX_COLUMNS: usize = 6;

/// Turns a characteristics profile into a ranked list of chart specifications.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    max_recommendations: usize,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self {
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }

    pub fn with_max_recommendations(max_recommendations: usize) -> Self {
        Self { max_recommendations }
    }

    pub fn max_recommendations(&self) -> usize {
        self.max_recommendations
    }

    /// Filtered, ranked and capped recommendations.
    pub fn recommend(
        &self,
        profile: &CharacteristicsProfile,
        purpose: ChartPurpose,
        audience: &Audience,
    ) -> Vec<ChartSpecification> {
        let candidates = self.generate_candidates(profile, purpose);
        let generated = candidates.len();
        let mut ranked = rank(filter_by_audience(candidates, audience), profile);
        ranked.truncate(self.max_recommendations);

        tracing::debug!(
            generated,
            returned = ranked.len(),
            %purpose,
            %audience,
            "ranked chart recommendations"
        );
        ranked
    }

    /// Every candidate the rules produce, in generation order, before
    /// filtering and capping.
    pub fn generate_candidates(
        &self,
        profile: &CharacteristicsProfile,
        purpose: ChartPurpose,
    ) -> Vec<ChartSpecification> {
        let numerical = &profile.column_types.numerical;
        let categorical = &profile.column_types.categorical;
        let mut out = Vec::new();

        for column in numerical {
            univariate_numerical(column, profile, purpose, &mut out);
        }
        for column in categorical {
            univariate_categorical(column, profile, purpose, &mut out);
        }
        if numerical.len() >= 2 {
            bivariate_numerical(numerical, profile, &mut out);
        }
        if !numerical.is_empty() && !categorical.is_empty() {
            mixed(numerical, categorical, profile, purpose, &mut out);
        }
        if let Some(date) = profile.column_types.datetime.first() {
            temporal(date, numerical, &mut out);
        }
        if numerical.len() > 2 {
            multivariate(numerical, &mut out);
        }
        out
    }
}

/// Drop charts the audience avoids and promote the ones it prefers.
pub fn filter_by_audience(
    candidates: Vec<ChartSpecification>,
    audience: &Audience,
) -> Vec<ChartSpecification> {
    let Some(prefs) = audience.preferences() else {
        return candidates;
    };

    candidates
        .into_iter()
        .filter_map(|mut spec| {
            if prefs.prefers(spec.chart_type) {
                spec.priority = Priority::High;
                Some(spec)
            } else if prefs.avoids(spec.chart_type) {
                None
            } else {
                Some(spec)
            }
        })
        .collect()
}

/// Ranking score for a single recommendation.
pub fn ranking_score(spec: &ChartSpecification, profile: &CharacteristicsProfile) -> i32 {
    let mut score = spec.priority.weight();
    if spec.purpose.is_core_analysis() {
        score += CORE_PURPOSE_BONUS;
    }
    if profile.row_count() > LARGE_DATASET_ROWS && spec.chart_type.is_scatter_family() {
        score -= LARGE_DATASET_PENALTY;
    }
    score
}

/// Sort by descending score; equal scores keep generation order.
pub fn rank(
    mut candidates: Vec<ChartSpecification>,
    profile: &CharacteristicsProfile,
) -> Vec<ChartSpecification> {
    // sort_by_key is stable.
    candidates.sort_by_key(|spec| std::cmp::Reverse(ranking_score(spec, profile)));
    candidates
}

// =============================================================================
// GENERATION RULES
// =============================================================================

fn univariate_numerical(
    column: &str,
    profile: &CharacteristicsProfile,
    purpose: ChartPurpose,
    out: &mut Vec<ChartSpecification>,
) {
    let pattern = profile.numerical(column);
    let is_normal = pattern.is_some_and(|p| p.distribution_type == DistributionType::Normal);
    let outliers = pattern.map(|p| p.outlier_percentage).unwrap_or(0.0);

    out.push(ChartSpecification::new(
        ChartType::Histogram,
        vec![column.to_string()],
        Priority::High,
        AnalysisPurpose::DistributionAnalysis,
        "Essential for understanding the distribution",
        ChartConfig {
            show_kde: Some(is_normal),
            ..ChartConfig::titled(format!("Distribution of {column}"))
        },
    ));

    if outliers > BOX_PLOT_OUTLIER_PERCENT {
        out.push(ChartSpecification::new(
            ChartType::BoxPlot,
            vec![column.to_string()],
            Priority::High,
            AnalysisPurpose::OutlierDetection,
            format!("High outlier percentage ({outliers:.1}%) detected"),
            ChartConfig {
                show_outlier_points: Some(true),
                ..ChartConfig::titled(format!("Box Plot of {column} (Outlier Analysis)"))
            },
        ));
    }

    if purpose == ChartPurpose::DetailedExploration {
        out.push(ChartSpecification::new(
            ChartType::ViolinPlot,
            vec![column.to_string()],
            Priority::Medium,
            AnalysisPurpose::DetailedDistribution,
            "Detailed distribution shape analysis",
            ChartConfig {
                show_box: Some(true),
                ..ChartConfig::titled(format!("Violin Plot of {column}"))
            },
        ));
    }
}

fn univariate_categorical(
    column: &str,
    profile: &CharacteristicsProfile,
    purpose: ChartPurpose,
    out: &mut Vec<ChartSpecification>,
) {
    let cardinality = profile.categorical(column).map(|p| p.cardinality).unwrap_or(0);
    let columns = vec![column.to_string()];

    if cardinality <= 10 {
        out.push(ChartSpecification::new(
            ChartType::BarChart,
            columns.clone(),
            Priority::High,
            AnalysisPurpose::CategoricalDistribution,
            "Optimal for categorical data with low cardinality",
            ChartConfig {
                orientation: Some(Orientation::Vertical),
                ..ChartConfig::titled(format!("Distribution of {column}"))
            },
        ));
        if cardinality <= PIE_MAX_CARDINALITY && purpose.is_presentational() {
            out.push(ChartSpecification::new(
                ChartType::PieChart,
                columns,
                Priority::Medium,
                AnalysisPurpose::ProportionalAnalysis,
                "Shows proportions to a non-technical audience",
                ChartConfig {
                    hole: Some(0.3),
                    ..ChartConfig::titled(format!("Proportion of {column}"))
                },
            ));
        }
    } else if cardinality <= 50 {
        out.push(ChartSpecification::new(
            ChartType::BarChart,
            columns,
            Priority::High,
            AnalysisPurpose::CategoricalDistribution,
            "Horizontal layout keeps many categories readable",
            ChartConfig {
                orientation: Some(Orientation::Horizontal),
                top_n: Some(20),
                ..ChartConfig::titled(format!("Top 20 Categories in {column}"))
            },
        ));
    } else {
        out.push(ChartSpecification::new(
            ChartType::Treemap,
            columns,
            Priority::Medium,
            AnalysisPurpose::HierarchicalCategorical,
            "Treemap handles high cardinality categories efficiently",
            ChartConfig {
                top_n: Some(30),
                ..ChartConfig::titled(format!("Treemap of {column}"))
            },
        ));
    }
}

fn bivariate_numerical(
    columns: &[String],
    profile: &CharacteristicsProfile,
    out: &mut Vec<ChartSpecification>,
) {
    for (i, a) in columns.iter().enumerate() {
        for b in &columns[i + 1..] {
            let corr = profile.correlation_between(a, b);
            let priority = match corr {
                Some(c) if c.strength == CorrelationStrength::Strong => Priority::High,
                _ => Priority::Medium,
            };
            let reasoning = match corr {
                Some(c) => format!(
                    "Correlation analysis between {a} and {b} (correlation: {:.3})",
                    c.correlation
                ),
                None => format!("Correlation analysis between {a} and {b}"),
            };
            out.push(ChartSpecification::new(
                ChartType::ScatterPlot,
                vec![a.clone(), b.clone()],
                priority,
                AnalysisPurpose::CorrelationAnalysis,
                reasoning,
                ChartConfig {
                    add_trendline: Some(corr.is_some()),
                    color_scale: Some("Viridis".to_string()),
                    ..ChartConfig::titled(format!("{a} vs {b}"))
                },
            ));
        }
    }

    out.push(ChartSpecification::new(
        ChartType::CorrelationHeatmap,
        columns.to_vec(),
        Priority::High,
        AnalysisPurpose::CorrelationOverview,
        "Correlation overview across all numerical variables",
        ChartConfig {
            annotate: Some(true),
            color_scale: Some("RdBu".to_string()),
            ..ChartConfig::titled("Correlation Matrix")
        },
    ));
}

fn mixed(
    numerical: &[String],
    categorical: &[String],
    profile: &CharacteristicsProfile,
    purpose: ChartPurpose,
    out: &mut Vec<ChartSpecification>,
) {
    let cardinality = |c: &str| profile.categorical(c).map(|p| p.cardinality).unwrap_or(0);

    for num in numerical.iter().take(MIXED_NUMERICAL_LIMIT) {
        for cat in categorical.iter().take(MIXED_CATEGORICAL_LIMIT) {
            if cardinality(cat) > GROUPED_BOX_MAX_CARDINALITY {
                continue;
            }
            out.push(ChartSpecification::new(
                ChartType::GroupedBoxPlot,
                vec![num.clone(), cat.clone()],
                Priority::High,
                AnalysisPurpose::CategoricalComparison,
                format!("Compare {num} distribution across {cat} categories"),
                ChartConfig {
                    group_by: Some(cat.clone()),
                    ..ChartConfig::titled(format!("{num} by {cat}"))
                },
            ));
        }
    }

    if purpose.is_presentational() {
        for cat in categorical.iter().take(MIXED_CATEGORICAL_LIMIT) {
            if cardinality(cat) > GROUPED_BAR_MAX_CARDINALITY {
                continue;
            }
            let mut columns = vec![cat.clone()];
            columns.extend(numerical.iter().take(2).cloned());
            out.push(ChartSpecification::new(
                ChartType::GroupedBarChart,
                columns,
                Priority::Medium,
                AnalysisPurpose::CategoricalSummary,
                "Executive-friendly categorical summary",
                ChartConfig {
                    group_by: Some(cat.clone()),
                    ..ChartConfig::titled(format!("Summary by {cat}"))
                },
            ));
        }
    }
}

fn temporal(date: &str, numerical: &[String], out: &mut Vec<ChartSpecification>) {
    if numerical.is_empty() {
        return;
    }
    let mut columns = vec![date.to_string()];
    columns.extend(numerical.iter().take(2).cloned());
    let title = format!("{} over time", numerical[0]);
    out.push(ChartSpecification::new(
        ChartType::LineChart,
        columns,
        Priority::High,
        AnalysisPurpose::TrendAnalysis,
        format!("Trend of key metrics along {date}"),
        ChartConfig::titled(title),
    ));
}

fn multivariate(columns: &[String], out: &mut Vec<ChartSpecification>) {
    if columns.len() <= SCATTER_MATRIX_MAX_COLUMNS {
        out.push(ChartSpecification::new(
            ChartType::ScatterMatrix,
            columns.to_vec(),
            Priority::Medium,
            AnalysisPurpose::MultivariateExploration,
            "Pairwise relationship analysis",
            ChartConfig::titled("Scatter Plot Matrix"),
        ));
    }
    out.push(ChartSpecification::new(
        ChartType::ParallelCoordinates,
        columns.iter().take(PARALLEL_MAX_COLUMNS).cloned().collect(),
        Priority::Medium,
        AnalysisPurpose::PatternDetection,
        "Pattern detection across multiple dimensions",
        ChartConfig::titled("Parallel Coordinates Plot"),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characteristics::CharacteristicsAnalyzer;
    use crate::dataset::{Column, Dataset};

    fn profile(columns: Vec<Column>) -> CharacteristicsProfile {
        CharacteristicsAnalyzer::new().analyze(&Dataset::new(columns).unwrap())
    }

    fn numbers(n: usize, f: impl Fn(usize) -> f64) -> Vec<Option<f64>> {
        (0..n).map(|i| Some(f(i))).collect()
    }

    fn count(specs: &[ChartSpecification], chart: ChartType) -> usize {
        specs.iter().filter(|s| s.chart_type == chart).count()
    }

    #[test]
    fn test_every_numerical_gets_histogram() {
        let p = profile(vec![
            Column::numerical("a", numbers(30, |i| i as f64)),
            Column::numerical("b", numbers(30, |i| (i * i) as f64)),
        ]);
        let specs = RecommendationEngine::new().generate_candidates(&p, ChartPurpose::Exploration);
        assert_eq!(count(&specs, ChartType::Histogram), 2);
        assert_eq!(count(&specs, ChartType::ScatterPlot), 1);
        assert_eq!(count(&specs, ChartType::CorrelationHeatmap), 1);
        assert_eq!(count(&specs, ChartType::ScatterMatrix), 0);
    }

    #[test]
    fn test_strong_correlation_scatter_is_high_priority() {
        let p = profile(vec![
            Column::numerical("a", numbers(30, |i| i as f64)),
            Column::numerical("b", numbers(30, |i| 3.0 * i as f64)),
        ]);
        let specs = RecommendationEngine::new().generate_candidates(&p, ChartPurpose::Exploration);
        let scatter = specs.iter().find(|s| s.chart_type == ChartType::ScatterPlot).unwrap();
        assert_eq!(scatter.priority, Priority::High);
        assert_eq!(scatter.config.add_trendline, Some(true));
        assert!(scatter.reasoning.contains("1.000"));
    }

    #[test]
    fn test_violin_only_for_detailed_exploration() {
        let p = profile(vec![Column::numerical("a", numbers(10, |i| i as f64))]);
        let engine = RecommendationEngine::new();
        let plain = engine.generate_candidates(&p, ChartPurpose::Exploration);
        let detailed = engine.generate_candidates(&p, ChartPurpose::DetailedExploration);
        assert_eq!(count(&plain, ChartType::ViolinPlot), 0);
        assert_eq!(count(&detailed, ChartType::ViolinPlot), 1);
    }

    #[test]
    fn test_categorical_chart_by_cardinality() {
        let labels = |n: usize, k: usize| -> Vec<Option<String>> {
            (0..n).map(|i| Some(format!("v{}", i % k))).collect()
        };
        let p = profile(vec![
            Column::categorical("few", labels(120, 4)),
            Column::categorical("some", labels(120, 30)),
            Column::categorical("many", labels(120, 60)),
        ]);
        let specs = RecommendationEngine::new().generate_candidates(&p, ChartPurpose::Executive);
        let for_col = |c: &str| -> Vec<ChartType> {
            specs
                .iter()
                .filter(|s| s.columns == [c.to_string()])
                .map(|s| s.chart_type)
                .collect()
        };
        assert_eq!(for_col("few"), vec![ChartType::BarChart, ChartType::PieChart]);
        assert_eq!(for_col("some"), vec![ChartType::BarChart]);
        assert_eq!(for_col("many"), vec![ChartType::Treemap]);
        let some_bar = specs.iter().find(|s| s.columns == ["some".to_string()]).unwrap();
        assert_eq!(some_bar.config.top_n, Some(20));
    }

    #[test]
    fn test_audience_filter_drops_avoided_and_promotes_preferred() {
        let p = profile(vec![
            Column::numerical("a", numbers(30, |i| i as f64)),
            Column::numerical("b", numbers(30, |i| ((i * 7) % 11) as f64)),
            Column::numerical("c", numbers(30, |i| ((i * 3) % 5) as f64)),
        ]);
        let engine = RecommendationEngine::with_max_recommendations(100);
        let specs = engine.recommend(&p, ChartPurpose::Exploration, &Audience::Executive);
        assert_eq!(count(&specs, ChartType::ScatterMatrix), 0);
        assert_eq!(count(&specs, ChartType::ParallelCoordinates), 0);

        let specs = engine.recommend(&p, ChartPurpose::Exploration, &Audience::DataScientist);
        let matrix = specs.iter().find(|s| s.chart_type == ChartType::ScatterMatrix).unwrap();
        assert_eq!(matrix.priority, Priority::High);
    }

    #[test]
    fn test_ranking_is_stable_and_capped() {
        let cols: Vec<Column> = (0..6)
            .map(|k| Column::numerical(format!("n{k}"), numbers(40, move |i| ((i * (k + 2)) % 13) as f64)))
            .collect();
        let p = profile(cols);
        let engine = RecommendationEngine::new();
        let first = engine.recommend(&p, ChartPurpose::Exploration, &Audience::Analyst);
        let second = engine.recommend(&p, ChartPurpose::Exploration, &Audience::Analyst);
        assert_eq!(first, second);
        assert_eq!(first.len(), DEFAULT_MAX_RECOMMENDATIONS);

        let scores: Vec<i32> = first.iter().map(|s| ranking_score(s, &p)).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        // Histograms come first and keep column order.
        assert_eq!(first[0].columns, vec!["n0"]);
        assert_eq!(first[1].columns, vec!["n1"]);
    }

    #[test]
    fn test_large_dataset_penalizes_scatter() {
        let p = profile(vec![
            Column::numerical("a", numbers(10_001, |i| i as f64)),
            Column::numerical("b", numbers(10_001, |i| (i % 97) as f64)),
        ]);
        let specs = RecommendationEngine::new().generate_candidates(&p, ChartPurpose::Exploration);
        let scatter = specs.iter().find(|s| s.chart_type == ChartType::ScatterPlot).unwrap();
        let hist = specs.iter().find(|s| s.chart_type == ChartType::Histogram).unwrap();
        assert_eq!(ranking_score(hist, &p), 15);
        assert_eq!(ranking_score(scatter, &p), scatter.priority.weight() + 5 - 3);
    }

    #[test]
    fn test_line_chart_for_datetime() {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let dates = (0..5).map(|d| Some(start + chrono::Duration::days(d))).collect();
        let p = profile(vec![
            Column::datetime("day", dates),
            Column::numerical("sales", numbers(5, |i| i as f64)),
        ]);
        let specs = RecommendationEngine::new().generate_candidates(&p, ChartPurpose::Exploration);
        let line = specs.iter().find(|s| s.chart_type == ChartType::LineChart).unwrap();
        assert_eq!(line.columns, vec!["day", "sales"]);
    }

    #[test]
    fn test_box_plot_needs_more_than_five_percent_outliers() {
        let with_outlier = |n: usize| -> Vec<Option<f64>> {
            let mut values = numbers(n, |i| (i + 1) as f64);
            values.push(Some(1000.0));
            values
        };
        let engine = RecommendationEngine::new();

        // 1 outlier in 20 rows is exactly 5%.
        let p = profile(vec![Column::numerical("x", with_outlier(19))]);
        let specs = engine.generate_candidates(&p, ChartPurpose::Exploration);
        assert_eq!(count(&specs, ChartType::BoxPlot), 0);

        // 1 outlier in 19 rows.
        let p = profile(vec![Column::numerical("x", with_outlier(18))]);
        let specs = engine.generate_candidates(&p, ChartPurpose::Exploration);
        let boxes: Vec<_> = specs.iter().filter(|s| s.chart_type == ChartType::BoxPlot).collect();
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].priority, Priority::High);
        assert_eq!(boxes[0].config.show_outlier_points, Some(true));
    }

    #[test]
    fn test_pie_limited_by_cardinality_and_purpose() {
        let labels = |k: usize| -> Vec<Option<String>> {
            (0..40).map(|i| Some(format!("v{}", i % k))).collect()
        };
        let p = profile(vec![
            Column::categorical("seven", labels(7)),
            Column::categorical("eight", labels(8)),
        ]);
        let engine = RecommendationEngine::new();
        let pies = |purpose: ChartPurpose| -> Vec<Vec<String>> {
            engine
                .generate_candidates(&p, purpose)
                .into_iter()
                .filter(|s| s.chart_type == ChartType::PieChart)
                .map(|s| s.columns)
                .collect()
        };

        assert_eq!(pies(ChartPurpose::Presentation), vec![vec!["seven".to_string()]]);
        assert_eq!(pies(ChartPurpose::Executive), vec![vec!["seven".to_string()]]);
        assert!(pies(ChartPurpose::Exploration).is_empty());
        assert!(pies(ChartPurpose::DetailedExploration).is_empty());
    }

    #[test]
    fn test_grouped_box_plots_are_bounded() {
        let labels = |k: usize| -> Vec<Option<String>> {
            (0..50).map(|i| Some(format!("g{}", i % k))).collect()
        };
        let mut cols: Vec<Column> = (0..4)
            .map(|k| Column::numerical(format!("n{k}"), numbers(50, move |i| ((i * (k + 3)) % 17) as f64)))
            .collect();
        cols.push(Column::categorical("c0", labels(25)));
        cols.push(Column::categorical("c1", labels(3)));
        cols.push(Column::categorical("c2", labels(3)));
        let p = profile(cols);

        let specs = RecommendationEngine::new().generate_candidates(&p, ChartPurpose::Exploration);
        let grouped: Vec<Vec<String>> = specs
            .iter()
            .filter(|s| s.chart_type == ChartType::GroupedBoxPlot)
            .map(|s| s.columns.clone())
            .collect();
        // c0 exceeds the cardinality bound and c2 is past the first two categoricals.
        assert_eq!(
            grouped,
            vec![
                vec!["n0".to_string(), "c1".to_string()],
                vec!["n1".to_string(), "c1".to_string()],
                vec!["n2".to_string(), "c1".to_string()],
            ]
        );
    }

    #[test]
    fn test_multivariate_column_bounds() {
        let engine = RecommendationEngine::new();
        let candidates = |n: usize| {
            let cols: Vec<Column> = (0..n)
                .map(|k| Column::numerical(format!("n{k}"), numbers(30, move |i| ((i * (k + 2)) % 11) as f64)))
                .collect();
            engine.generate_candidates(&profile(cols), ChartPurpose::Exploration)
        };

        assert_eq!(count(&candidates(2), ChartType::ScatterMatrix), 0);
        assert_eq!(count(&candidates(2), ChartType::ParallelCoordinates), 0);
        assert_eq!(count(&candidates(3), ChartType::ScatterMatrix), 1);
        assert_eq!(count(&candidates(5), ChartType::ScatterMatrix), 1);
        assert_eq!(count(&candidates(6), ChartType::ScatterMatrix), 0);

        let seven = candidates(7);
        assert_eq!(count(&seven, ChartType::ScatterMatrix), 0);
        let parallel: Vec<_> = seven
            .iter()
            .filter(|s| s.chart_type == ChartType::ParallelCoordinates)
            .collect();
        assert_eq!(parallel.len(), 1);
        assert_eq!(parallel[0].columns.len(), PARALLEL_MAX_COLUMNS);
        assert_eq!(parallel[0].columns[0], "n0");
    }

    #[test]
    fn test_moderate_correlation_scatter_is_medium_priority() {
        // r is about 0.667
        let p = profile(vec![
            Column::numerical("a", numbers(30, |i| i as f64)),
            Column::numerical("b", numbers(30, |i| ((i * 7) % 11) as f64 + i as f64 * 0.3)),
        ]);
        let specs = RecommendationEngine::new().generate_candidates(&p, ChartPurpose::Exploration);
        let scatter = specs.iter().find(|s| s.chart_type == ChartType::ScatterPlot).unwrap();
        assert_eq!(scatter.priority, Priority::Medium);
        assert_eq!(scatter.config.add_trendline, Some(true));
        assert!(scatter.reasoning.contains("0.667"), "{}", scatter.reasoning);
    }
}
