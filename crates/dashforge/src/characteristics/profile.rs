//! The characteristics profile produced by the analyzer.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Coefficient at or beyond which a correlation counts as strong.
pub const STRONG_CORRELATION: f64 = 0.7;

/// Coefficient at or beyond which a correlation counts as moderate.
pub const MODERATE_CORRELATION: f64 = 0.3;

/// Statistical snapshot of a dataset. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacteristicsProfile {
    pub basic_info: BasicInfo,
    pub column_types: ColumnTypes,
    /// Per-column patterns, in dataset column order.
    pub data_patterns: IndexMap<String, DataPattern>,
    pub relationships: Relationships,
    /// Plain-language hints derived from the patterns.
    #[serde(default)]
    pub hints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub row_count: usize,
    pub column_count: usize,
    pub missing_data_percent: f64,
    pub memory_usage_mb: f64,
}

/// Disjoint column name lists by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnTypes {
    pub numerical: Vec<String>,
    pub categorical: Vec<String>,
    pub datetime: Vec<String>,
    pub boolean: Vec<String>,
}

/// Shape classification of a numerical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionType {
    Normal,
    RightSkewed,
    LeftSkewed,
    HeavyTailed,
    LightTailed,
    Irregular,
    NoData,
}

impl DistributionType {
    /// Classify from skewness and kurtosis; undefined moments classify as irregular.
    pub fn classify(skewness: Option<f64>, kurtosis: Option<f64>) -> Self {
        let (Some(skew), Some(kurt)) = (skewness, kurtosis) else {
            return match skewness {
                Some(s) if s > 1.0 => DistributionType::RightSkewed,
                Some(s) if s < -1.0 => DistributionType::LeftSkewed,
                _ => DistributionType::Irregular,
            };
        };

        if skew.abs() < 0.5 && (kurt - 3.0).abs() < 2.0 {
            DistributionType::Normal
        } else if skew > 1.0 {
            DistributionType::RightSkewed
        } else if skew < -1.0 {
            DistributionType::LeftSkewed
        } else if kurt > 5.0 {
            DistributionType::HeavyTailed
        } else if kurt < 1.0 {
            DistributionType::LightTailed
        } else {
            DistributionType::Irregular
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionType::Normal => "normal",
            DistributionType::RightSkewed => "right_skewed",
            DistributionType::LeftSkewed => "left_skewed",
            DistributionType::HeavyTailed => "heavy_tailed",
            DistributionType::LightTailed => "light_tailed",
            DistributionType::Irregular => "irregular",
            DistributionType::NoData => "no_data",
        }
    }
}

/// Pattern summary for one column, keyed by column kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataPattern {
    Numerical(NumericalPattern),
    Categorical(CategoricalPattern),
    Boolean(BooleanPattern),
    Datetime(DatetimePattern),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericalPattern {
    pub distribution_type: DistributionType,
    /// Share of rows outside the 1.5 x IQR fences, in percent.
    pub outlier_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_range: Option<(f64, f64)>,
    /// Coefficient of variation (0 when the mean is 0).
    pub variability: f64,
    pub unique_values: usize,
    pub zero_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skewness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kurtosis: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalPattern {
    pub cardinality: usize,
    /// Unique values over row count.
    pub cardinality_ratio: f64,
    /// Top category's share of all rows.
    pub top_category_dominance: f64,
    pub distribution_evenness: f64,
    pub has_rare_categories: bool,
    /// Most frequent categories with their counts, most frequent first.
    pub top_categories: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanPattern {
    /// Share of present values that are true, in percent.
    pub true_percentage: f64,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatetimePattern {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<NaiveDateTime>,
    pub span_days: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
}

/// A bucketed pair of numerical columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub variable1: String,
    pub variable2: String,
    pub correlation: f64,
    pub strength: CorrelationStrength,
}

impl CorrelationPair {
    pub fn involves(&self, a: &str, b: &str) -> bool {
        (self.variable1 == a && self.variable2 == b) || (self.variable1 == b && self.variable2 == a)
    }
}

/// Square coefficient matrix; `None` where the coefficient is undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values.get(i)?.get(j).copied().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSummary {
    pub strong_positive: Vec<CorrelationPair>,
    pub strong_negative: Vec<CorrelationPair>,
    pub moderate: Vec<CorrelationPair>,
    pub max_correlation: f64,
    pub matrix: CorrelationMatrix,
}

impl CorrelationSummary {
    /// Every bucketed pair, strong ones first.
    pub fn pairs(&self) -> impl Iterator<Item = &CorrelationPair> {
        self.strong_positive
            .iter()
            .chain(&self.strong_negative)
            .chain(&self.moderate)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationships {
    /// Present only when the dataset has at least two numerical columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlations: Option<CorrelationSummary>,
}

impl CharacteristicsProfile {
    pub fn numerical(&self, column: &str) -> Option<&NumericalPattern> {
        match self.data_patterns.get(column)? {
            DataPattern::Numerical(p) => Some(p),
            _ => None,
        }
    }

    pub fn categorical(&self, column: &str) -> Option<&CategoricalPattern> {
        match self.data_patterns.get(column)? {
            DataPattern::Categorical(p) => Some(p),
            _ => None,
        }
    }

    /// Bucketed correlation for a pair, if the pair landed in any bucket.
    pub fn correlation_between(&self, a: &str, b: &str) -> Option<&CorrelationPair> {
        self.relationships
            .correlations
            .as_ref()?
            .pairs()
            .find(|p| p.involves(a, b))
    }

    pub fn row_count(&self) -> usize {
        self.basic_info.row_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(DistributionType::classify(Some(0.1), Some(3.5)), DistributionType::Normal);
        assert_eq!(DistributionType::classify(Some(1.5), Some(0.0)), DistributionType::RightSkewed);
        assert_eq!(DistributionType::classify(Some(-1.5), Some(0.0)), DistributionType::LeftSkewed);
        assert_eq!(DistributionType::classify(Some(0.7), Some(6.0)), DistributionType::HeavyTailed);
        assert_eq!(DistributionType::classify(Some(0.0), Some(-1.2)), DistributionType::LightTailed);
        assert_eq!(DistributionType::classify(Some(0.8), Some(2.0)), DistributionType::Irregular);
        assert_eq!(DistributionType::classify(None, None), DistributionType::Irregular);
    }

    #[test]
    fn test_pair_is_unordered() {
        let pair = CorrelationPair {
            variable1: "a".into(),
            variable2: "b".into(),
            correlation: 0.9,
            strength: CorrelationStrength::Strong,
        };
        assert!(pair.involves("b", "a"));
        assert!(!pair.involves("a", "c"));
    }
}
