//! Statistical profiling of datasets.
//!
//! The analyzer turns a [`Dataset`](crate::dataset::Dataset) into a read-only
//! [`CharacteristicsProfile`]: distribution shape and outliers for numerical
//! columns, cardinality for categorical ones, and pairwise correlations.

mod analyzer;
mod profile;
mod stats;

pub use analyzer::CharacteristicsAnalyzer;
pub(crate) use analyzer::correlation_matrix;
pub use profile::{
    BasicInfo, BooleanPattern, CategoricalPattern, CharacteristicsProfile, ColumnTypes,
    CorrelationMatrix, CorrelationPair, CorrelationStrength, CorrelationSummary, DataPattern,
    DatetimePattern, DistributionType, NumericalPattern, Relationships, MODERATE_CORRELATION,
    STRONG_CORRELATION,
};
pub(crate) use stats::{Moments, quantile, sorted};
