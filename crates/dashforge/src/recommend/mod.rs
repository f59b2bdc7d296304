//! Chart recommendation and materialization.
//!
//! [`RecommendationEngine`] reads a [`CharacteristicsProfile`](crate::CharacteristicsProfile)
//! and proposes charts; [`ChartMaterializer`] binds the chosen charts to the
//! dataset by computing their data payloads.

mod audience;
mod chart;
mod data;
mod engine;
mod materialize;

pub use audience::{Audience, AudiencePreferences, ChartPurpose};
pub use chart::{
    container_id, AnalysisPurpose, ChartConfig, ChartSpecification, ChartType, Orientation,
    Priority,
};
pub use data::{BoxSummary, ChartData, GroupSummary, HistogramBin, Series, Trendline};
pub use engine::{
    filter_by_audience, rank, ranking_score, RecommendationEngine, DEFAULT_MAX_RECOMMENDATIONS,
};
pub use materialize::{ChartMaterializer, Materialized, DEFAULT_POINT_LIMIT};
