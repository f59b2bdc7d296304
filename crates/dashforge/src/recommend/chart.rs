//! Chart vocabulary shared by the recommender, materializer and renderers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::data::ChartData;

/// Every chart kind the pipeline can recommend and render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Histogram,
    BoxPlot,
    ViolinPlot,
    BarChart,
    PieChart,
    Treemap,
    ScatterPlot,
    CorrelationHeatmap,
    GroupedBoxPlot,
    GroupedBarChart,
    LineChart,
    ScatterMatrix,
    ParallelCoordinates,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Histogram => "histogram",
            ChartType::BoxPlot => "box_plot",
            ChartType::ViolinPlot => "violin_plot",
            ChartType::BarChart => "bar_chart",
            ChartType::PieChart => "pie_chart",
            ChartType::Treemap => "treemap",
            ChartType::ScatterPlot => "scatter_plot",
            ChartType::CorrelationHeatmap => "correlation_heatmap",
            ChartType::GroupedBoxPlot => "grouped_box_plot",
            ChartType::GroupedBarChart => "grouped_bar_chart",
            ChartType::LineChart => "line_chart",
            ChartType::ScatterMatrix => "scatter_matrix",
            ChartType::ParallelCoordinates => "parallel_coordinates",
        }
    }

    /// Point-per-row charts that get expensive on large datasets.
    pub fn is_scatter_family(&self) -> bool {
        matches!(self, ChartType::ScatterPlot | ChartType::ScatterMatrix)
    }

    /// Human-readable name used in prompts and captions.
    pub fn display_name(&self) -> &'static str {
        match self {
            ChartType::Histogram => "Histogram",
            ChartType::BoxPlot => "Box plot",
            ChartType::ViolinPlot => "Violin plot",
            ChartType::BarChart => "Bar chart",
            ChartType::PieChart => "Donut chart",
            ChartType::Treemap => "Treemap",
            ChartType::ScatterPlot => "Scatter plot",
            ChartType::CorrelationHeatmap => "Correlation heatmap",
            ChartType::GroupedBoxPlot => "Grouped box plot",
            ChartType::GroupedBarChart => "Grouped bar chart",
            ChartType::LineChart => "Line chart",
            ChartType::ScatterMatrix => "Scatter matrix",
            ChartType::ParallelCoordinates => "Parallel coordinates",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
}

impl Priority {
    /// Base ranking weight.
    pub fn weight(&self) -> i32 {
        match self {
            Priority::High => 10,
            Priority::Medium => 5,
        }
    }
}

/// What a recommended chart is meant to reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPurpose {
    DistributionAnalysis,
    OutlierDetection,
    DetailedDistribution,
    CategoricalDistribution,
    ProportionalAnalysis,
    HierarchicalCategorical,
    CorrelationAnalysis,
    CorrelationOverview,
    CategoricalComparison,
    CategoricalSummary,
    TrendAnalysis,
    MultivariateExploration,
    PatternDetection,
}

impl AnalysisPurpose {
    /// Purposes that earn a ranking bonus.
    pub fn is_core_analysis(&self) -> bool {
        matches!(
            self,
            AnalysisPurpose::DistributionAnalysis | AnalysisPurpose::CorrelationAnalysis
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Rendering hints attached to a recommendation.
///
/// Every field besides the title is optional; renderers ignore hints that do
/// not apply to the chart type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_kde: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_outlier_points: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_box: Option<bool>,
    /// Donut hole ratio for pie charts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hole: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_trendline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
}

impl ChartConfig {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A recommended visualization.
///
/// `id` and `data` stay empty until the chart is materialized against the
/// dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpecification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub chart_type: ChartType,
    pub columns: Vec<String>,
    pub priority: Priority,
    pub purpose: AnalysisPurpose,
    pub reasoning: String,
    pub config: ChartConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ChartData>,
}

impl ChartSpecification {
    pub fn new(
        chart_type: ChartType,
        columns: Vec<String>,
        priority: Priority,
        purpose: AnalysisPurpose,
        reasoning: impl Into<String>,
        config: ChartConfig,
    ) -> Self {
        Self {
            id: None,
            chart_type,
            columns,
            priority,
            purpose,
            reasoning: reasoning.into(),
            config,
            data: None,
        }
    }

    /// DOM container id for a materialized chart.
    pub fn container_id(&self) -> Option<String> {
        self.id.as_deref().map(container_id)
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }
}

/// Container id for a chart id: `chart_1` renders into `chart-chart_1`.
pub fn container_id(chart_id: &str) -> String {
    format!("chart-{chart_id}")
}
