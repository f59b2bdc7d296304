//! Pipeline configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DashforgeError, Result};
use crate::input::ParserConfig;
use crate::recommend::{DEFAULT_MAX_RECOMMENDATIONS, DEFAULT_POINT_LIMIT};

/// Charting library the rendered dashboards load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartLibrary {
    #[default]
    Plotly,
}

impl ChartLibrary {
    /// Identifier that must appear in any artifact using the library.
    pub fn identifier(&self) -> &'static str {
        match self {
            ChartLibrary::Plotly => "plotly",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ChartLibrary::Plotly => "Plotly",
        }
    }

    pub fn cdn_url(&self) -> &'static str {
        match self {
            ChartLibrary::Plotly => "https://cdn.plot.ly/plotly-2.27.0.min.js",
        }
    }

    /// Package name for component artifacts.
    pub fn package(&self) -> &'static str {
        match self {
            ChartLibrary::Plotly => "react-plotly.js",
        }
    }

    /// Call that draws a chart.
    pub fn render_call(&self) -> &'static str {
        match self {
            ChartLibrary::Plotly => "Plotly.newPlot",
        }
    }
}

/// Knobs for a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Cap on ranked chart recommendations.
    pub max_recommendations: usize,
    /// Rows embedded in the data representation handed to renderers.
    pub sample_rows: usize,
    /// Cap on points per scatter-like chart payload.
    pub scatter_point_limit: usize,
    pub chart_library: ChartLibrary,
    /// Ask the provider for a semantic review of the final artifact.
    pub semantic_review: bool,
    pub parser: ParserConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
            sample_rows: 100,
            scatter_point_limit: DEFAULT_POINT_LIMIT,
            chart_library: ChartLibrary::Plotly,
            semantic_review: true,
            parser: ParserConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DashforgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_recommendations == 0 {
            return Err(DashforgeError::Config(
                "max_recommendations must be at least 1".to_string(),
            ));
        }
        if self.scatter_point_limit == 0 {
            return Err(DashforgeError::Config(
                "scatter_point_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
