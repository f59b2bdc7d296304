//! What the caller asks the pipeline to build.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashforgeError;
use crate::recommend::{Audience, ChartPurpose, DEFAULT_MAX_RECOMMENDATIONS};
use crate::synthesis::ArtifactKind;

/// Dashboard flavours; each selects a layout and insight style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardType {
    Executive,
    DataQuality,
    #[default]
    Exploratory,
    TimeSeries,
    Correlation,
}

impl DashboardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardType::Executive => "executive",
            DashboardType::DataQuality => "data_quality",
            DashboardType::Exploratory => "exploratory",
            DashboardType::TimeSeries => "time_series",
            DashboardType::Correlation => "correlation",
        }
    }

    /// Title-cased label, e.g. "Data Quality".
    pub fn title(&self) -> &'static str {
        match self {
            DashboardType::Executive => "Executive",
            DashboardType::DataQuality => "Data Quality",
            DashboardType::Exploratory => "Exploratory",
            DashboardType::TimeSeries => "Time Series",
            DashboardType::Correlation => "Correlation",
        }
    }
}

impl fmt::Display for DashboardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DashboardType {
    type Err = DashforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "executive" => Ok(DashboardType::Executive),
            "data_quality" | "quality" => Ok(DashboardType::DataQuality),
            "exploratory" => Ok(DashboardType::Exploratory),
            "time_series" => Ok(DashboardType::TimeSeries),
            "correlation" => Ok(DashboardType::Correlation),
            other => Err(DashforgeError::Config(format!("unknown dashboard type '{other}'"))),
        }
    }
}

/// Request descriptor for one dashboard generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    pub dashboard_type: DashboardType,
    /// Free-form business context passed to the code-generation capability.
    pub user_context: String,
    pub target_audience: Audience,
    pub chart_purpose: ChartPurpose,
    /// Upper bound on charts in the final dashboard.
    pub max_charts: usize,
    /// Artifact kind requested from the code-generation capability.
    pub preferred_artifact: ArtifactKind,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            dashboard_type: DashboardType::default(),
            user_context: String::new(),
            target_audience: Audience::default(),
            chart_purpose: ChartPurpose::default(),
            max_charts: DEFAULT_MAX_RECOMMENDATIONS,
            preferred_artifact: ArtifactKind::Document,
        }
    }
}

impl GenerationRequest {
    pub fn new(dashboard_type: DashboardType) -> Self {
        Self {
            dashboard_type,
            ..Self::default()
        }
    }

    pub fn with_audience(mut self, audience: Audience) -> Self {
        self.target_audience = audience;
        self
    }

    pub fn with_purpose(mut self, purpose: ChartPurpose) -> Self {
        self.chart_purpose = purpose;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.user_context = context.into();
        self
    }

    pub fn with_max_charts(mut self, max_charts: usize) -> Self {
        self.max_charts = max_charts;
        self
    }

    pub fn with_artifact(mut self, kind: ArtifactKind) -> Self {
        self.preferred_artifact = kind;
        self
    }
}
