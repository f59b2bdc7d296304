//! Audience and purpose descriptors that steer recommendations.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::chart::ChartType;
use crate::error::DashforgeError;

/// Who the dashboard is for.
///
/// Unrecognized labels are kept verbatim and disable audience filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Audience {
    Executive,
    #[default]
    Analyst,
    DataScientist,
    BusinessUser,
    Other(String),
}

/// Chart preferences for a known audience.
#[derive(Debug, Clone, Copy)]
pub struct AudiencePreferences {
    /// Promoted to high priority.
    pub preferred: &'static [ChartType],
    /// Dropped from the recommendation list.
    pub avoided: &'static [ChartType],
}

impl AudiencePreferences {
    pub fn prefers(&self, chart: ChartType) -> bool {
        self.preferred.contains(&chart)
    }

    pub fn avoids(&self, chart: ChartType) -> bool {
        self.avoided.contains(&chart)
    }
}

impl Audience {
    pub fn as_str(&self) -> &str {
        match self {
            Audience::Executive => "executive",
            Audience::Analyst => "analyst",
            Audience::DataScientist => "data_scientist",
            Audience::BusinessUser => "business_user",
            Audience::Other(label) => label,
        }
    }

    pub fn preferences(&self) -> Option<AudiencePreferences> {
        use ChartType::*;

        match self {
            Audience::Executive => Some(AudiencePreferences {
                preferred: &[BarChart, PieChart, LineChart],
                avoided: &[ScatterMatrix, ParallelCoordinates, ViolinPlot],
            }),
            Audience::Analyst => Some(AudiencePreferences {
                preferred: &[Histogram, ScatterPlot, BoxPlot, CorrelationHeatmap],
                avoided: &[],
            }),
            Audience::DataScientist => Some(AudiencePreferences {
                preferred: &[ScatterMatrix, ParallelCoordinates, ViolinPlot, CorrelationHeatmap],
                avoided: &[PieChart],
            }),
            Audience::BusinessUser => Some(AudiencePreferences {
                preferred: &[BarChart, LineChart, PieChart],
                avoided: &[ScatterMatrix, ViolinPlot, ParallelCoordinates],
            }),
            Audience::Other(_) => None,
        }
    }
}

impl From<String> for Audience {
    fn from(label: String) -> Self {
        match label.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "executive" => Audience::Executive,
            "analyst" => Audience::Analyst,
            "data_scientist" => Audience::DataScientist,
            "business_user" => Audience::BusinessUser,
            _ => Audience::Other(label),
        }
    }
}

impl From<Audience> for String {
    fn from(audience: Audience) -> Self {
        audience.as_str().to_string()
    }
}

impl FromStr for Audience {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Audience::from(s.to_string()))
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the dashboard is being built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartPurpose {
    #[default]
    Exploration,
    DetailedExploration,
    Executive,
    Presentation,
}

impl ChartPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartPurpose::Exploration => "exploration",
            ChartPurpose::DetailedExploration => "detailed_exploration",
            ChartPurpose::Executive => "executive",
            ChartPurpose::Presentation => "presentation",
        }
    }

    /// Purposes aimed at a non-technical reader.
    pub fn is_presentational(&self) -> bool {
        matches!(self, ChartPurpose::Executive | ChartPurpose::Presentation)
    }
}

impl FromStr for ChartPurpose {
    type Err = DashforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "exploration" => Ok(ChartPurpose::Exploration),
            "detailed_exploration" => Ok(ChartPurpose::DetailedExploration),
            "executive" => Ok(ChartPurpose::Executive),
            "presentation" => Ok(ChartPurpose::Presentation),
            other => Err(DashforgeError::Config(format!("unknown chart purpose '{other}'"))),
        }
    }
}

impl fmt::Display for ChartPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
