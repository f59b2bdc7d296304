//! Grid layouts per dashboard type.

use serde::{Deserialize, Serialize};

use crate::request::DashboardType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Kpi,
    PrimaryChart,
    SecondaryChart,
    Insights,
    QualityScore,
    MissingData,
    Outliers,
    Recommendations,
    Overview,
    Correlation,
    Distribution,
    DetailedAnalysis,
    Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Span {
    FullWidth,
    TwoThirds,
    Half,
    OneThird,
}

impl Span {
    /// Grid columns covered in a grid of `columns` tracks.
    pub fn tracks(&self, columns: u8) -> u8 {
        let columns = columns.max(1);
        match self {
            Span::FullWidth => columns,
            Span::TwoThirds => (columns * 2 / 3).max(1),
            Span::Half => (columns / 2).max(1),
            Span::OneThird => (columns / 3).max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Height {
    Small,
    Medium,
    Large,
}

impl Height {
    pub fn pixels(&self) -> u32 {
        match self {
            Height::Small => 160,
            Height::Medium => 360,
            Height::Large => 480,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSection {
    pub kind: SectionKind,
    pub span: Span,
    pub height: Height,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spacing {
    Compact,
    Normal,
    Spacious,
}

impl Spacing {
    pub fn gap_px(&self) -> u32 {
        match self {
            Spacing::Compact => 12,
            Spacing::Normal => 20,
            Spacing::Spacious => 28,
        }
    }
}

/// Colour palette names understood by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    Executive,
    Quality,
    Analytical,
}

impl ColorScheme {
    /// Primary and accent colours.
    pub fn colors(&self) -> (&'static str, &'static str) {
        match self {
            ColorScheme::Executive => ("#1f3a5f", "#f4a261"),
            ColorScheme::Quality => ("#2a9d8f", "#e76f51"),
            ColorScheme::Analytical => ("#264653", "#8ab17d"),
        }
    }
}

/// Grid description for a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub grid_columns: u8,
    pub sections: Vec<LayoutSection>,
    pub color_scheme: ColorScheme,
    pub spacing: Spacing,
}

impl LayoutConfig {
    /// Layout for a dashboard type.
    pub fn for_dashboard(dashboard_type: DashboardType) -> Self {
        let section = |kind, span, height| LayoutSection { kind, span, height };

        match dashboard_type {
            DashboardType::Executive => Self {
                grid_columns: 3,
                sections: vec![
                    section(SectionKind::Kpi, Span::FullWidth, Height::Small),
                    section(SectionKind::PrimaryChart, Span::TwoThirds, Height::Medium),
                    section(SectionKind::SecondaryChart, Span::OneThird, Height::Medium),
                    section(SectionKind::Insights, Span::FullWidth, Height::Small),
                ],
                color_scheme: ColorScheme::Executive,
                spacing: Spacing::Compact,
            },
            DashboardType::DataQuality => Self {
                grid_columns: 2,
                sections: vec![
                    section(SectionKind::QualityScore, Span::FullWidth, Height::Small),
                    section(SectionKind::MissingData, Span::Half, Height::Large),
                    section(SectionKind::Outliers, Span::Half, Height::Large),
                    section(SectionKind::Recommendations, Span::FullWidth, Height::Medium),
                ],
                color_scheme: ColorScheme::Quality,
                spacing: Spacing::Normal,
            },
            DashboardType::TimeSeries => Self {
                grid_columns: 2,
                sections: vec![
                    section(SectionKind::Overview, Span::FullWidth, Height::Small),
                    section(SectionKind::Trend, Span::FullWidth, Height::Large),
                    section(SectionKind::Distribution, Span::Half, Height::Medium),
                    section(SectionKind::Insights, Span::Half, Height::Medium),
                ],
                color_scheme: ColorScheme::Analytical,
                spacing: Spacing::Normal,
            },
            DashboardType::Exploratory | DashboardType::Correlation => Self {
                grid_columns: 2,
                sections: vec![
                    section(SectionKind::Overview, Span::FullWidth, Height::Small),
                    section(SectionKind::Correlation, Span::Half, Height::Large),
                    section(SectionKind::Distribution, Span::Half, Height::Large),
                    section(SectionKind::DetailedAnalysis, Span::FullWidth, Height::Large),
                ],
                color_scheme: ColorScheme::Analytical,
                spacing: Spacing::Spacious,
            },
        }
    }

    /// Height used for chart cards.
    pub fn chart_height(&self) -> u32 {
        self.sections
            .iter()
            .filter(|s| {
                !matches!(
                    s.kind,
                    SectionKind::Kpi
                        | SectionKind::Insights
                        | SectionKind::Overview
                        | SectionKind::QualityScore
                )
            })
            .map(|s| s.height.pixels())
            .max()
            .unwrap_or(Height::Medium.pixels())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::for_dashboard(DashboardType::default())
    }
}
