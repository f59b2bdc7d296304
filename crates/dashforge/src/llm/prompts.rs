//! Prompt templates for LLM interactions.

use crate::insights::DataSummary;
use crate::request::GenerationRequest;
use crate::synthesis::{Artifact, ArtifactKind, SynthesisInput};

/// Characters of artifact code included in a review prompt.
const REVIEW_CODE_CHARS: usize = 12_000;

/// Build the prompt asking for a complete dashboard artifact.
pub fn artifact_prompt(input: &SynthesisInput<'_>) -> String {
    let request = input.request;

    let context = if request.user_context.trim().is_empty() {
        String::new()
    } else {
        format!("\nBusiness context: {}", request.user_context.trim())
    };

    let columns: Vec<String> = input
        .data
        .columns
        .iter()
        .map(|c| format!("- {} ({}, {} missing)", c.name, c.kind, c.missing))
        .collect();

    let sections: Vec<String> = input
        .layout
        .sections
        .iter()
        .map(|s| format!("- {:?}: {:?}, {}px tall", s.kind, s.span, s.height.pixels()))
        .collect();

    let charts: Vec<String> = input
        .charts
        .iter()
        .enumerate()
        .map(|(i, chart)| {
            format!(
                "{}. {} of [{}] in element id=\"{}\" ({:?} priority). {}",
                i + 1,
                chart.chart_type.display_name(),
                chart.columns.join(", "),
                chart.container_id().unwrap_or_default(),
                chart.priority,
                chart.reasoning
            )
        })
        .collect();

    let insights = if input.insights.is_empty() {
        String::new()
    } else {
        let bullets: Vec<String> = input.insights.iter().map(|i| format!("- {i}")).collect();
        format!("\n## Insights to display\n{}\n", bullets.join("\n"))
    };

    let records = serde_json::to_string(&input.data.records).unwrap_or_else(|_| "[]".to_string());

    let kind = match request.preferred_artifact {
        ArtifactKind::Document => "a complete HTML5 document",
        ArtifactKind::Component => "a React component with a default export",
    };

    format!(
        r#"Build an interactive {dashboard} dashboard titled "{title}".{context}
Audience: {audience}. Purpose: {purpose}.

## Dataset
{rows} rows, {cols} columns, {missing:.1}% missing values.
{columns}

## Layout
{grid}-column grid, {scheme:?} colour scheme, {gap}px gaps.
{sections}

## Charts
{charts}
{insights}
## Requirements
- Use {library} loaded from {cdn} (package `{package}` for components).
- Render every chart into the element id listed above.
- Embed the data as `const DASHBOARD_DATA = ...`; sample records follow.
- Include responsive styles and chart interactions.

Sample records:
{records}

Respond with JSON only, no prose:
{{"kind": "{artifact}", "code": "<{kind}>"}}"#,
        dashboard = request.dashboard_type.title(),
        title = input.title,
        audience = request.target_audience,
        purpose = request.chart_purpose,
        rows = input.summary.total_rows,
        cols = input.summary.total_columns,
        missing = input.summary.missing_percentage,
        columns = columns.join("\n"),
        grid = input.layout.grid_columns,
        scheme = input.layout.color_scheme,
        gap = input.layout.spacing.gap_px(),
        sections = sections.join("\n"),
        charts = charts.join("\n"),
        library = input.library.display_name(),
        cdn = input.library.cdn_url(),
        package = input.library.package(),
        artifact = request.preferred_artifact.as_str(),
    )
}

/// Build the prompt asking for a semantic review of an artifact.
pub fn review_prompt(artifact: &Artifact, chart_ids: &[String]) -> String {
    let code: String = artifact.code.chars().take(REVIEW_CODE_CHARS).collect();
    format!(
        r#"Review this dashboard {} for correctness and usability.

Expected chart containers: {}

```
{}
```

Respond with JSON only:
{{
  "score": 0-100,
  "issues": ["specific problem", ...],
  "strengths": ["specific strength", ...]
}}"#,
        artifact.kind.as_str(),
        chart_ids.join(", "),
        code
    )
}

/// Build the prompt asking for extra insight bullets.
pub fn insights_prompt(summary: &DataSummary, request: &GenerationRequest) -> String {
    let stats = serde_json::to_string_pretty(summary).unwrap_or_default();
    let context = if request.user_context.trim().is_empty() {
        "none given"
    } else {
        request.user_context.trim()
    };

    format!(
        r#"Suggest up to 3 short, specific insights for a {} dashboard aimed at {}.

Business context: {}

Dataset summary:
{}

Respond with JSON only:
{{"insights": ["...", "..."]}}"#,
        request.dashboard_type.title(),
        request.target_audience,
        context,
        stats
    )
}

/// System prompt for all Dashforge LLM interactions.
pub fn system_prompt() -> &'static str {
    r#"You are a data visualization engineer for Dashforge, a dashboard generator.

Your role is to:
1. Turn chart specifications into working, self-contained dashboard code
2. Review generated dashboards for structural and usability problems
3. Point out noteworthy patterns in summarized datasets

Guidelines:
- Follow the requested output format exactly
- Never invent columns that are not in the dataset
- Keep element ids exactly as given
- Prefer clarity over decoration
- Always respond with valid JSON when requested"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characteristics::CharacteristicsAnalyzer;
    use crate::dataset::{Column, Dataset};
    use crate::request::DashboardType;

    #[test]
    fn test_insights_prompt_mentions_context() {
        let ds = Dataset::new(vec![Column::numerical("x", vec![Some(1.0), Some(2.0)])]).unwrap();
        let summary = DataSummary::from_profile(&CharacteristicsAnalyzer::new().analyze(&ds));
        let request = GenerationRequest::new(DashboardType::Executive).with_context("Q3 sales review");

        let prompt = insights_prompt(&summary, &request);
        assert!(prompt.contains("Executive dashboard"));
        assert!(prompt.contains("Q3 sales review"));
        assert!(prompt.contains("\"insights\""));
    }

    #[test]
    fn test_artifact_prompt_lists_containers() {
        use crate::config::ChartLibrary;
        use crate::dataset::DataRepresentation;
        use crate::layout::LayoutConfig;
        use crate::recommend::{ChartMaterializer, RecommendationEngine};

        let ds = Dataset::new(vec![
            Column::numerical("price", (0..20).map(|i| Some(i as f64)).collect()),
            Column::numerical("units", (0..20).map(|i| Some(40.0 - i as f64)).collect()),
        ])
        .unwrap();
        let profile = CharacteristicsAnalyzer::new().analyze(&ds);
        let request = GenerationRequest::new(DashboardType::Correlation).with_context("pricing test");
        let specs = RecommendationEngine::new().recommend(
            &profile,
            request.chart_purpose,
            &request.target_audience,
        );
        let charts = ChartMaterializer::default().materialize(&specs, &ds).charts;
        let summary = DataSummary::from_profile(&profile);
        let data = DataRepresentation::from_dataset(&ds, 5);
        let layout = LayoutConfig::for_dashboard(request.dashboard_type);
        let insights = vec!["Units fall as price rises".to_string()];
        let input = SynthesisInput {
            title: "Pricing",
            request: &request,
            summary: &summary,
            data: &data,
            layout: &layout,
            charts: &charts,
            insights: &insights,
            library: ChartLibrary::Plotly,
        };

        let prompt = artifact_prompt(&input);
        assert!(prompt.contains("titled \"Pricing\""));
        assert!(prompt.contains("Business context: pricing test"));
        assert!(prompt.contains("- price (numerical, 0 missing)"), "{prompt}");
        assert!(prompt.contains("id=\"chart-chart_1\""));
        assert!(prompt.contains("- Units fall as price rises"));
        assert!(prompt.ends_with("\"code\": \"<a complete HTML5 document>\"}"));
    }

    #[test]
    fn test_review_prompt_truncates_code() {
        let artifact = Artifact::template(ArtifactKind::Document, "x".repeat(REVIEW_CODE_CHARS * 2));
        let prompt = review_prompt(&artifact, &["chart-chart_1".to_string()]);
        assert!(prompt.contains("chart-chart_1"));
        assert!(prompt.len() < REVIEW_CODE_CHARS + 1000);
    }
}
