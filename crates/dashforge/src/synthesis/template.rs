//! Deterministic dashboard renderer.
//!
//! Produces a standalone HTML document from the same inputs the provider
//! receives. The output always carries the root, body, library and per-chart
//! container markers the verifier treats as critical, so it is the fallback
//! whenever synthesis is unavailable or rejected.

use std::fmt::{self, Write};

use serde::Serialize;
use serde_json::{Value, json};

use super::artifact::{Artifact, ArtifactKind, SynthesisInput};
use crate::error::Result;
use crate::layout::{LayoutConfig, LayoutSection, SectionKind};
use crate::recommend::{BoxSummary, ChartData, ChartSpecification, ChartType, Orientation};

/// Above this many points scatter traces switch to WebGL.
const WEBGL_THRESHOLD: usize = 1000;

/// Client-side wiring shared by every rendered document.
const RUNTIME_SCRIPT: &str = r#"
const PLOT_CONFIG = { responsive: true, displaylogo: false };

function describePoint(chart, point) {
  const x = point.label !== undefined ? point.label : point.x;
  const y = point.value !== undefined ? point.value : point.y;
  return chart.title + ': ' + x + (y !== undefined ? ' / ' + y : '');
}

CHARTS.forEach(function (chart) {
  const el = document.getElementById(chart.container);
  if (!el) { return; }
  Plotly.newPlot(el, chart.traces, chart.layout, PLOT_CONFIG);
  el.on('plotly_click', function (event) {
    const point = event.points && event.points[0];
    if (point) {
      document.getElementById('selection').textContent = describePoint(chart, point);
    }
  });
});

window.addEventListener('resize', function () {
  CHARTS.forEach(function (chart) {
    const el = document.getElementById(chart.container);
    if (el) { Plotly.Plots.resize(el); }
  });
});
"#;

/// One chart as the client script consumes it.
#[derive(Debug, Serialize)]
struct ClientChart {
    container: String,
    title: String,
    traces: Vec<Value>,
    layout: Value,
}

/// Render `input` as a standalone HTML document.
pub fn render(input: &SynthesisInput<'_>) -> Result<Artifact> {
    let (primary, accent) = input.layout.color_scheme.colors();
    let chart_sections = chart_sections(input.layout);

    let client_charts: Vec<ClientChart> = input
        .charts
        .iter()
        .filter_map(|chart| {
            let container = chart.container_id()?;
            let height = section_for(&chart_sections, chart_index(chart))
                .map(|s| s.height.pixels())
                .unwrap_or_else(|| input.layout.chart_height());
            let (traces, layout) = match &chart.data {
                Some(data) => plot(chart, data, height, primary, accent),
                None => (Vec::new(), base_layout(chart.title(), height)),
            };
            Some(ClientChart {
                container,
                title: chart.title().to_string(),
                traces,
                layout,
            })
        })
        .collect();

    let mut html = String::with_capacity(16 * 1024);
    let title = Escaped(input.title);

    write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <script src=\"{cdn}\"></script>\n\
         <style>\n{css}</style>\n</head>\n<body>\n",
        cdn = input.library.cdn_url(),
        css = stylesheet(input.layout, primary, accent),
    )?;

    // Header and KPI strip
    let summary = input.summary;
    write!(
        html,
        "<header class=\"dashboard-header\">\n<h1>{title}</h1>\n\
         <p class=\"subtitle\">{} analysis</p>\n</header>\n\
         <section class=\"kpis\">\n\
         <div class=\"kpi\"><span class=\"kpi-value\">{}</span><span class=\"kpi-label\">Records</span></div>\n\
         <div class=\"kpi\"><span class=\"kpi-value\">{}</span><span class=\"kpi-label\">Variables</span></div>\n\
         <div class=\"kpi\"><span class=\"kpi-value\">{:.1}%</span><span class=\"kpi-label\">Complete</span></div>\n\
         </section>\n",
        Escaped(input.request.dashboard_type.title()),
        summary.total_rows,
        summary.total_columns,
        100.0 - summary.missing_percentage,
    )?;

    html.push_str("<main class=\"grid\">\n");
    for chart in input.charts {
        let Some(container) = chart.container_id() else {
            continue;
        };
        let (span, height) = match section_for(&chart_sections, chart_index(chart)) {
            Some(section) => (
                section.span.tracks(input.layout.grid_columns),
                section.height.pixels(),
            ),
            None => (1, input.layout.chart_height()),
        };
        write!(
            html,
            "<article class=\"card\" style=\"grid-column: span {span};\">\n\
             <h2>{}</h2>\n\
             <div id=\"{container}\" class=\"chart\" style=\"height: {height}px;\"></div>\n\
             <p class=\"reasoning\">{}</p>\n</article>\n",
            Escaped(chart.title()),
            Escaped(&chart.reasoning),
        )?;
    }
    html.push_str("</main>\n");

    if !input.insights.is_empty() {
        html.push_str("<section class=\"insights\">\n<h2>Key insights</h2>\n<ul>\n");
        for insight in input.insights {
            writeln!(html, "<li>{}</li>", Escaped(insight))?;
        }
        html.push_str("</ul>\n</section>\n");
    }

    html.push_str("<footer><span id=\"selection\">Click a chart element for details</span></footer>\n");

    write!(
        html,
        "<script>\nconst DASHBOARD_DATA = {};\nconst CHARTS = {};\n{RUNTIME_SCRIPT}</script>\n\
         </body>\n</html>\n",
        script_json(input.data)?,
        script_json(&client_charts)?,
    )?;

    Ok(Artifact::template(ArtifactKind::Document, html))
}

/// Serialize for embedding inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Text escaped for HTML element content and quoted attributes.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        askama_escape::escape_html(f, self.0)
    }
}

fn stylesheet(layout: &LayoutConfig, primary: &str, accent: &str) -> String {
    format!(
        r#":root {{
  --primary: {primary};
  --accent: {accent};
  --gap: {gap}px;
  --surface: #ffffff;
  --background: #f4f6f8;
  --text: #1d2733;
}}
* {{ box-sizing: border-box; }}
body {{ margin: 0; font-family: -apple-system, "Segoe UI", Roboto, sans-serif; background: var(--background); color: var(--text); }}
.dashboard-header {{ background: var(--primary); color: #fff; padding: 24px var(--gap); }}
.dashboard-header h1 {{ margin: 0; font-size: 1.6rem; }}
.subtitle {{ margin: 4px 0 0; opacity: 0.8; }}
.kpis {{ display: flex; flex-wrap: wrap; gap: var(--gap); padding: var(--gap); }}
.kpi {{ flex: 1 1 160px; background: var(--surface); border-top: 4px solid var(--accent); border-radius: 8px; padding: 16px; display: flex; flex-direction: column; }}
.kpi-value {{ font-size: 1.5rem; font-weight: 600; }}
.kpi-label {{ font-size: 0.85rem; opacity: 0.7; }}
.grid {{ display: grid; grid-template-columns: repeat({columns}, minmax(0, 1fr)); gap: var(--gap); padding: 0 var(--gap) var(--gap); }}
.card {{ background: var(--surface); border-radius: 8px; padding: 16px; box-shadow: 0 1px 3px rgba(0, 0, 0, 0.08); }}
.card h2 {{ margin: 0 0 8px; font-size: 1rem; }}
.reasoning {{ margin: 8px 0 0; font-size: 0.8rem; opacity: 0.7; }}
.insights {{ margin: 0 var(--gap) var(--gap); background: var(--surface); border-left: 4px solid var(--primary); border-radius: 8px; padding: 16px; }}
footer {{ padding: 12px var(--gap); font-size: 0.85rem; opacity: 0.8; }}
@media (max-width: 900px) {{
  .grid {{ grid-template-columns: 1fr; }}
  .card {{ grid-column: auto !important; }}
}}
"#,
        gap = layout.spacing.gap_px(),
        columns = layout.grid_columns.max(1),
    )
}

/// Sections that hold charts, in layout order.
fn chart_sections(layout: &LayoutConfig) -> Vec<&LayoutSection> {
    layout
        .sections
        .iter()
        .filter(|s| {
            !matches!(
                s.kind,
                SectionKind::Kpi
                    | SectionKind::Insights
                    | SectionKind::Overview
                    | SectionKind::QualityScore
                    | SectionKind::Recommendations
            )
        })
        .collect()
}

/// Zero-based position parsed from a `chart_N` id.
fn chart_index(chart: &ChartSpecification) -> usize {
    chart
        .id
        .as_deref()
        .and_then(|id| id.strip_prefix("chart_"))
        .and_then(|n| n.parse::<usize>().ok())
        .map(|n| n.saturating_sub(1))
        .unwrap_or(0)
}

/// Charts cycle through the chart sections.
fn section_for<'a>(sections: &[&'a LayoutSection], index: usize) -> Option<&'a LayoutSection> {
    if sections.is_empty() {
        None
    } else {
        Some(sections[index % sections.len()])
    }
}

fn base_layout(title: &str, height: u32) -> Value {
    json!({
        "title": { "text": title },
        "height": height,
        "margin": { "t": 48, "r": 16, "b": 48, "l": 56 },
        "paper_bgcolor": "rgba(0,0,0,0)",
        "plot_bgcolor": "rgba(0,0,0,0)",
    })
}

fn axis_titles(layout: &mut Value, x: Option<&str>, y: Option<&str>) {
    if let Some(x) = x {
        layout["xaxis"] = json!({ "title": { "text": x } });
    }
    if let Some(y) = y {
        layout["yaxis"] = json!({ "title": { "text": y } });
    }
}

fn precomputed_box(name: &str, summary: &BoxSummary, color: &str) -> Value {
    json!({
        "type": "box",
        "name": name,
        "x": [name],
        "q1": [summary.q1],
        "median": [summary.median],
        "q3": [summary.q3],
        "lowerfence": [summary.lower_fence.max(summary.min)],
        "upperfence": [summary.upper_fence.min(summary.max)],
        "mean": [summary.mean],
        "marker": { "color": color },
    })
}

fn outlier_points(name: &str, summary: &BoxSummary, color: &str) -> Option<Value> {
    (!summary.outliers.is_empty()).then(|| {
        json!({
            "type": "scatter",
            "mode": "markers",
            "name": format!("{name} outliers"),
            "x": vec![name; summary.outliers.len()],
            "y": summary.outliers,
            "marker": { "color": color, "size": 6 },
            "showlegend": false,
        })
    })
}

/// Traces and layout for one chart.
fn plot(
    chart: &ChartSpecification,
    data: &ChartData,
    height: u32,
    primary: &str,
    accent: &str,
) -> (Vec<Value>, Value) {
    let mut layout = base_layout(chart.title(), height);
    let first = chart.columns.first().map(String::as_str).unwrap_or_default();
    let second = chart.columns.get(1).map(String::as_str);

    let traces = match data {
        ChartData::Histogram { bins } => {
            axis_titles(&mut layout, Some(first), Some("Count"));
            layout["bargap"] = json!(0.02);
            vec![json!({
                "type": "bar",
                "name": first,
                "x": bins.iter().map(|b| (b.start + b.end) / 2.0).collect::<Vec<_>>(),
                "y": bins.iter().map(|b| b.count).collect::<Vec<_>>(),
                "width": bins
                    .iter()
                    .map(|b| (b.end - b.start).max(f64::EPSILON))
                    .collect::<Vec<_>>(),
                "marker": { "color": primary },
            })]
        }
        ChartData::Distribution { summary, values } => match chart.chart_type {
            ChartType::ViolinPlot => vec![json!({
                "type": "violin",
                "name": first,
                "y": values,
                "box": { "visible": chart.config.show_box.unwrap_or(true) },
                "meanline": { "visible": true },
                "line": { "color": primary },
            })],
            _ => {
                let mut traces = vec![precomputed_box(first, summary, primary)];
                if chart.config.show_outlier_points != Some(false) {
                    traces.extend(outlier_points(first, summary, accent));
                }
                traces
            }
        },
        ChartData::Counts {
            labels,
            counts,
            other,
        } => {
            let mut labels = labels.clone();
            let mut counts = counts.clone();
            match chart.chart_type {
                ChartType::PieChart | ChartType::Treemap if *other > 0 => {
                    labels.push("Other".to_string());
                    counts.push(*other);
                }
                _ => {}
            }
            match chart.chart_type {
                ChartType::PieChart => vec![json!({
                    "type": "pie",
                    "labels": labels,
                    "values": counts,
                    "hole": chart.config.hole.unwrap_or(0.0),
                    "textinfo": "label+percent",
                })],
                ChartType::Treemap => vec![json!({
                    "type": "treemap",
                    "labels": labels,
                    "parents": vec![""; labels.len()],
                    "values": counts,
                    "textinfo": "label+value",
                })],
                _ if chart.config.orientation == Some(Orientation::Horizontal) => {
                    axis_titles(&mut layout, Some("Count"), None);
                    layout["yaxis"] = json!({ "autorange": "reversed", "automargin": true });
                    vec![json!({
                        "type": "bar",
                        "orientation": "h",
                        "x": counts,
                        "y": labels,
                        "marker": { "color": primary },
                    })]
                }
                _ => {
                    axis_titles(&mut layout, Some(first), Some("Count"));
                    vec![json!({
                        "type": "bar",
                        "x": labels,
                        "y": counts,
                        "marker": { "color": primary },
                    })]
                }
            }
        }
        ChartData::Scatter {
            x, y, trendline, ..
        } => {
            axis_titles(&mut layout, Some(first), second);
            let kind = if x.len() > WEBGL_THRESHOLD { "scattergl" } else { "scatter" };
            let mut traces = vec![json!({
                "type": kind,
                "mode": "markers",
                "name": format!("{first} vs {}", second.unwrap_or_default()),
                "x": x,
                "y": y,
                "marker": { "color": primary, "opacity": 0.7, "size": 6 },
            })];
            if let Some(t) = trendline {
                let (lo, hi) = x.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(*v), hi.max(*v))
                });
                if lo.is_finite() && hi.is_finite() {
                    traces.push(json!({
                        "type": "scatter",
                        "mode": "lines",
                        "name": "Trend",
                        "x": [lo, hi],
                        "y": [t.slope * lo + t.intercept, t.slope * hi + t.intercept],
                        "line": { "color": accent, "dash": "dash" },
                    }));
                }
            }
            traces
        }
        ChartData::Heatmap { columns, values } => {
            let mut trace = json!({
                "type": "heatmap",
                "x": columns,
                "y": columns,
                "z": values,
                "colorscale": chart.config.color_scale.as_deref().unwrap_or("RdBu"),
                "zmin": -1,
                "zmax": 1,
            });
            if chart.config.annotate.unwrap_or(false) {
                trace["texttemplate"] = json!("%{z:.2f}");
            }
            vec![trace]
        }
        ChartData::GroupedDistribution { groups } => {
            axis_titles(&mut layout, second, Some(first));
            groups
                .iter()
                .map(|g| precomputed_box(&g.label, &g.summary, primary))
                .collect()
        }
        ChartData::GroupedBars { categories, series } => {
            layout["barmode"] = json!("group");
            axis_titles(&mut layout, Some(first), None);
            series
                .iter()
                .map(|s| {
                    json!({
                        "type": "bar",
                        "name": s.name,
                        "x": categories,
                        "y": s.values,
                    })
                })
                .collect()
        }
        ChartData::Line { x, series } => {
            axis_titles(&mut layout, Some(first), None);
            series
                .iter()
                .map(|s| {
                    json!({
                        "type": "scatter",
                        "mode": "lines",
                        "name": s.name,
                        "x": x,
                        "y": s.values,
                    })
                })
                .collect()
        }
        ChartData::Rows { columns, rows, .. } => {
            let dimensions: Vec<Value> = columns
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let values: Vec<Option<f64>> =
                        rows.iter().map(|r| r.get(i).copied().flatten()).collect();
                    json!({ "label": name, "values": values })
                })
                .collect();
            match chart.chart_type {
                ChartType::ParallelCoordinates => vec![json!({
                    "type": "parcoords",
                    "dimensions": dimensions,
                    "line": { "color": primary },
                })],
                _ => vec![json!({
                    "type": "splom",
                    "dimensions": dimensions,
                    "showupperhalf": false,
                    "marker": { "color": primary, "size": 4, "opacity": 0.6 },
                })],
            }
        }
    };

    (traces, layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characteristics::CharacteristicsAnalyzer;
    use crate::config::ChartLibrary;
    use crate::dataset::{Column, DataRepresentation, Dataset};
    use crate::insights::DataSummary;
    use crate::recommend::{ChartMaterializer, RecommendationEngine};
    use crate::request::{DashboardType, GenerationRequest};
    use crate::synthesis::ArtifactVerifier;

    #[test]
    fn test_escaped_text() {
        let escaped = Escaped("<a href=\"x\">Q&A</a>").to_string();
        assert!(escaped.starts_with("&lt;a href="));
        assert!(escaped.contains("Q&amp;A&lt;/a&gt;"));
        assert!(!escaped.contains('"'));
    }

    #[test]
    fn test_rendered_document_verifies() {
        let ds = Dataset::new(vec![
            Column::numerical("age", (0..40).map(|i| Some(20.0 + i as f64)).collect()),
            Column::numerical("income", (0..40).map(|i| Some(1000.0 * i as f64)).collect()),
            Column::categorical("region", (0..40).map(|i| Some(["n", "s", "e", "w"][i % 4])).collect()),
        ])
        .unwrap();
        let profile = CharacteristicsAnalyzer::new().analyze(&ds);
        let request = GenerationRequest::new(DashboardType::Exploratory);
        let specs = RecommendationEngine::new().recommend(
            &profile,
            request.chart_purpose,
            &request.target_audience,
        );
        let charts = ChartMaterializer::default().materialize(&specs, &ds).charts;
        let summary = DataSummary::from_profile(&profile);
        let data = DataRepresentation::from_dataset(&ds, 10);
        let layout = LayoutConfig::for_dashboard(request.dashboard_type);
        let insights = vec!["Income </script> rises with age".to_string()];

        let input = SynthesisInput {
            title: "Exploratory Dashboard",
            request: &request,
            summary: &summary,
            data: &data,
            layout: &layout,
            charts: &charts,
            insights: &insights,
            library: ChartLibrary::Plotly,
        };
        let artifact = render(&input).unwrap();
        assert_eq!(artifact.kind, ArtifactKind::Document);

        let report = ArtifactVerifier::new(ChartLibrary::Plotly).verify(
            &artifact.code,
            artifact.kind,
            &input.container_ids(),
        );
        assert!(report.passed(), "{:?}", report.critical_issues);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert!(artifact.code.contains("id=\"chart-chart_1\""));
        assert!(!artifact.code.contains("Income </script>"));
    }

    #[test]
    fn test_empty_chart_list_still_renders() {
        let ds = Dataset::new(vec![Column::categorical("only", vec![Some("a")])]).unwrap();
        let profile = CharacteristicsAnalyzer::new().analyze(&ds);
        let request = GenerationRequest::default();
        let summary = DataSummary::from_profile(&profile);
        let data = DataRepresentation::from_dataset(&ds, 10);
        let layout = LayoutConfig::default();
        let input = SynthesisInput {
            title: "Empty",
            request: &request,
            summary: &summary,
            data: &data,
            layout: &layout,
            charts: &[],
            insights: &[],
            library: ChartLibrary::Plotly,
        };

        let artifact = render(&input).unwrap();
        let report = ArtifactVerifier::default().verify(&artifact.code, artifact.kind, &[]);
        assert!(report.passed());
    }
}
