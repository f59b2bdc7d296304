//! Recommend command - rank charts for a data file.

use std::path::PathBuf;

use colored::Colorize;
use dashforge::{Audience, ChartPurpose, DashboardPipeline, GenerationRequest, Priority};

pub fn run(
    file: PathBuf,
    purpose: ChartPurpose,
    audience: Audience,
    max_charts: Option<usize>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = DashboardPipeline::new();
    let dataset = super::load(&pipeline, &file)?;

    let mut request = GenerationRequest::default()
        .with_purpose(purpose)
        .with_audience(audience);
    if let Some(n) = max_charts {
        request = request.with_max_charts(n);
    }

    let materialized = pipeline.recommend(&dataset, &request);

    if json {
        println!("{}", serde_json::to_string_pretty(&materialized.charts)?);
        return Ok(());
    }

    println!();
    println!(
        "{} charts for {} ({})",
        materialized.charts.len().to_string().white().bold(),
        request.target_audience,
        request.chart_purpose
    );
    for (i, chart) in materialized.charts.iter().enumerate() {
        let priority = match chart.priority {
            Priority::High => "high".red().bold(),
            Priority::Medium => "medium".yellow(),
        };
        println!(
            "{:>3}. {:22} {:7} {}",
            i + 1,
            chart.chart_type.to_string().cyan(),
            priority,
            chart.columns.join(", ")
        );
        println!("       {}", chart.reasoning.dimmed());
    }

    for error in &materialized.errors {
        println!("{} {}", "Skipped:".red(), error);
    }

    Ok(())
}
