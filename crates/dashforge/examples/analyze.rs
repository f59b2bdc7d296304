//! Example: Generate a dashboard for a tabular data file.
//!
//! Usage:
//!   cargo run --example analyze -- <file_path> [output.html]
//!
//! Example:
//!   cargo run --example analyze -- sales.csv sales.dashboard.html

use std::env;
use std::path::Path;

use dashforge::{DashboardPipeline, GenerationRequest, MockProvider};

fn main() -> dashforge::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example analyze -- <file_path> [output.html]");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example analyze -- sales.csv sales.dashboard.html");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Dashforge: {}", file_path);
    println!("{}", separator);
    println!();

    // Mock provider so the example runs without an API key
    let pipeline = DashboardPipeline::new().with_llm(MockProvider::new());
    let (dataset, source) = pipeline.load(path)?;

    println!("## Source Metadata");
    println!("  File: {}", source.file);
    println!("  Format: {}", source.format);
    println!("  Rows: {}", source.row_count);
    println!("  Columns: {}", source.column_count);
    println!();

    let profile = pipeline.profile(&dataset);
    println!("## Column Types");
    println!("  Numerical: {:?}", profile.column_types.numerical);
    println!("  Categorical: {:?}", profile.column_types.categorical);
    println!("  Datetime: {:?}", profile.column_types.datetime);
    println!("  Boolean: {:?}", profile.column_types.boolean);
    println!();

    let result = pipeline.generate(&dataset, &GenerationRequest::default());

    println!("## Charts ({} total)", result.chart_specifications.len());
    println!();
    for chart in &result.chart_specifications {
        println!(
            "  {:10} {:22} {:?}",
            chart.id.as_deref().unwrap_or("-"),
            chart.chart_type.to_string(),
            chart.columns
        );
        println!("             {}", chart.reasoning);
    }
    println!();

    println!("## Insights");
    for insight in &result.insights {
        println!("  - {}", insight);
    }
    println!();

    if let Some(report) = &result.verification_report {
        println!("## Verification: {:?}", report.overall_status);
        for issue in &report.critical_issues {
            println!("  critical: {}", issue);
        }
        for warning in &report.warnings {
            println!("  warning: {}", warning);
        }
        println!();
    }

    if let Some(output) = args.get(2) {
        std::fs::write(output, &result.artifact).map_err(|source| dashforge::DashforgeError::Io {
            path: output.into(),
            source,
        })?;
        println!("Wrote {} bytes to {}", result.artifact.len(), output);
    }

    println!("{}", separator);

    Ok(())
}
