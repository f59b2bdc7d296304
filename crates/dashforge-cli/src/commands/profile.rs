//! Profile command - print the characteristics of a data file.

use std::path::PathBuf;

use colored::Colorize;
use dashforge::DashboardPipeline;
use dashforge::characteristics::{DataPattern, STRONG_CORRELATION};
use dashforge::insights::quality_score;

pub fn run(file: PathBuf, json: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = DashboardPipeline::new();
    let dataset = super::load(&pipeline, &file)?;
    let profile = pipeline.profile(&dataset);

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    let info = &profile.basic_info;
    println!();
    println!(
        "{} rows, {} columns, {:.1}% missing, ~{:.2} MB",
        info.row_count.to_string().white().bold(),
        info.column_count.to_string().white().bold(),
        info.missing_data_percent,
        info.memory_usage_mb
    );
    println!("Data quality score: {}%", quality_score(&profile));

    println!();
    println!("{}", "Columns:".yellow().bold());
    for (name, pattern) in &profile.data_patterns {
        let detail = match pattern {
            DataPattern::Numerical(p) => format!(
                "numerical   {:14} outliers {:.1}%",
                p.distribution_type.as_str(),
                p.outlier_percentage
            ),
            DataPattern::Categorical(p) => format!(
                "categorical {} categories, top share {:.0}%",
                p.cardinality,
                p.top_category_dominance * 100.0
            ),
            DataPattern::Boolean(p) => format!("boolean     {:.0}% true", p.true_percentage),
            DataPattern::Datetime(p) => format!("datetime    spans {} days", p.span_days),
        };
        println!("  {:20} {}", name, detail);
    }

    if let Some(correlations) = &profile.relationships.correlations {
        println!();
        println!(
            "{} (max |r| = {:.2})",
            "Correlations:".yellow().bold(),
            correlations.max_correlation
        );
        for pair in correlations.pairs() {
            let r = format!("{:+.3}", pair.correlation);
            let r = if pair.correlation.abs() >= STRONG_CORRELATION {
                r.as_str().green().bold()
            } else {
                r.as_str().normal()
            };
            println!("  {} ~ {}: {}", pair.variable1, pair.variable2, r);
        }
    }

    if verbose && !profile.hints.is_empty() {
        println!();
        println!("{}", "Hints:".yellow().bold());
        for hint in &profile.hints {
            println!("  - {}", hint);
        }
    }

    Ok(())
}
