//! CLI command implementations.

pub mod generate;
pub mod profile;
pub mod recommend;

use std::path::Path;

use colored::Colorize;
use dashforge::{DashboardPipeline, Dataset};

/// Load a data file, reporting what was read.
fn load(pipeline: &DashboardPipeline, file: &Path) -> Result<Dataset, Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (dataset, source) = pipeline.load(file)?;
    eprintln!(
        "{} {} ({} rows, {} columns, {})",
        "Loaded".cyan().bold(),
        file.display().to_string().white(),
        source.row_count,
        source.column_count,
        source.format
    );
    Ok(dataset)
}
