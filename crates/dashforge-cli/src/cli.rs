//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dashforge::{Audience, ChartPurpose, DashboardType};

/// Dashforge: adaptive dashboard generation for tabular data
#[derive(Parser)]
#[command(name = "dashforge")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile a data file: column kinds, distributions and correlations
    Profile {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output the profile as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recommend charts for a data file
    Recommend {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Chart purpose (exploration, detailed_exploration, executive, presentation)
        #[arg(short, long, default_value = "exploration")]
        purpose: ChartPurpose,

        /// Target audience (executive, analyst, data_scientist, business_user, ...)
        #[arg(short, long, default_value = "analyst")]
        audience: Audience,

        /// Maximum number of charts
        #[arg(short = 'n', long)]
        max_charts: Option<usize>,

        /// Output the recommendations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate an interactive dashboard
    Generate {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the dashboard (default: <file>.dashboard.html)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Dashboard type (executive, data_quality, exploratory, time_series, correlation)
        #[arg(short = 't', long = "type", default_value = "exploratory")]
        dashboard_type: DashboardType,

        /// Chart purpose
        #[arg(short, long, default_value = "exploration")]
        purpose: ChartPurpose,

        /// Target audience
        #[arg(short, long, default_value = "analyst")]
        audience: Audience,

        /// Business context passed to the code-generation provider
        #[arg(short, long)]
        context: Option<String>,

        /// Maximum number of charts
        #[arg(short = 'n', long)]
        max_charts: Option<usize>,

        /// Code-generation provider
        #[arg(long, default_value = "none")]
        llm: LlmProviderChoice,

        /// Model to use (provider-specific, e.g., "gpt-4o", "llama3.2")
        #[arg(long)]
        model: Option<String>,

        /// Pipeline configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also write the full pipeline result as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Give up after this many seconds
        #[arg(long, default_value = "300")]
        timeout: u64,
    },
}

/// Code-generation provider choice
#[derive(Clone, Debug, Default)]
pub enum LlmProviderChoice {
    /// No provider - template rendering only
    #[default]
    None,
    /// Anthropic Claude API (requires ANTHROPIC_API_KEY)
    Anthropic,
    /// OpenAI GPT API (requires OPENAI_API_KEY)
    OpenAI,
    /// Ollama local models (requires Ollama running)
    Ollama,
    /// Mock provider for testing
    Mock,
}

impl std::str::FromStr for LlmProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(LlmProviderChoice::None),
            "anthropic" | "claude" => Ok(LlmProviderChoice::Anthropic),
            "openai" | "gpt" => Ok(LlmProviderChoice::OpenAI),
            "ollama" | "local" => Ok(LlmProviderChoice::Ollama),
            "mock" | "test" => Ok(LlmProviderChoice::Mock),
            _ => Err(format!(
                "Unknown provider: {}. Use: none, anthropic, openai, ollama, or mock.",
                s
            )),
        }
    }
}

impl std::fmt::Display for LlmProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProviderChoice::None => write!(f, "none"),
            LlmProviderChoice::Anthropic => write!(f, "anthropic"),
            LlmProviderChoice::OpenAI => write!(f, "openai"),
            LlmProviderChoice::Ollama => write!(f, "ollama"),
            LlmProviderChoice::Mock => write!(f, "mock"),
        }
    }
}
