//! Generate command - build an interactive dashboard from a data file.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use dashforge::{
    AnthropicProvider, ArtifactKind, ArtifactOrigin, Audience, ChartPurpose, DashboardPipeline,
    DashboardType, GenerationRequest, LlmConfig, LlmProvider, MockProvider, OllamaProvider,
    OpenAIProvider, PipelineConfig, VerificationStatus,
};

use crate::cli::LlmProviderChoice;

pub struct GenerateArgs {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub dashboard_type: DashboardType,
    pub purpose: ChartPurpose,
    pub audience: Audience,
    pub context: Option<String>,
    pub max_charts: Option<usize>,
    pub llm: LlmProviderChoice,
    pub model: Option<String>,
    pub config: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub timeout: u64,
    pub verbose: bool,
}

fn api_key(var: &str) -> Result<String, Box<dyn std::error::Error>> {
    std::env::var(var).map_err(|_| format!("{var} environment variable not set").into())
}

/// Build the selected provider, honouring a model override.
fn build_provider(
    choice: &LlmProviderChoice,
    model: Option<String>,
) -> Result<Option<Arc<dyn LlmProvider>>, Box<dyn std::error::Error>> {
    let provider: Arc<dyn LlmProvider> = match (choice, model) {
        (LlmProviderChoice::None, _) => return Ok(None),
        (LlmProviderChoice::Mock, _) => Arc::new(MockProvider::new()),
        (LlmProviderChoice::Anthropic, None) => Arc::new(AnthropicProvider::from_env()?),
        (LlmProviderChoice::Anthropic, Some(model)) => Arc::new(AnthropicProvider::with_config(
            api_key("ANTHROPIC_API_KEY")?,
            LlmConfig { model, ..LlmConfig::default() },
        )?),
        (LlmProviderChoice::OpenAI, None) => Arc::new(OpenAIProvider::from_env()?),
        (LlmProviderChoice::OpenAI, Some(model)) => Arc::new(OpenAIProvider::with_config(
            api_key("OPENAI_API_KEY")?,
            LlmConfig { model, ..LlmConfig::default() },
        )?),
        (LlmProviderChoice::Ollama, None) => Arc::new(OllamaProvider::new()?),
        (LlmProviderChoice::Ollama, Some(model)) => Arc::new(OllamaProvider::with_model(model)?),
    };
    Ok(Some(provider))
}

pub fn run(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    let mut pipeline = DashboardPipeline::with_config(config);
    if let Some(provider) = build_provider(&args.llm, args.model)? {
        println!("{} {}", "Using provider".cyan(), provider.name().white().bold());
        pipeline = pipeline.with_shared_llm(provider);
    }

    let dataset = Arc::new(super::load(&pipeline, &args.file)?);

    let mut request = GenerationRequest::new(args.dashboard_type)
        .with_purpose(args.purpose)
        .with_audience(args.audience);
    if let Some(context) = args.context {
        request = request.with_context(context);
    }
    if let Some(n) = args.max_charts {
        request = request.with_max_charts(n);
    }

    println!(
        "{} {} dashboard",
        "Generating".cyan().bold(),
        request.dashboard_type.title().white()
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(pipeline.generate_with_timeout(
        dataset,
        request,
        Duration::from_secs(args.timeout),
    ))?;

    if let Some(path) = &args.report {
        fs::write(path, serde_json::to_string_pretty(&result)?)?;
    }

    if !result.success {
        for message in &result.error_messages {
            eprintln!("{} {}", "error:".red().bold(), message);
        }
        return Err("dashboard generation failed".into());
    }

    let output_path = args.output.unwrap_or_else(|| {
        let mut p = args.file.clone();
        let stem = p.file_stem().unwrap_or_default().to_string_lossy();
        let extension = match result.artifact_kind {
            ArtifactKind::Document => "html",
            ArtifactKind::Component => "jsx",
        };
        p.set_file_name(format!("{}.dashboard.{}", stem, extension));
        p
    });
    fs::write(&output_path, &result.artifact)?;

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );
    println!(
        "{} charts, {} insights",
        result.chart_specifications.len().to_string().white().bold(),
        result.insights.len().to_string().white().bold()
    );

    let origin = match result.artifact_origin {
        Some(ArtifactOrigin::Synthesized) => "synthesized".green(),
        _ => "template".yellow(),
    };
    println!("Artifact: {} ({})", result.artifact_kind, origin);

    if let Some(report) = &result.verification_report {
        let status = match report.overall_status {
            VerificationStatus::Pass => "PASS".green().bold(),
            VerificationStatus::Fail => "FAIL".red().bold(),
        };
        println!(
            "Verification: {} ({} checks passed, {} warnings)",
            status,
            report.passed_checks.len(),
            report.warnings.len()
        );
        if let Some(review) = &report.semantic_review {
            println!("Semantic review score: {}/100", review.score);
        }
        if args.verbose {
            for warning in &report.warnings {
                println!("  {} {}", "-".yellow(), warning);
            }
        }
    }

    for warning in &result.warnings {
        println!("{} {}", "warning:".yellow(), warning);
    }
    for message in &result.error_messages {
        println!("{} {}", "error:".red(), message);
    }
    if args.verbose {
        for note in &result.diagnostics {
            println!("{} {}", "note:".dimmed(), note);
        }
    }

    Ok(())
}
