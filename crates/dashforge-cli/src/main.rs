//! Dashforge CLI - adaptive dashboard generation.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "dashforge=debug" } else { "dashforge=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Profile { file, json } => commands::profile::run(file, json, cli.verbose),

        Commands::Recommend {
            file,
            purpose,
            audience,
            max_charts,
            json,
        } => commands::recommend::run(file, purpose, audience, max_charts, json),

        Commands::Generate {
            file,
            output,
            dashboard_type,
            purpose,
            audience,
            context,
            max_charts,
            llm,
            model,
            config,
            report,
            timeout,
        } => commands::generate::run(commands::generate::GenerateArgs {
            file,
            output,
            dashboard_type,
            purpose,
            audience,
            context,
            max_charts,
            llm,
            model,
            config,
            report,
            timeout,
            verbose: cli.verbose,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
