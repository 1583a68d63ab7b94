mod cli;
mod commands;
mod error;
mod input;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.log_level.as_deref());

    tracing::info!(config = %cli.config.display(), "alertgate starting");

    let writer = OutputWriter::new(cli.output);

    if let Err(e) = dispatch(cli, &writer).await {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn dispatch(cli: Cli, writer: &OutputWriter) -> Result<(), CliError> {
    match cli.command {
        Commands::Run(args) => commands::run::execute(args, &cli.config, writer).await,
        Commands::Classify(args) => commands::classify::execute(args, &cli.config, writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, writer).await,
        Commands::Taxonomy(args) => commands::taxonomy::execute(args, writer),
    }
}

/// Logs go to stderr so report output on stdout stays pipeable.
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();
}
