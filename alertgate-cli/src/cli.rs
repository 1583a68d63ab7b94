//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default configuration file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "alertgate.toml";

/// Alertgate -- event filtering and classification gateway for monitoring streams.
///
/// Use `alertgate <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "alertgate", version, about, long_about = None)]
pub struct Cli {
    /// Path to the alertgate.toml configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the event bridge over a frame stream until it ends.
    Run(RunArgs),

    /// Replay recorded frames and report per-frame verdicts.
    Classify(ClassifyArgs),

    /// Manage configuration.
    Config(ConfigArgs),

    /// Inspect the event taxonomy.
    Taxonomy(TaxonomyArgs),
}

// ---- run ----

/// Run the event bridge: consume frames, print emitted alerts.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Frame stream to consume, one JSON object per line ("-" for stdin).
    #[arg(default_value = "-")]
    pub input: String,

    /// JSON file mapping host/service ids to display names.
    #[arg(long)]
    pub resolve: Option<PathBuf>,
}

// ---- classify ----

/// Replay frames through the classifier without starting the bridge.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Frame file to replay, one JSON object per line ("-" for stdin).
    #[arg(default_value = "-")]
    pub input: String,

    /// JSON file mapping host/service ids to display names.
    #[arg(long)]
    pub resolve: Option<PathBuf>,

    /// Report every frame verdict, not just emitted alerts.
    #[arg(short, long)]
    pub verbose: bool,
}

// ---- config ----

/// Manage alertgate configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, stream).
        #[arg(long)]
        section: Option<String>,
    },
}

// ---- taxonomy ----

/// Inspect known event categories and their elements.
#[derive(Args, Debug)]
pub struct TaxonomyArgs {
    #[command(subcommand)]
    pub action: TaxonomyAction,
}

#[derive(Subcommand, Debug)]
pub enum TaxonomyAction {
    /// List all known event categories.
    Categories,
    /// List the named elements of one category.
    Elements {
        /// Category name (neb, bbdo, storage, correlation, dumper, extcmd, bam).
        category: String,
    },
}
