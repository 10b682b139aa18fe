//! CLI module for Engine Twin
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `serve` - Start the twin server
//! - `summary` - Print the degradation summary of a dataset file
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start server against a CMAPSS training file
//! engine-twin serve --dataset data/train_FD001.txt
//!
//! # One-off summary as JSON
//! engine-twin summary data/train_FD001.txt --json
//!
//! # Generate shell completions
//! engine-twin completions bash > ~/.bash_completion.d/engine-twin
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod serve;
pub mod summary;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Engine Twin - turbofan degradation metrics and live digital twin
#[derive(Parser, Debug)]
#[command(
    name = "engine-twin",
    version,
    about = "Turbofan degradation metrics and live engine digital twin"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the twin server
    Serve(ServeArgs),
    /// Print the degradation summary of a dataset file
    Summary(SummaryArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "twin.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "TWIN_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "TWIN_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TWIN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Dataset file to serve metrics for
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,

    /// Feed synthetic engine readings
    #[arg(long)]
    pub simulate: bool,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Dataset file (whitespace, CSV or spreadsheet)
    pub path: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "twin.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
