//! Command line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Shareguard - leecher detection for file-sharing peers
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Logging configuration (applies to all subcommands).
    #[command(flatten)]
    pub(crate) logs: LogArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Replay a JSON-lines host event log through the classifier.
    Replay(ReplayArgs),
    /// Print the effective configuration as TOML.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub(crate) struct ReplayArgs {
    /// Configuration file (TOML). Defaults apply when absent.
    #[arg(short, long, env = "SHAREGUARD_CONFIG", value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Event log, one JSON event per line. Use "-" for stdin.
    #[arg(short, long, default_value = "-", value_name = "PATH")]
    pub(crate) events: PathBuf,
}

#[derive(Debug, Args)]
pub(crate) struct ConfigArgs {
    /// Configuration file (TOML). Defaults apply when absent.
    #[arg(short, long, env = "SHAREGUARD_CONFIG", value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Args, Clone, Default)]
#[command(next_help_heading = "Logging")]
pub(crate) struct LogArgs {
    /// Silence all output.
    #[arg(short, long, global = true)]
    pub(crate) quiet: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub(crate) verbosity: u8,

    /// Log filter directive (e.g., "shareguard_classifier=debug").
    #[arg(long = "log.filter", value_name = "DIRECTIVE", global = true)]
    pub(crate) filter: Option<String>,

    /// Use JSON format for log output.
    #[arg(long = "log.json", global = true)]
    pub(crate) json: bool,
}
