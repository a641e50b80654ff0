//! Shareguard command line host.

mod cli;
mod config;
mod host;
mod logging;
mod replay;

use clap::Parser;
use eyre::Result;

use crate::cli::{Cli, Commands};
use crate::config::ShareguardConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.logs)?;

    match cli.command {
        Commands::Replay(args) => replay::run(&args),
        Commands::Config(args) => {
            let config = ShareguardConfig::load(args.config.as_deref())?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
