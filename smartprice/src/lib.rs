use clap::Parser;
use std::path::PathBuf;

mod io;
pub use io::*;

mod commands;
pub use commands::*;

mod config;
pub use config::AppConfig;

mod model;
pub use model::*;

// The top-level arguments: an optional configuration file, and which subcommand to execute
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct BaseArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "SMARTPRICE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl BaseArgs {
    pub fn evaluate(self) -> anyhow::Result<()> {
        let config = AppConfig::load(self.config.as_deref())?;
        tracing::debug!(?config, "loaded configuration");

        match self.command {
            Commands::Elasticity(args) => args.run(config.estimator),
            Commands::Optimize(args) => args.run(config.isoelastic),
            Commands::Recommend(args) => args.run(config.grid),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Unable to derive a summary path when writing to stdout, please specify --summary")]
    SummaryInference,
}
