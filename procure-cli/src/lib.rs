use clap::Parser;
use std::path::PathBuf;

mod io;
pub use io::*;

mod commands;
pub use commands::*;

pub mod config;
use config::AppConfig;

// The top-level arguments: an optional configuration file and the subcommand to run
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct BaseArgs {
    /// TOML configuration file
    #[arg(short, long, env = "PROCURE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl BaseArgs {
    pub async fn evaluate(self) -> anyhow::Result<()> {
        let config = AppConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Optimize { io, tuning } => {
                optimize(io, tuning.apply(config.optimizer)).await?;
            }
            Commands::Plan {
                build_id,
                currency,
                rates,
                as_of,
                output,
                tuning,
            } => {
                let config = AppConfig {
                    optimizer: tuning.apply(config.optimizer),
                    ..config
                };
                let args = PlanArgs {
                    build_id: build_id.into(),
                    currency,
                    rates,
                    as_of,
                };
                plan(args, config, output).await?;
            }
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("config file {} does not exist", .0.display())]
    MissingConfig(PathBuf),
}
