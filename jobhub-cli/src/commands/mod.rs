//! CLI commands
//!
//! Every command talks to the registry named by [`Config::url`].

mod info;
mod job;

pub use job::JobCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect, cancel or await jobs
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Show name, version and uptime of the registry
    Info,
}

pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Info => info::handle_info_command(config).await,
    }
}
