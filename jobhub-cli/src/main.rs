//! jobhub CLI
//!
//! Command-line interface for inspecting and canceling jobs held by a remote
//! registry.

mod commands;
mod config;
mod id_resolver;
mod types;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jobhub")]
#[command(about = "Inspect and control jobs of a remote job registry", long_about = None)]
struct Cli {
    /// Registry API URL
    #[arg(long, env = "JOBHUB_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobhub=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config { url: cli.url };

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_await_defaults() {
        let cli = Cli::try_parse_from([
            "jobhub",
            "--url",
            "http://registry:9000",
            "job",
            "await",
            "3fa8",
        ])
        .unwrap();
        assert_eq!(cli.url, "http://registry:9000");
        assert!(matches!(cli.command, Commands::Job { .. }));
    }
}
