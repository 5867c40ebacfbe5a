use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use webide_config::IdeConfig;
use webide_main::{Cli, Command, run_commit};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // stdout only carries the created commit id
    let default_filter = if cli.verbose { "webide=debug" } else { "webide=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => IdeConfig::from_file(path)?,
        None => IdeConfig::load()?,
    };
    tracing::debug!(gitlab_url = %config.gitlab_url, "Configuration loaded");

    match cli.command {
        Command::Commit(args) => run_commit(config, args).await,
    }
}
