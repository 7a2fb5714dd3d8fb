//! Uplink command-line client entry point.

mod app;
mod cli;
mod config;
mod render;
mod shell;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();

    // Load configuration.
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::config_path()?,
    };
    let mut config = config::Config::load_from(&config_path)?;
    if let Some(url) = cli.backend_url {
        config.backend_url = url;
    }

    // Initialize structured logging; stdout is reserved for links.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %config.backend_url,
        config = %config_path.display(),
        "starting uplink"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run(cli.command, config, &config_path))
}
