//! restyle - restyle zhihu pages in a running Chromium browser.
//!
//! Main entry point for the restyle CLI.

mod cli;
mod cmd_dispatch;
mod cmd_preview;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{error, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use restyle_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};

use crate::cli::{Cli, Commands};

/// Initialize tracing with console and daily rolling file output.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let log_dir = PathBuf::from(ConfigLoader::expand_path(&logging.dir));
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Cannot create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("restyle")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer on drop; keep it for the program duration.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let path = cli.config.clone().unwrap_or_else(ConfigLoader::default_path);
    let mut config = ConfigLoader::load_or_default(&path)
        .with_context(|| format!("Cannot load configuration from {}", path.display()))?;
    if let Some(endpoint) = &cli.endpoint {
        config.browser.endpoint = endpoint.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.logging)?;

    let report = ConfigValidator::validate(&config);
    for warning in &report.warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    if !report.is_valid() {
        for err in &report.errors {
            error!("{}: {}", err.path, err.message);
        }
        bail!("Invalid configuration ({} errors)", report.errors.len());
    }

    match cli.command {
        Commands::Run => cmd_dispatch::run(&config).await,
        Commands::Inject { file } => cmd_dispatch::inject(&config, file).await,
        Commands::Preview { html, output } => {
            cmd_preview::preview(&config, &html, output.as_deref()).await
        }
        Commands::Tabs => cmd_dispatch::tabs(&config).await,
    }
}
