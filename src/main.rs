//! chemhover: find chemical formulas in text and attach hover overlays.

mod adapters;
mod cli;
mod cmd_scan;
mod cmd_site;

use clap::Parser;
use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chemhover_config::{chemhover_dir, Config, ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands};

fn init_tracing() -> anyhow::Result<()> {
    let log_dir = chemhover_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("chemhover")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The worker flushes until the guard is dropped.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    let config = ConfigLoader::load_or_default(&ConfigLoader::expand_path(path))?;
    for warning in ConfigValidator::validate_strict(&config)? {
        warn!("{}: {}", warning.path, warning.message);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;

    match cli.command {
        Commands::Scan {
            file,
            threshold,
            model,
            no_sparkle,
        } => {
            cmd_scan::apply_overrides(&mut config, threshold, model, no_sparkle);
            ConfigValidator::validate_strict(&config)?;
            cmd_scan::handle_scan(&config, &file).await
        }
        Commands::Tokenize { words } => cmd_scan::handle_tokenize(&config, &words).await,
        Commands::Site { action } => cmd_site::handle_site_command(&config, action).await,
    }
}
