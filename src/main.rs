//! Library Admin - command line front end
//!
//! Drives the library administration client against a running backend.

mod commands;
mod formatter;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use library_admin::{config::LoggingConfig, session::FileSessionStore, AppConfig, AppContext};

use formatter::OutputFormat;

/// Library administration client
#[derive(Parser, Debug)]
#[command(name = "library-admin")]
#[command(version, about = "School library administration client")]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "table", value_enum)]
    format: OutputFormat,

    /// Backend base URL, overriding configuration
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: commands::Command,
}

/// Install the tracing subscriber; the returned guard flushes the log file on drop
fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("library_admin={}", config.level).into())
    };

    let console = if config.format == "json" {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(filter())
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter())
            .boxed()
    };

    let (file, guard) = match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "library-admin.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(filter())
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry().with(console).with(file).init();
    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    let _guard = init_tracing(&config.logging);
    tracing::debug!(
        "Starting library-admin v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.api.base_url
    );

    let store = Arc::new(FileSessionStore::new(config.session.path.clone()));
    let mut ctx = AppContext::new(config, store).context("Failed to create API client")?;

    commands::run(&mut ctx, cli.command, cli.format).await
}
