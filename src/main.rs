//! Pomelo CLI entry point.

use anyhow::Context as _;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pomelo")]
#[command(about = "A persona-driven community chat assistant with a karma ledger")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting Pomelo...");

    let config = pomelo::config::Config::load()
        .context("failed to load configuration from environment")?;

    tracing::info!(data_dir = %config.data_dir.display(), "Configuration loaded");
    if let Some(endpoint) = &config.telemetry_endpoint {
        tracing::info!(%endpoint, "error telemetry endpoint configured");
    }

    let db = pomelo::db::Db::connect(&config.sqlite_path())
        .await
        .context("failed to connect to database")?;

    let message_log = pomelo::conversation::MessageLog::new(db.pool.clone());
    message_log.initialize().await.context("failed to initialize message log")?;

    let karma = pomelo::karma::KarmaStore::new(db.pool.clone());
    karma.initialize().await.context("failed to initialize karma store")?;

    let channels = pomelo::channel::ChannelStore::new(db.pool.clone());
    channels.initialize().await.context("failed to initialize channel store")?;

    tracing::info!("Database connections established");

    let generators = pomelo::generate::Generators::from_config(&config.llm, &config.summary)
        .context("failed to initialize generators")?;

    let commands = pomelo::commands::CommandRegistry::new(channels.clone());

    let router = Arc::new(pomelo::router::Router::new(
        message_log,
        karma,
        channels,
        generators,
        config.bot_name.clone(),
        config.llm.model.clone(),
        config.history_limit,
    ));

    tracing::info!(model = %config.llm.model, "Pomelo started successfully");

    tokio::select! {
        result = pomelo::messaging::discord::run(&config, router, commands) => {
            result.context("Discord client exited")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down...");
    db.close().await;

    tracing::info!("Pomelo stopped");
    Ok(())
}
