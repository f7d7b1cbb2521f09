//! Rowscope - Main Entry Point
//!
//! Usage: `rowscope [collection]`

use anyhow::Context as _;
use rowscope::app::application::run_app;
use rowscope::constants::LOG_FILE_PREFIX;
use rowscope::domain::ViewerConfig;
use rowscope::helpers::{get_or_create_log_dir, is_development};
use rowscope::services::{ServiceHub, block_on};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Logging: stdout plus a daily rolling file; the guard flushes on exit
    let log_dir = get_or_create_log_dir().context("creating log directory")?;
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, _log_guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(default_level.into()))
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    tracing::info!("Starting Rowscope...");

    let mut config = ViewerConfig::load().context("loading configuration")?;
    if let Some(collection) = std::env::args().nth(1) {
        config.collection = Some(collection);
    }

    let hub = ServiceHub::new(config.clone()).context("initializing backing store")?;

    let collections = match block_on(hub.list_collections()) {
        Ok(collections) => collections,
        Err(e) => {
            tracing::warn!(error = %e, "Could not list collections");
            Vec::new()
        }
    };
    let collection = config
        .collection
        .or_else(|| collections.first().map(|c| c.id.clone()));
    match &collection {
        Some(collection) => tracing::info!(%collection, "Opening collection"),
        None => tracing::warn!("No collection configured and none found in the store"),
    }

    run_app(hub, collection, collections);
    Ok(())
}
