mod bot;
mod commands;
mod config;
mod dates;
mod platform;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::AppState;
use crate::commands::CommandRegistry;
use crate::config::Config;
use crate::dates::DatesFetcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lugbot=debug,reqwest=warn,hyper=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Dates URL: {}", config.dates.url);
    info!("  Request timeout: {}s", config.dates.timeout_secs);

    let commands = CommandRegistry::builtin()?;
    let dates = DatesFetcher::new(&config.dates)?;
    let state = Arc::new(AppState::new(commands, dates));

    let bot = teloxide::Bot::new(&config.telegram.bot_token);

    info!("Bot is starting...");
    platform::telegram::run(bot, state.clone()).await?;

    match Arc::try_unwrap(state) {
        Ok(state) => state.shutdown(),
        Err(_) => warn!("Application state still in use at shutdown"),
    }

    Ok(())
}
