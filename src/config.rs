use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable that overrides `[telegram] bot_token`.
pub const TOKEN_ENV_VAR: &str = "TELEGRAM_TOKEN";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default = "default_dates_config")]
    pub dates: DatesConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatesConfig {
    #[serde(default = "default_dates_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_dates_url() -> String {
    "https://www.lug-taunus.org/termine".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_dates_config() -> DatesConfig {
    DatesConfig {
        url: default_dates_url(),
        timeout_secs: default_timeout_secs(),
    }
}

impl Config {
    /// Load the config file (if it exists) and apply environment overrides.
    ///
    /// A `.env` file in the working directory is read first, so
    /// `TELEGRAM_TOKEN` may live there instead of the process environment.
    pub fn load(path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let content = if path.exists() {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Some(text)
        } else {
            None
        };

        Self::from_sources(content.as_deref(), std::env::var(TOKEN_ENV_VAR).ok())
    }

    /// Build the config from raw TOML text and the token taken from the
    /// environment. Fails if neither provides a bot token.
    pub fn from_sources(content: Option<&str>, env_token: Option<String>) -> Result<Self> {
        let mut config: Config = match content {
            Some(text) => toml::from_str(text).context("Failed to parse config file")?,
            None => Config {
                telegram: TelegramConfig::default(),
                dates: default_dates_config(),
            },
        };

        if let Some(token) = env_token.filter(|t| !t.trim().is_empty()) {
            config.telegram.bot_token = token;
        }
        config.telegram.bot_token = config.telegram.bot_token.trim().to_string();

        if config.telegram.bot_token.is_empty() {
            anyhow::bail!(
                "No bot token configured: set {} or [telegram] bot_token",
                TOKEN_ENV_VAR
            );
        }

        Ok(config)
    }
}
