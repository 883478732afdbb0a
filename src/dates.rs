use std::time::Duration;

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::config::DatesConfig;

const DESCRIPTION_SELECTOR: &str = r#"head meta[itemprop="description"]"#;

/// Fetches the LUG meeting page and pulls the dates out of its description
/// meta tag. Owns the pooled HTTP client for the lifetime of the bot.
pub struct DatesFetcher {
    client: reqwest::Client,
    url: String,
}

impl DatesFetcher {
    pub fn new(config: &DatesConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch_dates(&self) -> Result<String> {
        debug!("Fetching meeting dates from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to request {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Dates page returned HTTP status {}", status);
        }

        let body = response
            .text()
            .await
            .context("Failed to read dates page body")?;

        extract_dates(&body)
    }

    /// Release the HTTP client and its pooled connections.
    pub fn close(self) {
        drop(self.client);
        info!("HTTP client for {} closed", self.url);
    }
}

/// Read the `content` of the page's description meta tag and normalize it.
pub fn extract_dates(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(DESCRIPTION_SELECTOR)
        .map_err(|e| anyhow::anyhow!("Invalid selector {}: {:?}", DESCRIPTION_SELECTOR, e))?;

    let meta = document
        .select(&selector)
        .next()
        .context("No <meta itemprop=\"description\"> tag in dates page")?;

    let content = meta
        .value()
        .attr("content")
        .context("Description meta tag has no content attribute")?;

    Ok(normalize(content))
}

/// Vertical tabs become newlines, then every `"-- "` is dropped.
pub fn normalize(text: &str) -> String {
    text.replace('\u{0B}', "\n").replace("-- ", "")
}
