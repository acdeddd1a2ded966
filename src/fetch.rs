//! Blocking page fetcher using ureq

use std::time::Duration;

use scraper::Html;
use tracing::{error, info};
use url::Url;

use crate::config::FetchSettings;
use crate::error::{ScrapeError, ScrapeResult};

/// Fetches pages over one reusable agent.
///
/// Not meant to be shared between threads; the pipeline drives it one
/// request at a time.
pub struct PageFetcher {
    agent: ureq::Agent,
    settings: FetchSettings,
}

impl PageFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        let agent = ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .timeout_global(Some(Duration::from_secs(settings.timeout_secs)))
                .user_agent(settings.user_agent.as_str())
                .build(),
        );

        Self { agent, settings }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// GET `url` and return the body; non-2xx statuses are errors
    pub fn fetch_text(&self, url: &str) -> ScrapeResult<String> {
        let parsed = Url::parse(url).map_err(|e| transport_error(url, e))?;

        info!("Fetching URL: {}", parsed);
        let body = self
            .agent
            .get(parsed.as_str())
            .call()
            .and_then(|resp| resp.into_body().read_to_string())
            .map_err(|e| {
                error!("Failed to fetch the page: {}", e);
                transport_error(url, e)
            })?;

        info!("Page fetched successfully");
        Ok(body)
    }

    /// Fetch `url` and parse it as an HTML document
    pub fn fetch(&self, url: &str) -> ScrapeResult<Html> {
        let body = self.fetch_text(url)?;
        Ok(Html::parse_document(&body))
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new(FetchSettings::default())
    }
}

fn transport_error(url: &str, err: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::Transport {
        url: url.to_string(),
        message: err.to_string(),
    }
}
