//! Remote tracker feed client

use async_trait::async_trait;

use super::TrackerError;
use crate::config::TrackerConfig;

/// Source of additional tracker URLs.
#[async_trait]
pub trait TrackerFeed: Send + Sync {
    /// Fetches the feed's current tracker URLs.
    ///
    /// # Errors
    ///
    /// - `TrackerError::Http` - Transport failure
    /// - `TrackerError::Status` - Feed responded with a non-success status
    async fn fetch(&self) -> Result<Vec<String>, TrackerError>;
}

/// Plain-text HTTP feed: one tracker URL per line, blank lines skipped.
pub struct HttpTrackerFeed {
    feed_url: String,
    client: reqwest::Client,
}

impl HttpTrackerFeed {
    /// Creates a feed client from tracker configuration.
    ///
    /// An unparseable `proxy_url` is logged and ignored rather than
    /// failing construction.
    pub fn new(config: &TrackerConfig) -> Self {
        let mut builder = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(3));

        if let Some(proxy_url) = &config.proxy_url {
            match reqwest::Proxy::all(proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(error) => {
                    tracing::warn!("Ignoring invalid proxy URL {}: {}", proxy_url, error);
                }
            }
        }

        Self {
            feed_url: config.feed_url.clone(),
            client: builder
                .build()
                .expect("HTTP client creation should not fail"),
        }
    }

    fn parse_body(body: &str) -> Vec<String> {
        body.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }
}

#[async_trait]
impl TrackerFeed for HttpTrackerFeed {
    async fn fetch(&self) -> Result<Vec<String>, TrackerError> {
        let response = self.client.get(&self.feed_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Status {
                code: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(Self::parse_body(&body))
    }
}
