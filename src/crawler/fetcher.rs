//! HTTP fetcher for listing pages
//!
//! This module provides the production [`PageSource`]:
//! - User-Agent rotation from a configured pool
//! - Randomized pre-request delay
//! - Bounded pool of in-flight requests
//! - Automatic retry with exponential backoff on recoverable failures

use async_trait::async_trait;
use rand::{seq::SliceRandom, Rng};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::config::{Config, FetcherConfig};
use crate::crawler::headers::build_browser_headers;
use crate::crawler::url::listing_page_url;
use crate::crawler::PageSource;
use crate::error::{Error, Result};
use crate::utils::error::FetchError;
use crate::utils::retry::{with_retry_if, RetryConfig};

/// Listing page fetcher
///
/// All randomness (user agent, delay) is drawn per request from the
/// configuration given at construction.
pub struct PageFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Bounds the number of in-flight requests
    pool: Semaphore,

    /// Configured pool size
    pool_size: usize,

    /// User agents rotated per request
    user_agents: Vec<String>,

    /// Randomized delay bounds applied before each request
    delay_min: Duration,
    delay_max: Duration,

    /// Retry policy for recoverable failures
    retry: RetryConfig,

    /// Site root used to build page URLs
    base_url: String,
}

impl PageFetcher {
    /// Create a fetcher from the full configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::Http` if the HTTP client cannot be created, or
    /// `Error::Config` if the user agent pool is empty
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.site.base_url, &config.fetcher)
    }

    /// Create a fetcher for `base_url` with the given fetcher settings
    ///
    /// # Errors
    ///
    /// Returns `Error::Http` if the HTTP client cannot be created, or
    /// `Error::Config` if the user agent pool is empty
    pub fn new(base_url: &str, config: &FetcherConfig) -> Result<Self> {
        let user_agents: Vec<String> = config
            .user_agents
            .iter()
            .map(|ua| ua.trim().to_string())
            .filter(|ua| !ua.is_empty())
            .collect();
        if user_agents.is_empty() {
            return Err(Error::config("user agent pool must not be empty"));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .gzip(true)
            .cookie_store(true)
            .build()?;

        let pool_size = config.pool_size.max(1);
        let (delay_min, delay_max) = config.delay_range();

        Ok(Self {
            client,
            pool: Semaphore::new(pool_size),
            pool_size,
            user_agents,
            delay_min,
            delay_max,
            retry: RetryConfig::with_delays(
                config.max_retries,
                config.retry_base_delay_ms,
                config.retry_max_delay_ms,
            ),
            base_url: base_url.to_string(),
        })
    }

    /// Site root this fetcher targets
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Maximum number of in-flight requests
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Fetch one listing page
    ///
    /// Waits for a pool slot, sleeps a random delay, then requests the page,
    /// retrying recoverable failures with exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns the last `FetchError` once retries are exhausted, or the first
    /// non-recoverable one
    pub async fn fetch(&self, page: u32) -> std::result::Result<String, FetchError> {
        let Ok(_permit) = self.pool.acquire().await else {
            return Err(FetchError::PoolClosed { page });
        };

        let delay = self.random_delay();
        tracing::debug!(page, delay_ms = delay.as_millis() as u64, "Waiting before request");
        tokio::time::sleep(delay).await;

        let url = listing_page_url(&self.base_url, page);
        with_retry_if(
            &self.retry,
            |attempt| self.fetch_once(page, &url, attempt),
            FetchError::is_recoverable,
        )
        .await
    }

    /// Issue a single GET for `url`
    async fn fetch_once(
        &self,
        page: u32,
        url: &str,
        attempt: u32,
    ) -> std::result::Result<String, FetchError> {
        let user_agent = self.random_user_agent();
        let referer = listing_page_url(&self.base_url, 1);
        let headers = build_browser_headers(user_agent, Some(&referer));

        tracing::debug!(page, attempt, url = %url, user_agent, "Fetching listing page");

        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(page, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                page,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout { page }
            } else {
                FetchError::Body {
                    page,
                    message: e.to_string(),
                }
            }
        })?;

        tracing::debug!(page, bytes = body.len(), "Fetched listing page");
        Ok(body)
    }

    /// Get a random user agent from the pool
    fn random_user_agent(&self) -> &str {
        let mut rng = rand::thread_rng();
        self.user_agents
            .choose(&mut rng)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Draw a delay uniformly from `[delay_min, delay_max]`
    fn random_delay(&self) -> Duration {
        if self.delay_max <= self.delay_min {
            return self.delay_min;
        }
        let secs = rand::thread_rng()
            .gen_range(self.delay_min.as_secs_f64()..=self.delay_max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch_page(&self, page: u32) -> std::result::Result<String, FetchError> {
        self.fetch(page).await
    }
}
