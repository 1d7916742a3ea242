//! Configuration management for the tcscrape pipeline
//!
//! Configuration is layered: built-in defaults, then an optional TOML file or
//! `TCSCRAPE_*` environment variables, then command-line overrides applied by
//! the binary. [`Config::validate`] runs before any network traffic.

use crate::crawler::pipeline::DEFAULT_CONCURRENCY;
use crate::error::{Error, Result};
use crate::report::DEFAULT_TOP_AUTHORS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound for either pre-request delay bound, in seconds
pub const MAX_DELAY_SECS: f64 = 3600.0;

/// Browser user agents rotated per request
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (iPad; CPU OS 14_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run shape
    pub scrape: ScrapeConfig,

    /// Target site
    pub site: SiteConfig,

    /// HTTP fetcher settings
    pub fetcher: FetcherConfig,

    /// CSV and report output
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Run shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Number of listing pages to visit, starting at 1
    pub max_pages: u32,

    /// Discard pages after the first fetched page without any cards
    pub stop_on_empty_page: bool,
}

/// Target site
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site root; page 1 is served here
    pub base_url: String,

    /// Value written to every article's `source` column
    pub source_name: String,
}

/// HTTP fetcher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Maximum number of in-flight requests
    pub pool_size: usize,

    /// Lower bound of the randomized pre-request delay, in seconds
    pub delay_min_secs: f64,

    /// Upper bound of the randomized pre-request delay, in seconds
    pub delay_max_secs: f64,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Retries after the first attempt for recoverable failures
    pub max_retries: u32,

    /// Base backoff delay in milliseconds
    pub retry_base_delay_ms: u64,

    /// Backoff ceiling in milliseconds
    pub retry_max_delay_ms: u64,

    /// User agent pool
    pub user_agents: Vec<String>,
}

/// CSV and report output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV destination
    pub path: PathBuf,

    /// Print the run report after export
    pub report: bool,

    /// Number of authors listed in the report
    pub top_authors: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (DEBUG, INFO, WARNING, ERROR)
    pub level: String,

    /// Log format (text, json)
    pub format: String,

    /// Optional log file, appended to
    pub file: Option<PathBuf>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_pages: 5,
            stop_on_empty_page: false,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://techcrunch.com"),
            source_name: String::from("TechCrunch"),
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_CONCURRENCY,
            delay_min_secs: 1.0,
            delay_max_secs: 3.0,
            request_timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 1000,
            retry_max_delay_ms: 30_000,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("techcrunch_articles.csv"),
            report: true,
            top_authors: DEFAULT_TOP_AUTHORS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("INFO"),
            format: String::from("text"),
            file: None,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparseable variables fall back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(pages) = env_parse("TCSCRAPE_PAGES") {
            config.scrape.max_pages = pages;
        }
        if let Some(stop) = env_parse("TCSCRAPE_STOP_ON_EMPTY") {
            config.scrape.stop_on_empty_page = stop;
        }
        if let Ok(base_url) = std::env::var("TCSCRAPE_BASE_URL") {
            config.site.base_url = base_url;
        }
        if let Some(pool_size) = env_parse("TCSCRAPE_POOL_SIZE") {
            config.fetcher.pool_size = pool_size;
        }
        if let Some(delay_min) = env_parse("TCSCRAPE_DELAY_MIN") {
            config.fetcher.delay_min_secs = delay_min;
        }
        if let Some(delay_max) = env_parse("TCSCRAPE_DELAY_MAX") {
            config.fetcher.delay_max_secs = delay_max;
        }
        if let Some(timeout) = env_parse("TCSCRAPE_REQUEST_TIMEOUT") {
            config.fetcher.request_timeout_secs = timeout;
        }
        if let Some(retries) = env_parse("TCSCRAPE_MAX_RETRIES") {
            config.fetcher.max_retries = retries;
        }
        if let Ok(output) = std::env::var("TCSCRAPE_OUTPUT") {
            config.output.path = PathBuf::from(output);
        }
        if let Ok(level) = std::env::var("TCSCRAPE_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("TCSCRAPE_LOG_FORMAT") {
            config.logging.format = format;
        }
        if let Ok(file) = std::env::var("TCSCRAPE_LOG_FILE") {
            config.logging.file = Some(PathBuf::from(file));
        }

        config
    }

    /// Load configuration from a TOML file
    ///
    /// Sections and keys missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::with_source(format!("Failed to read config file: {}", path.display()), e)
        })?;

        Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("invalid TOML: {e}")))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.scrape.max_pages == 0 {
            return Err(Error::config("max_pages must be greater than 0"));
        }

        if self.fetcher.pool_size == 0 {
            return Err(Error::config("pool_size must be greater than 0"));
        }

        let (min, max) = (self.fetcher.delay_min_secs, self.fetcher.delay_max_secs);
        if !min.is_finite() || !max.is_finite() || min < 0.0 {
            return Err(Error::config("delay bounds must be finite and non-negative"));
        }
        if max < min {
            return Err(Error::config(format!(
                "delay_max ({max}) must not be smaller than delay_min ({min})"
            )));
        }
        if max > MAX_DELAY_SECS {
            return Err(Error::config(format!(
                "delay_max ({max}) must not exceed {MAX_DELAY_SECS} seconds"
            )));
        }

        if self.fetcher.request_timeout_secs == 0 {
            return Err(Error::config("request_timeout_secs must be greater than 0"));
        }

        if self.fetcher.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            return Err(Error::config("user agent pool must not be empty"));
        }

        url::Url::parse(&self.site.base_url)
            .map_err(|e| Error::config(format!("invalid base_url {}: {e}", self.site.base_url)))?;

        Ok(())
    }
}

impl FetcherConfig {
    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Pre-request delay bounds as Durations
    ///
    /// Negative or non-finite bounds count as zero, bounds are capped at
    /// [`MAX_DELAY_SECS`] and `max` is never below `min`.
    #[must_use]
    pub fn delay_range(&self) -> (Duration, Duration) {
        let min = secs(self.delay_min_secs);
        (min, secs(self.delay_max_secs).max(min))
    }
}

fn secs(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::try_from_secs_f64(value.min(MAX_DELAY_SECS)).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}
