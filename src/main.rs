use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tcscrape::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "tcscrape",
    version,
    about = "TechCrunch news listing scraper with CSV export",
    long_about = None
)]
struct Cli {
    /// Number of listing pages to scrape [default: 5]
    #[arg(short, long)]
    pages: Option<u32>,

    /// Output CSV file [default: techcrunch_articles.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Minimum delay between requests in seconds [default: 1.0]
    #[arg(long)]
    delay_min: Option<f64>,

    /// Maximum delay between requests in seconds [default: 3.0]
    #[arg(long)]
    delay_max: Option<f64>,

    /// Log level [default: INFO]
    #[arg(short, long, value_enum, ignore_case = true)]
    log_level: Option<LogLevel>,

    /// Also append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Console log format [default: text]
    #[arg(long, value_enum, ignore_case = true)]
    log_format: Option<LogFormat>,

    /// Skip the end-of-run report
    #[arg(long)]
    no_report: bool,

    /// TOML configuration file (replaces TCSCRAPE_* environment variables)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum concurrent requests [default: 10]
    #[arg(long)]
    pool_size: Option<usize>,

    /// Request timeout in seconds [default: 30]
    #[arg(long)]
    timeout: Option<u64>,

    /// Retries per page on recoverable failures [default: 3]
    #[arg(long)]
    max_retries: Option<u32>,

    /// Site root to scrape [default: https://techcrunch.com]
    #[arg(long)]
    base_url: Option<String>,

    /// Discard pages after the first page without article cards
    #[arg(long)]
    stop_on_empty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING", alias = "WARN")]
    Warning,
    #[value(name = "ERROR")]
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Default filter: our crate at the chosen level, dependencies at warn
    fn filter_directive(self) -> &'static str {
        match self {
            Self::Debug => "tcscrape=debug,warn",
            Self::Info => "tcscrape=info,warn",
            Self::Warning => "tcscrape=warn,warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl Cli {
    /// Layer command-line flags over `config`
    fn apply(&self, config: &mut Config) {
        if let Some(pages) = self.pages {
            config.scrape.max_pages = pages;
        }
        if self.stop_on_empty {
            config.scrape.stop_on_empty_page = true;
        }
        if let Some(base_url) = &self.base_url {
            config.site.base_url = base_url.clone();
        }
        if let Some(delay_min) = self.delay_min {
            config.fetcher.delay_min_secs = delay_min;
        }
        if let Some(delay_max) = self.delay_max {
            config.fetcher.delay_max_secs = delay_max;
        }
        if let Some(pool_size) = self.pool_size {
            config.fetcher.pool_size = pool_size;
        }
        if let Some(timeout) = self.timeout {
            config.fetcher.request_timeout_secs = timeout;
        }
        if let Some(max_retries) = self.max_retries {
            config.fetcher.max_retries = max_retries;
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if self.no_report {
            config.output.report = false;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level.as_str().to_string();
        }
        if let Some(format) = self.log_format {
            config.logging.format = format.as_str().to_string();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::from_env(),
    };
    cli.apply(&mut config);

    let level = LogLevel::from_str(&config.logging.level, true)
        .map_err(|e| anyhow::anyhow!("invalid log level: {e}"))?;
    let format = LogFormat::from_str(&config.logging.format, true)
        .map_err(|e| anyhow::anyhow!("invalid log format: {e}"))?;

    // Initialize tracing/logging
    setup_tracing(level, format, config.logging.file.as_deref())?;

    tracing::info!("tcscrape starting");

    commands::scrape(config).await?;

    tracing::info!("tcscrape completed successfully");
    Ok(())
}

/// Install the global subscriber
///
/// Console output goes to stderr. `RUST_LOG`, when set, replaces the
/// level-derived filter.
fn setup_tracing(level: LogLevel, format: LogFormat, log_file: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.filter_directive()));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory {}", parent.display())
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        }
        None => None,
    };

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    }
    .context("Failed to initialize logging")
}
