//! tcscrape - TechCrunch listing scraper
//!
//! Fetches paginated article listings, extracts article metadata from each
//! card, drops duplicates by title hash and exports the result to CSV with a
//! short run report.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Page fetching and the scrape pipeline
//! - [`parser`] - HTML parsing and data extraction
//! - [`models`] - Core data structures and run statistics
//! - [`storage`] - CSV export
//! - [`report`] - End-of-run report
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use tcscrape::config::Config;
//! use tcscrape::crawler::{PageFetcher, ScrapePipeline};
//! use tcscrape::parser::ArticleParser;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let fetcher = PageFetcher::from_config(&config)?;
//!     let parser = ArticleParser::new(&config.site.base_url, &config.site.source_name)?;
//!
//!     let output = ScrapePipeline::new(fetcher, parser)
//!         .run(config.scrape.max_pages)
//!         .await;
//!     tcscrape::storage::export_csv(&output.articles, &config.output.path)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod parser;
pub mod report;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::{PageFetcher, PageSource, ScrapeOutput, ScrapePipeline};
    pub use crate::error::{ClassifiedError, Error, ErrorCategory, Result};
    pub use crate::models::{Article, ScrapeRunStats};
    pub use crate::parser::ArticleParser;
    pub use crate::storage::export_csv;
}

// Direct re-exports for convenience
pub use models::{Article, ScrapeRunStats};
