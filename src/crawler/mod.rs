//! Listing page crawling
//!
//! This module implements fetching of paginated listing pages and the
//! fetch → parse → dedupe pipeline that drives a run.

pub mod fetcher;
pub mod headers;
pub mod pipeline;
pub mod url;

pub use fetcher::PageFetcher;
pub use pipeline::{ScrapeOutput, ScrapePipeline};

use async_trait::async_trait;

use crate::utils::error::FetchError;

/// Source of listing page HTML
///
/// [`PageFetcher`] is the HTTP implementation; tests substitute canned pages
/// with simulated latency and failures.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the HTML of listing page `page` (1-based)
    async fn fetch_page(&self, page: u32) -> Result<String, FetchError>;
}
