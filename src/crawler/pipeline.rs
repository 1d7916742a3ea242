//! Scrape orchestration
//!
//! Drives pages `1..=max_pages` through fetch → parse → merge. Fetches run
//! concurrently up to the configured bound, while parsing and merging happen
//! one page at a time in ascending page order:
//!
//! ```text
//!  page 1 ─┐                        ┌─ parse ─ dedupe ─ append
//!  page 2 ─┼─ fetch (≤ N in flight) ┼─ parse ─ dedupe ─ append   (page order)
//!  page 3 ─┘                        └─ parse ─ dedupe ─ append
//! ```
//!
//! A page whose fetch fails is recorded in the run stats and skipped; the run
//! always continues with the next page.
//!
//! # Example
//!
//! ```no_run
//! use tcscrape::config::Config;
//! use tcscrape::crawler::{PageFetcher, ScrapePipeline};
//! use tcscrape::parser::ArticleParser;
//!
//! # async fn example() -> tcscrape::error::Result<()> {
//! let config = Config::default();
//! let fetcher = PageFetcher::from_config(&config)?;
//! let parser = ArticleParser::new(&config.site.base_url, &config.site.source_name)?;
//!
//! let output = ScrapePipeline::new(fetcher, parser).run(5).await;
//! println!("{} articles, {} errors", output.articles.len(), output.stats.error_count());
//! # Ok(())
//! # }
//! ```

use futures::stream::{self, StreamExt};
use std::collections::HashSet;

use crate::crawler::PageSource;
use crate::error::ClassifiedError;
use crate::models::{Article, ScrapeRunStats};
use crate::parser::ArticleParser;
use crate::utils::truncate_text;

/// Default number of concurrent page fetches
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Result of a run
#[derive(Debug)]
pub struct ScrapeOutput {
    /// Accepted articles, first-seen order across ascending pages
    pub articles: Vec<Article>,

    /// Counters and end-of-run analytics
    pub stats: ScrapeRunStats,
}

/// Where a page ended up after merging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageOutcome {
    Merged { accepted: usize, duplicates: usize },
    Failed,
    Discarded,
}

/// Accumulator touched only by the merging task
struct MergeState {
    articles: Vec<Article>,
    seen: HashSet<String>,
    stats: ScrapeRunStats,
    listing_ended: bool,
}

/// Fetch → parse → dedupe pipeline over a [`PageSource`]
pub struct ScrapePipeline<S> {
    source: S,
    parser: ArticleParser,
    concurrency: usize,
    stop_on_empty_page: bool,
}

impl<S: PageSource> ScrapePipeline<S> {
    /// Create a pipeline with default concurrency
    pub fn new(source: S, parser: ArticleParser) -> Self {
        Self {
            source,
            parser,
            concurrency: DEFAULT_CONCURRENCY,
            stop_on_empty_page: false,
        }
    }

    /// Set the maximum number of pages fetched at once
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Discard pages that come after the first fetched page without articles
    #[must_use]
    pub fn stop_on_empty_page(mut self, enabled: bool) -> Self {
        self.stop_on_empty_page = enabled;
        self
    }

    /// Run pages `1..=max_pages`
    ///
    /// Never fails: fetch errors are recorded in the returned stats.
    pub async fn run(&self, max_pages: u32) -> ScrapeOutput {
        tracing::info!(
            max_pages,
            concurrency = self.concurrency,
            "Starting scrape run"
        );

        let mut state = MergeState {
            articles: Vec::new(),
            seen: HashSet::new(),
            stats: ScrapeRunStats::new(),
            listing_ended: false,
        };

        // `buffered` yields in input order, whatever order fetches finish in
        let mut fetched = stream::iter(1..=max_pages)
            .map(|page| async move { (page, self.source.fetch_page(page).await) })
            .buffered(self.concurrency);

        while let Some((page, result)) = fetched.next().await {
            let outcome = match result {
                Ok(html) => self.merge_page(&mut state, page, &html),
                Err(e) => {
                    tracing::warn!(
                        page,
                        category = %e.category(),
                        error = %e,
                        "Failed to fetch listing page"
                    );
                    state.stats.record_error(page, e.to_string());
                    PageOutcome::Failed
                }
            };
            tracing::trace!(page, ?outcome, "Page done");
        }

        let MergeState {
            articles,
            mut stats,
            ..
        } = state;
        stats.compute_analytics(&articles);

        tracing::info!(
            articles = articles.len(),
            pages_attempted = stats.pages_attempted,
            pages_succeeded = stats.pages_succeeded,
            duplicates = stats.duplicates,
            errors = stats.error_count(),
            "Scrape run finished"
        );

        ScrapeOutput { articles, stats }
    }

    /// Parse one fetched page and merge its articles in card order
    fn merge_page(&self, state: &mut MergeState, page: u32, html: &str) -> PageOutcome {
        let parsed = self.parser.parse_page(html);
        state.stats.record_page(parsed.cards);

        if state.listing_ended {
            tracing::debug!(page, cards = parsed.cards, "Discarding page past end of listing");
            return PageOutcome::Discarded;
        }

        if parsed.cards == 0 {
            tracing::info!(page, "No article cards found on page");
            if self.stop_on_empty_page {
                tracing::info!(page, "Listing ended, later pages will be discarded");
                state.listing_ended = true;
                state.stats.listing_ended_at = Some(page);
            }
            return PageOutcome::Merged {
                accepted: 0,
                duplicates: 0,
            };
        }

        let mut accepted = 0;
        let mut duplicates = 0;
        for article in parsed.articles {
            if state.seen.insert(article.hash.clone()) {
                state.stats.record_accepted();
                state.articles.push(article);
                accepted += 1;
            } else {
                tracing::debug!(
                    page,
                    title = %truncate_text(&article.title, 60),
                    "Dropping duplicate article"
                );
                state.stats.record_duplicate();
                duplicates += 1;
            }
        }

        tracing::info!(page, accepted, duplicates, "Merged listing page");
        PageOutcome::Merged {
            accepted,
            duplicates,
        }
    }
}
