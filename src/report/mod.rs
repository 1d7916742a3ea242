//! End-of-run report
//!
//! A plain text block printed to stdout after the CSV export. It is meant for
//! people; nothing parses it.

use std::fmt;

use crate::models::{Article, ScrapeRunStats};

const RULE_WIDTH: usize = 50;

/// Default number of authors listed
pub const DEFAULT_TOP_AUTHORS: usize = 3;

/// Report over one finished run
///
/// `stats` must have had [`ScrapeRunStats::compute_analytics`] applied.
pub struct RunReport<'a> {
    articles: &'a [Article],
    stats: &'a ScrapeRunStats,
    top_authors: usize,
}

impl<'a> RunReport<'a> {
    pub fn new(articles: &'a [Article], stats: &'a ScrapeRunStats, top_authors: usize) -> Self {
        Self {
            articles,
            stats,
            top_authors,
        }
    }
}

impl fmt::Display for RunReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        let stats = self.stats;

        writeln!(f, "{rule}")?;
        writeln!(f, "SCRAPING REPORT")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Total articles scraped: {}", self.articles.len())?;
        writeln!(f, "Pages attempted: {}", stats.pages_attempted)?;
        writeln!(f, "Pages succeeded: {}", stats.pages_succeeded)?;
        writeln!(f, "Duplicates dropped: {}", stats.duplicates)?;
        writeln!(f, "Errors encountered: {}", stats.error_count())?;

        if !stats.errors.is_empty() {
            writeln!(f)?;
            writeln!(f, "Errors:")?;
            for error in &stats.errors {
                writeln!(f, "  - {}", error.message)?;
            }
        }

        if let Some(page) = stats.listing_ended_at {
            writeln!(f)?;
            writeln!(f, "Listing ended at page {page}")?;
        }

        if stats.latest.is_some() || stats.oldest.is_some() {
            writeln!(f)?;
        }
        if let Some(latest) = &stats.latest {
            writeln!(
                f,
                "Latest article: {} ({})",
                latest.title, latest.publish_time
            )?;
        }
        if let Some(oldest) = &stats.oldest {
            writeln!(
                f,
                "Oldest article: {} ({})",
                oldest.title, oldest.publish_time
            )?;
        }

        let top: Vec<_> = stats
            .author_ranking
            .iter()
            .take(self.top_authors)
            .collect();
        if !top.is_empty() {
            writeln!(f)?;
            writeln!(f, "Top authors:")?;
            for entry in top {
                let noun = if entry.count == 1 { "article" } else { "articles" };
                writeln!(f, "  - {}: {} {noun}", entry.author, entry.count)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Duration: {:.2}s", stats.duration_secs())?;
        write!(f, "{rule}")
    }
}

/// Render the report as text
pub fn render_report(articles: &[Article], stats: &ScrapeRunStats, top_authors: usize) -> String {
    RunReport::new(articles, stats, top_authors).to_string()
}

/// Print the report to stdout
pub fn print_report(articles: &[Article], stats: &ScrapeRunStats, top_authors: usize) {
    println!();
    println!("{}", RunReport::new(articles, stats, top_authors));

    tracing::info!(
        articles = articles.len(),
        pages_attempted = stats.pages_attempted,
        errors = stats.error_count(),
        "Report printed"
    );
}
