// Core data structures for the tcscrape pipeline

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::title_hash;

/// Format of `Article::publish_time`
pub const PUBLISH_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format of `Article::scraped_at`
pub const SCRAPED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One article extracted from a listing card
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub source: String,
    pub title: String,
    pub url: String,
    /// Empty when the card has no author
    pub author: String,
    /// `YYYY-MM-DD HH:MM`, or empty when unparseable
    pub publish_time: String,
    /// Dedup key derived from `title`
    pub hash: String,
    /// Reserved, always empty
    pub category: Option<String>,
    /// Reserved, always empty
    pub excerpt: Option<String>,
    pub scraped_at: String,
}

impl Article {
    /// Create an article, deriving `hash` from the title and stamping `scraped_at`
    ///
    /// `title` must already be normalized.
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        author: impl Into<String>,
        publish_time: impl Into<String>,
    ) -> Self {
        let title = title.into();
        Self {
            source: source.into(),
            hash: title_hash(&title),
            title,
            url: url.into(),
            author: author.into(),
            publish_time: publish_time.into(),
            category: None,
            excerpt: None,
            scraped_at: Local::now().format(SCRAPED_AT_FORMAT).to_string(),
        }
    }

    /// Whether the article carries a usable publish time
    pub fn has_publish_time(&self) -> bool {
        !self.publish_time.is_empty()
    }
}

/// A page that failed to fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageError {
    pub page: u32,
    pub message: String,
}

/// Article count for one author
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    pub author: String,
    pub count: usize,
}

/// Title and publish time of an article picked by the analytics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedTitle {
    pub title: String,
    pub publish_time: String,
}

impl From<&Article> for DatedTitle {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            publish_time: article.publish_time.clone(),
        }
    }
}

/// Statistics for one scrape run
///
/// Counters are updated while pages are merged; the analytics fields are
/// filled once by [`ScrapeRunStats::compute_analytics`] at the end of the run.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeRunStats {
    pub pages_attempted: u32,
    pub pages_succeeded: u32,
    pub cards_found: usize,
    pub articles_accepted: usize,
    pub duplicates: usize,
    pub errors: Vec<PageError>,
    /// Page where the listing ended, when end-of-listing detection is on
    pub listing_ended_at: Option<u32>,

    pub author_ranking: Vec<AuthorCount>,
    pub latest: Option<DatedTitle>,
    pub oldest: Option<DatedTitle>,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Default for ScrapeRunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrapeRunStats {
    /// Create stats for a run starting now
    pub fn new() -> Self {
        Self {
            pages_attempted: 0,
            pages_succeeded: 0,
            cards_found: 0,
            articles_accepted: 0,
            duplicates: 0,
            errors: Vec::new(),
            listing_ended_at: None,
            author_ranking: Vec::new(),
            latest: None,
            oldest: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Record a page that was fetched and parsed
    pub fn record_page(&mut self, cards: usize) {
        self.pages_attempted += 1;
        self.pages_succeeded += 1;
        self.cards_found += cards;
    }

    /// Record a page that failed to fetch
    pub fn record_error(&mut self, page: u32, message: impl Into<String>) {
        self.pages_attempted += 1;
        self.errors.push(PageError {
            page,
            message: message.into(),
        });
    }

    pub fn record_accepted(&mut self) {
        self.articles_accepted += 1;
    }

    pub fn record_duplicate(&mut self) {
        self.duplicates += 1;
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Duration of the run in seconds (up to now if still running)
    pub fn duration_secs(&self) -> f64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_milliseconds().max(0) as f64 / 1000.0
    }

    /// Derive author ranking and publish-time extremes, and close the run
    ///
    /// Authors are ranked by article count; ties keep first-seen order and
    /// empty authors are left out. Articles without a publish time take no
    /// part in the latest/oldest selection; on equal times the first-seen
    /// article wins.
    pub fn compute_analytics(&mut self, articles: &[Article]) {
        self.author_ranking = rank_authors(articles);

        let mut latest: Option<&Article> = None;
        let mut oldest: Option<&Article> = None;
        for article in articles.iter().filter(|a| a.has_publish_time()) {
            if latest.map_or(true, |l| article.publish_time > l.publish_time) {
                latest = Some(article);
            }
            if oldest.map_or(true, |o| article.publish_time < o.publish_time) {
                oldest = Some(article);
            }
        }
        self.latest = latest.map(DatedTitle::from);
        self.oldest = oldest.map(DatedTitle::from);

        self.finished_at = Some(Utc::now());
    }
}

fn rank_authors(articles: &[Article]) -> Vec<AuthorCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut ranking: Vec<AuthorCount> = Vec::new();

    for article in articles.iter().filter(|a| !a.author.is_empty()) {
        match index.get(article.author.as_str()) {
            Some(&i) => ranking[i].count += 1,
            None => {
                index.insert(&article.author, ranking.len());
                ranking.push(AuthorCount {
                    author: article.author.clone(),
                    count: 1,
                });
            }
        }
    }

    // stable: equal counts stay in first-seen order
    ranking.sort_by(|a, b| b.count.cmp(&a.count));
    ranking
}
