//! Scrape pipeline tests
//!
//! The pipeline is driven by an in-memory page source with simulated latency
//! and failures, plus one end-to-end run against a wiremock server.

mod common;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tcscrape::crawler::{PageFetcher, PageSource, ScrapePipeline};
use tcscrape::error::FetchError;
use tcscrape::parser::ArticleParser;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{fast_fetcher_config, listing_with_titles, LISTING_EMPTY};

/// Page source with canned pages, per-page latency and failing pages
#[derive(Default)]
struct FakeSource {
    pages: HashMap<u32, String>,
    latency: HashMap<u32, Duration>,
    in_flight: Arc<AtomicU32>,
    max_in_flight: Arc<AtomicU32>,
}

impl FakeSource {
    fn with_page(mut self, page: u32, html: String) -> Self {
        self.pages.insert(page, html);
        self
    }

    fn with_latency(mut self, page: u32, latency: Duration) -> Self {
        self.latency.insert(page, latency);
        self
    }
}

#[async_trait]
impl PageSource for FakeSource {
    async fn fetch_page(&self, page: u32) -> Result<String, FetchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = self.latency.get(&page) {
            tokio::time::sleep(*latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.pages
            .get(&page)
            .cloned()
            .ok_or(FetchError::Status { page, status: 500 })
    }
}

fn parser() -> ArticleParser {
    ArticleParser::new("https://techcrunch.com", "TechCrunch").unwrap()
}

fn titles(articles: &[tcscrape::Article]) -> Vec<&str> {
    articles.iter().map(|a| a.title.as_str()).collect()
}

/// Page 2 of 5 fails; everything else is kept and the failure is counted
#[tokio::test]
async fn test_failed_page_does_not_abort_run() {
    let source = FakeSource::default()
        .with_page(1, listing_with_titles(&["p1a", "p1b"]))
        .with_page(3, listing_with_titles(&["p3a"]))
        .with_page(4, listing_with_titles(&["p4a"]))
        .with_page(5, listing_with_titles(&["p5a", "p5b"]));

    let output = ScrapePipeline::new(source, parser()).run(5).await;

    assert_eq!(titles(&output.articles), vec!["p1a", "p1b", "p3a", "p4a", "p5a", "p5b"]);
    assert_eq!(output.stats.pages_attempted, 5);
    assert_eq!(output.stats.pages_succeeded, 4);
    assert_eq!(output.stats.error_count(), 1);
    assert_eq!(output.stats.errors[0].page, 2);
    assert!(output.stats.errors[0].message.contains("500"));
}

/// The same headline on two pages is kept once
#[tokio::test]
async fn test_duplicate_headline_across_pages() {
    let source = FakeSource::default()
        .with_page(1, listing_with_titles(&["Same Headline", "Only on one"]))
        .with_page(2, listing_with_titles(&["Other", "Same Headline"]));

    let output = ScrapePipeline::new(source, parser()).run(2).await;

    let same: Vec<_> = output
        .articles
        .iter()
        .filter(|a| a.title == "Same Headline")
        .collect();
    assert_eq!(same.len(), 1);
    // First occurrence wins, so the page 1 card is kept
    assert!(same[0].url.ends_with("/story-0/"));
    assert_eq!(output.stats.duplicates, 1);
    assert_eq!(output.articles.len(), 3);
}

/// Two identical pages give the same articles as one
#[tokio::test]
async fn test_identical_pages_are_idempotent() {
    let page = listing_with_titles(&["x", "y", "z"]);

    let single = ScrapePipeline::new(FakeSource::default().with_page(1, page.clone()), parser())
        .run(1)
        .await;
    let double = ScrapePipeline::new(
        FakeSource::default()
            .with_page(1, page.clone())
            .with_page(2, page),
        parser(),
    )
    .run(2)
    .await;

    assert_eq!(titles(&single.articles), titles(&double.articles));
    assert_eq!(double.stats.duplicates, 3);
}

/// Output order follows page order, not completion order
#[tokio::test]
async fn test_order_independent_of_latency() {
    let source = FakeSource::default()
        .with_page(1, listing_with_titles(&["one"]))
        .with_page(2, listing_with_titles(&["two"]))
        .with_page(3, listing_with_titles(&["three"]))
        .with_latency(1, Duration::from_millis(120))
        .with_latency(2, Duration::from_millis(60));

    let output = ScrapePipeline::new(source, parser())
        .with_concurrency(3)
        .run(3)
        .await;

    assert_eq!(titles(&output.articles), vec!["one", "two", "three"]);
}

/// No more than `concurrency` fetches are outstanding at once
#[tokio::test]
async fn test_concurrency_bound() {
    let mut source = FakeSource::default();
    for page in 1..=8 {
        source = source
            .with_page(page, listing_with_titles(&[&format!("t{page}")]))
            .with_latency(page, Duration::from_millis(20));
    }
    let max_in_flight = Arc::clone(&source.max_in_flight);

    let output = ScrapePipeline::new(source, parser())
        .with_concurrency(3)
        .run(8)
        .await;

    assert_eq!(output.articles.len(), 8);
    let observed = max_in_flight.load(Ordering::SeqCst);
    assert!(observed <= 3, "observed {observed} concurrent fetches");
    assert!(observed > 1, "fetches should overlap");
}

/// Analytics are computed at the end of the run
#[tokio::test]
async fn test_run_analytics() {
    let source = FakeSource::default()
        .with_page(1, listing_with_titles(&["a", "b"]))
        .with_page(2, listing_with_titles(&["c"]));

    let output = ScrapePipeline::new(source, parser()).run(2).await;
    let stats = &output.stats;

    assert!(stats.finished_at.is_some());
    assert_eq!(stats.latest.as_ref().unwrap().publish_time, "2024-01-02 10:00");
    assert_eq!(stats.oldest.as_ref().unwrap().publish_time, "2024-01-01 10:00");
    // "Author 0" appears on both pages
    assert_eq!(stats.author_ranking[0].author, "Author 0");
    assert_eq!(stats.author_ranking[0].count, 2);
}

/// With end-of-listing detection, pages after an empty one are discarded
#[tokio::test]
async fn test_stop_on_empty_page() {
    let source = FakeSource::default()
        .with_page(1, listing_with_titles(&["kept"]))
        .with_page(2, LISTING_EMPTY.to_string())
        .with_page(3, listing_with_titles(&["discarded"]));

    let output = ScrapePipeline::new(source, parser())
        .stop_on_empty_page(true)
        .run(3)
        .await;

    assert_eq!(titles(&output.articles), vec!["kept"]);
    assert_eq!(output.stats.listing_ended_at, Some(2));
}

/// A source without timers can be driven by a bare executor
#[test]
fn test_run_on_plain_executor() {
    let source = FakeSource::default().with_page(1, listing_with_titles(&["x", "y"]));
    let pipeline = ScrapePipeline::new(source, parser());

    let output = tokio_test::block_on(pipeline.run(1));
    assert_eq!(output.articles.len(), 2);
}

/// Full run over HTTP with one failing page
#[tokio::test]
async fn test_end_to_end_with_mock_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_with_titles(&["Front", "Shared"])),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/3/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_with_titles(&["Shared", "Back"])),
        )
        .mount(&mock_server)
        .await;

    let base = mock_server.uri();
    let fetcher = PageFetcher::new(&base, &fast_fetcher_config(1)).unwrap();
    let parser = ArticleParser::new(&base, "TechCrunch").unwrap();

    let output = ScrapePipeline::new(fetcher, parser)
        .with_concurrency(2)
        .run(3)
        .await;

    assert_eq!(titles(&output.articles), vec!["Front", "Shared", "Back"]);
    assert_eq!(output.articles[0].url, format!("{base}/story-0/"));
    assert_eq!(output.stats.pages_attempted, 3);
    assert_eq!(output.stats.error_count(), 1);
    assert_eq!(output.stats.errors[0].page, 2);
    assert_eq!(output.stats.duplicates, 1);
}
