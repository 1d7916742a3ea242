//! Common test utilities

use tcscrape::config::FetcherConfig;

/// Listing page with three cards; the second one has no author
pub const LISTING_THREE_CARDS: &str = r#"<!DOCTYPE html>
<html>
<head><title>TechCrunch | Startup and Technology News</title></head>
<body>
  <ul class="wp-block-post-template">
    <li>
      <div class="loop-card__content">
        <a class="loop-card__title-link" href="https://techcrunch.com/2024/03/02/ai-chip-startup-raises/">
          AI chip startup raises $100M
        </a>
        <div class="loop-card__meta">
          <a class="loop-card__author" href="/author/kyle/">Kyle Wiggers</a>
          <time datetime="2024-03-02T14:30:00-08:00">4 hours ago</time>
        </div>
      </div>
    </li>
    <li>
      <div class="loop-card__content">
        <a class="loop-card__title-link" href="/2024/03/01/fintech-layoffs/">Fintech   layoffs continue</a>
        <div class="loop-card__meta">
          <time datetime="2024-03-01T09:05:00Z">1 day ago</time>
        </div>
      </div>
    </li>
    <li>
      <div class="loop-card__content">
        <a class="loop-card__title-link" href="/2024/02/28/ev-maker/">EV maker &amp; partners expand</a>
        <div class="loop-card__meta">
          <a class="loop-card__author" href="/author/rebecca/">Rebecca Bellan</a>
          <time datetime="2024-02-28T18:00:00Z">3 days ago</time>
        </div>
      </div>
    </li>
  </ul>
</body>
</html>"#;

/// Card whose title and author contain inline markup
#[allow(dead_code)]
pub const LISTING_INLINE_MARKUP: &str = r#"<html><body>
  <div class="loop-card__content">
    <a class="loop-card__title-link" href="/2024/04/10/openai-model/">Open<em>AI</em>&#8217;s <strong>new</strong> model</a>
    <a class="loop-card__author" href="/author/ana/">Ana <span>Lopez</span></a>
    <time datetime="2024-04-10T12:00:00Z">today</time>
  </div>
</body></html>"#;

/// Listing page without any article card
#[allow(dead_code)]
pub const LISTING_EMPTY: &str =
    r#"<html><body><main><p>Nothing to see here.</p></main></body></html>"#;

/// Build a listing page with one card per title
#[allow(dead_code)]
pub fn listing_with_titles(titles: &[&str]) -> String {
    let cards: String = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            format!(
                r#"<div class="loop-card__content">
  <a class="loop-card__title-link" href="/story-{i}/">{title}</a>
  <a class="loop-card__author" href="/author/a/">Author {i}</a>
  <time datetime="2024-01-{:02}T10:00:00Z">{i} days ago</time>
</div>"#,
                i + 1
            )
        })
        .collect();
    format!("<html><body>{cards}</body></html>")
}

/// Fetcher settings for tests: no pre-request delay, fast retries
#[allow(dead_code)]
pub fn fast_fetcher_config(max_retries: u32) -> FetcherConfig {
    FetcherConfig {
        pool_size: 4,
        delay_min_secs: 0.0,
        delay_max_secs: 0.0,
        request_timeout_secs: 2,
        max_retries,
        retry_base_delay_ms: 10,
        retry_max_delay_ms: 50,
        ..Default::default()
    }
}
