//! Parser integration tests against listing page fixtures

mod common;

use tcscrape::parser::{extract_cards, ArticleParser};
use tcscrape::utils::title_hash;

use common::{listing_with_titles, LISTING_EMPTY, LISTING_INLINE_MARKUP, LISTING_THREE_CARDS};

fn parser() -> ArticleParser {
    ArticleParser::new("https://techcrunch.com", "TechCrunch").unwrap()
}

#[test]
fn test_three_cards_one_without_author() {
    let articles = parser().parse(LISTING_THREE_CARDS);

    assert_eq!(articles.len(), 3);
    assert_eq!(articles[0].author, "Kyle Wiggers");
    assert_eq!(articles[1].author, "");
    assert_eq!(articles[2].author, "Rebecca Bellan");

    for article in &articles {
        assert!(!article.title.is_empty());
        assert_eq!(article.hash, title_hash(&article.title));
        assert_eq!(article.source, "TechCrunch");
        assert!(article.category.is_none());
        assert!(article.excerpt.is_none());
    }
}

#[test]
fn test_fields_are_cleaned_and_normalized() {
    let articles = parser().parse(LISTING_THREE_CARDS);

    assert_eq!(articles[0].title, "AI chip startup raises $100M");
    assert_eq!(
        articles[0].url,
        "https://techcrunch.com/2024/03/02/ai-chip-startup-raises/"
    );
    // Wall-clock time in the given offset
    assert_eq!(articles[0].publish_time, "2024-03-02 14:30");

    assert_eq!(articles[1].title, "Fintech layoffs continue");
    assert_eq!(
        articles[1].url,
        "https://techcrunch.com/2024/03/01/fintech-layoffs/"
    );
    assert_eq!(articles[1].publish_time, "2024-03-01 09:05");

    assert_eq!(articles[2].title, "EV maker & partners expand");
}

#[test]
fn test_inline_markup_keeps_title_text() {
    let articles = parser().parse(LISTING_INLINE_MARKUP);

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "OpenAI\u{2019}s new model");
    assert_eq!(articles[0].author, "Ana Lopez");
    assert_eq!(articles[0].hash, title_hash("OpenAI\u{2019}s new model"));
}

#[test]
fn test_parse_page_counts_cards() {
    let page = parser().parse_page(LISTING_THREE_CARDS);
    assert_eq!(page.cards, 3);
    assert_eq!(page.articles.len(), 3);

    let page = parser().parse_page(LISTING_EMPTY);
    assert_eq!(page.cards, 0);
    assert!(page.articles.is_empty());
}

#[test]
fn test_card_without_title_is_skipped() {
    let html = r#"<html><body>
        <div class="loop-card__content"><a class="loop-card__author">No Title</a></div>
        <div class="loop-card__content"><a class="loop-card__title-link" href="/x/">   </a></div>
        <div class="loop-card__content"><a class="loop-card__title-link" href="/y/">Kept</a></div>
    </body></html>"#;

    let page = parser().parse_page(html);
    assert_eq!(page.cards, 3);
    assert_eq!(page.articles.len(), 1);
    assert_eq!(page.articles[0].title, "Kept");
}

#[test]
fn test_unparseable_time_is_empty() {
    let html = r#"<div class="loop-card__content">
        <a class="loop-card__title-link" href="/z/">Title</a>
        <time datetime="sometime last week">last week</time>
    </div>"#;

    let articles = parser().parse(html);
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].publish_time, "");
}

#[test]
fn test_card_order_is_document_order() {
    let html = listing_with_titles(&["First", "Second", "Third"]);
    let titles: Vec<_> = extract_cards(&html)
        .into_iter()
        .filter_map(|card| card.title)
        .collect();

    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[test]
fn test_non_listing_markup() {
    assert!(parser().parse("").is_empty());
    assert!(parser().parse("<not really html").is_empty());
}
