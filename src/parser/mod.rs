//! HTML parsing and data extraction
//!
//! This module turns one listing page into [`Article`] records. Extraction of
//! raw card fields is isolated in [`html::extract_cards`]; cleaning, URL
//! resolution and time normalization happen in [`ArticleParser::parse_card`].

pub mod datetime;
pub mod html;
pub mod sanitize;
pub mod selectors;

pub use html::{extract_cards, RawCard};

use url::Url;

use crate::error::{Error, Result};
use crate::models::Article;
use crate::utils::error::ParseError;
use datetime::normalize_publish_time;
use sanitize::clean_text;

/// Articles extracted from one page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Card elements found, including skipped ones
    pub cards: usize,
    pub articles: Vec<Article>,
}

/// Parser for listing pages of one site
#[derive(Debug, Clone)]
pub struct ArticleParser {
    /// Base for resolving relative article links
    base_url: Url,

    /// Value of every article's `source` field
    source: String,
}

impl ArticleParser {
    /// Create a parser for the given site
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `base_url` is not an absolute URL
    pub fn new(base_url: &str, source: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::config(format!("invalid base URL {base_url}: {e}")))?;
        Ok(Self {
            base_url,
            source: source.into(),
        })
    }

    /// Parse one listing page
    ///
    /// Cards that cannot be turned into an article are skipped, so the result
    /// may be shorter than the number of cards on the page.
    pub fn parse(&self, html: &str) -> Vec<Article> {
        self.parse_page(html).articles
    }

    /// Parse one listing page, keeping the number of cards seen
    pub fn parse_page(&self, html: &str) -> ParsedPage {
        let cards = extract_cards(html);
        let total = cards.len();

        let articles: Vec<Article> = cards
            .into_iter()
            .enumerate()
            .filter_map(|(i, card)| match self.parse_card(card) {
                Ok(article) => Some(article),
                Err(e) => {
                    tracing::debug!(card = i, error = %e, "Skipping card");
                    None
                }
            })
            .collect();

        tracing::trace!(cards = total, articles = articles.len(), "Parsed listing page");
        ParsedPage {
            cards: total,
            articles,
        }
    }

    /// Turn one raw card into an article
    ///
    /// # Errors
    ///
    /// - `ParseError::MissingTitle` when the card has no title link
    /// - `ParseError::EmptyTitle` when the title is blank after cleaning
    /// - `ParseError::InvalidUrl` when the href cannot be resolved
    pub fn parse_card(&self, card: RawCard) -> std::result::Result<Article, ParseError> {
        let raw_title = card.title.ok_or(ParseError::MissingTitle)?;
        let title = clean_text(&raw_title);
        if title.is_empty() {
            return Err(ParseError::EmptyTitle);
        }

        let url = match card.href.as_deref().map(str::trim) {
            Some(href) if !href.is_empty() => self.resolve_url(href)?,
            _ => String::new(),
        };

        let author = card.author.as_deref().map(clean_text).unwrap_or_default();
        let publish_time = card
            .time
            .as_deref()
            .map(normalize_publish_time)
            .unwrap_or_default();

        Ok(Article::new(
            self.source.clone(),
            title,
            url,
            author,
            publish_time,
        ))
    }

    /// Resolve an href against the site base
    ///
    /// `/path` and `path` both resolve to `{base}/path`; absolute URLs are kept.
    pub fn resolve_url(&self, href: &str) -> std::result::Result<String, ParseError> {
        if let Ok(absolute) = Url::parse(href) {
            return Ok(absolute.to_string());
        }
        if href.starts_with("//") {
            return self
                .base_url
                .join(href)
                .map(|u| u.to_string())
                .map_err(|_| ParseError::InvalidUrl(href.to_string()));
        }

        let relative = href.trim_start_matches('/');
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        base.join(relative)
            .map(|u| u.to_string())
            .map_err(|_| ParseError::InvalidUrl(href.to_string()))
    }
}
