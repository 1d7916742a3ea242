//! CSS selectors for the listing page markup
//!
//! Every markup assumption lives here. When the site changes its card
//! structure, only this file and [`extract_cards`](super::html::extract_cards)
//! need to follow.

use lazy_static::lazy_static;
use scraper::Selector;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    /// One article card on a listing page
    pub static ref CARD: Selector = parse_selector!("div.loop-card__content");

    /// Title anchor inside a card; text is the title, href the article URL
    pub static ref TITLE_LINK: Selector = parse_selector!("a.loop-card__title-link");

    /// Author anchor inside a card
    pub static ref AUTHOR: Selector = parse_selector!("a.loop-card__author");

    /// Timestamp inside a card
    pub static ref TIME: Selector = parse_selector!("time");
}
