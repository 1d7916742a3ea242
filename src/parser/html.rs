//! Card extraction from listing-page HTML
//!
//! [`extract_cards`] is the only function that walks the document. It returns
//! raw, uncleaned field values so the markup dependency stays in one place.

use scraper::{ElementRef, Html};

use super::selectors::{AUTHOR, CARD, TIME, TITLE_LINK};

/// Raw field values of one card, before cleaning
///
/// Each field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCard {
    /// Text of the title link; `None` when the card has no title link
    pub title: Option<String>,
    /// `href` of the title link
    pub href: Option<String>,
    /// Text of the author link
    pub author: Option<String>,
    /// `datetime` attribute of the time element, or its text
    pub time: Option<String>,
}

/// Locate every card on a listing page and pull out its raw fields
///
/// Markup that does not contain any card yields an empty vector.
pub fn extract_cards(html: &str) -> Vec<RawCard> {
    let document = Html::parse_document(html);
    document.select(&CARD).map(read_card).collect()
}

fn read_card(card: ElementRef<'_>) -> RawCard {
    let title_link = card.select(&TITLE_LINK).next();

    RawCard {
        title: title_link.map(element_text),
        href: title_link
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string),
        author: card.select(&AUTHOR).next().map(element_text),
        time: card.select(&TIME).next().map(|t| {
            t.value()
                .attr("datetime")
                .map(str::to_string)
                .unwrap_or_else(|| element_text(t))
        }),
    }
}

/// Concatenated text nodes; inline markup adds no separators
fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}
