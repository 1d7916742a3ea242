//! Text sanitization for fields extracted from cards
//!
//! Every text field goes through [`clean_text`] before it is stored, so the
//! dedup hash is computed over a canonical form of the title.

use crate::utils::normalize_whitespace;

/// Clean one extracted text field
///
/// Steps:
/// 1. Decode HTML entities (covers double-encoded text such as `&amp;amp;`)
/// 2. Remove zero-width characters
/// 3. Remove control characters
/// 4. Collapse whitespace and trim
///
/// # Examples
///
/// ```
/// use tcscrape::parser::sanitize::clean_text;
///
/// assert_eq!(clean_text("  Apple &amp; Google\n\t team up "), "Apple & Google team up");
/// ```
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(text);
    let visible = remove_zero_width(&decoded);
    let printable = remove_control_chars(&visible);
    normalize_whitespace(&printable)
}

/// Decode named and numeric HTML entities
///
/// # Examples
///
/// ```
/// use tcscrape::parser::sanitize::decode_html_entities;
///
/// assert_eq!(decode_html_entities("&lt;b&gt; &#39;x&#39;"), "<b> 'x'");
/// ```
pub fn decode_html_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Remove zero-width spaces, directional marks and the BOM
///
/// # Examples
///
/// ```
/// use tcscrape::parser::sanitize::remove_zero_width;
///
/// assert_eq!(remove_zero_width("a\u{200B}b\u{FEFF}c"), "abc");
/// ```
pub fn remove_zero_width(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(*c,
                '\u{200B}'..='\u{200F}' |
                '\u{202A}'..='\u{202E}' |
                '\u{2060}' |
                '\u{FEFF}'
            )
        })
        .collect()
}

/// Remove control characters, turning line breaks and tabs into spaces
pub fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}
