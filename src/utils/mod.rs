//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;
pub mod retry;

use regex::Regex;
use std::sync::OnceLock;

/// Normalize whitespace in text
///
/// Collapses every run of whitespace (spaces, tabs, newlines, NBSP) into a
/// single space and trims both ends.
pub fn normalize_whitespace(text: &str) -> String {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

    let re = WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

    re.replace_all(text.trim(), " ").to_string()
}

/// Deduplication key for a title
///
/// Lowercase hex MD5 of the UTF-8 bytes. Callers pass an already-normalized
/// title; equal inputs always produce equal keys.
pub fn title_hash(title: &str) -> String {
    format!("{:x}", md5::compute(title.as_bytes()))
}

/// Truncate text to a maximum number of characters
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
