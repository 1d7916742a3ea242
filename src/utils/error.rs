//! Error types for the tcscrape pipeline
//!
//! This module defines the per-stage error types: fetching a listing page,
//! extracting a single card, and exporting the collected articles.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching one listing page
///
/// Every variant carries the page index so the orchestrator can record the
/// failure against the right page.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, TLS, reset)
    #[error("page {page}: HTTP request failed: {source}")]
    Http {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-2xx status
    #[error("page {page}: server returned HTTP {status}")]
    Status { page: u32, status: u16 },

    /// Request exceeded the configured timeout
    #[error("page {page}: request timed out")]
    Timeout { page: u32 },

    /// Response body could not be read
    #[error("page {page}: failed to read response body: {message}")]
    Body { page: u32, message: String },

    /// Pool semaphore was closed
    ///
    /// The fetcher never closes its semaphore, so a normal run cannot hit
    /// this; it replaces a panic on the acquire result.
    #[error("page {page}: fetch pool closed")]
    PoolClosed { page: u32 },
}

impl FetchError {
    /// Page index the failure belongs to
    #[must_use]
    pub fn page(&self) -> u32 {
        match self {
            Self::Http { page, .. }
            | Self::Status { page, .. }
            | Self::Timeout { page }
            | Self::Body { page, .. }
            | Self::PoolClosed { page } => *page,
        }
    }

    /// Build from a reqwest error, classifying timeouts separately
    pub fn from_reqwest(page: u32, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { page }
        } else {
            Self::Http { page, source: err }
        }
    }

    /// Whether another attempt could plausibly succeed
    ///
    /// Retry on:
    /// - timeouts and transport errors
    /// - 429 (Too Many Requests)
    /// - 500, 502, 503, 504
    ///
    /// Everything else (404, 403, ...) is final.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => is_retryable_status(*status),
            Self::Body { .. } | Self::PoolClosed { .. } => false,
        }
    }
}

/// Status codes worth another attempt
#[must_use]
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Errors that can occur while turning one card into an article
///
/// These never escape the parser; a failing card is skipped.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Card has no title link
    #[error("card has no title link")]
    MissingTitle,

    /// Title link is present but its text is blank
    #[error("card title is empty after normalization")]
    EmptyTitle,

    /// href could not be resolved against the base URL
    #[error("invalid article URL: {0}")]
    InvalidUrl(String),
}

/// Errors that can occur while writing or reading the CSV file
#[derive(Error, Debug)]
pub enum ExportError {
    /// Filesystem failure on the output path
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or decoding failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
