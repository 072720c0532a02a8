//! Error types for the crawl engine.
//!
//! Configuration failures are the only errors surfaced to a caller of
//! [`crate::Crawler::start`]; everything a worker encounters while fetching
//! a single URL (DNS failures, bad responses, unparseable HTML) is handled
//! locally and never aborts the crawl. See [`crate::error`] variants below
//! for the taxonomy.

/// Errors that can be returned by the crawl engine's public API.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// A seed URL in `Config::from` could not be parsed as an absolute URL.
    #[error("invalid seed URL {url:?}: {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// `wait_time` or `timeout` was not a valid duration literal (e.g. "100ms").
    #[error("invalid duration {literal:?} for {field}")]
    InvalidDuration { field: &'static str, literal: String },

    /// An `include` or `exclude` pattern failed to compile as a regular expression.
    #[error("invalid {which} pattern {pattern:?}: {source}")]
    InvalidPattern {
        which: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The configured HTTP client could not be built (e.g. a malformed header value).
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Convenience alias used throughout the crate's public API.
pub type Result<T> = std::result::Result<T, CrawlError>;
