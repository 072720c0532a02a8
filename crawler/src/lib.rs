//! A polite, breadth-first web crawler core.
//!
//! Given a [`Config`] of seed URLs and an include/exclude policy, this
//! crate fetches HTML pages, extracts per-page signals (title, meta
//! description, meta robots, first H1, canonical link, hreflang
//! alternates, outbound links, response headers, body-text hash), and
//! emits one [`Result`] per crawled URL in strict non-decreasing depth
//! order.
//!
//! The crate is a library only: seed ingestion from a sitemap, a
//! command-line shell, JSON config-file parsing, and output serialization
//! are all the caller's concern. See `src/bin/crawl-demo.rs` for a thin
//! example of driving it.
//!
//! ```no_run
//! # use crawler::{Config, Crawler};
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config {
//!     from: vec!["https://example.com".to_string()],
//!     connections: 4,
//!     ..Config::default()
//! };
//! let mut crawler = Crawler::new(config);
//! crawler.start().await?;
//! while let Some(result) = crawler.next().await {
//!     println!("{}", serde_json::to_string(&result)?);
//! }
//! # Ok(())
//! # }
//! ```

mod address;
mod config;
mod crawler;
mod duration;
mod error;
mod extractor;
mod filter;
mod html_query;
mod http_client;
mod model;
mod robots;
mod scheduler;

pub use address::Address;
pub use config::Config;
pub use crawler::Crawler;
pub use error::{CrawlError, Result as CrawlResult};
pub use model::{Canonical, Hreflang, Link, Pair, Result};
