//! Builds the single shared HTTP client used for both content fetches and
//! robots.txt retrieval.
//!
//! Redirects are never followed here: the extractor needs to observe the
//! raw 3xx response and headers to synthesize `ResolvesTo` and the redirect
//! link itself.

use std::time::Duration;

use reqwest::Client;

use crate::error::{CrawlError, Result};

pub fn build(pool_size: usize, idle_timeout: Duration, request_timeout: Duration) -> Result<Client> {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(pool_size)
        .pool_idle_timeout(idle_timeout)
        .timeout(request_timeout)
        .build()
        .map_err(CrawlError::ClientBuild)
}
