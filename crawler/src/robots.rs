//! Per-host robots.txt cache and authorization.
//!
//! `CheckRobots` runs only on the scheduler task (see [`crate::scheduler`]),
//! never inside a spawned worker, so this cache needs no internal
//! synchronization — it is exactly as safe as any other scheduler-owned
//! field. A host's robots.txt is fetched at most once per crawl.

use std::collections::HashMap;

use reqwest::Client;
use robotstxt::DefaultMatcher;
use tracing::warn;

use crate::address::Address;
use crate::model::Pair;

/// Body substituted for a host whose robots.txt could not be retrieved or
/// parsed, per the robots exclusion protocol's handling of server errors:
/// an HTTP 503 is treated as "temporarily disallow everything".
const SERVER_ERROR_BODY: &str = "User-agent: *\nDisallow: /\n";

pub struct RobotsCache {
    entries: HashMap<String, String>,
}

impl RobotsCache {
    pub fn new() -> RobotsCache {
        RobotsCache {
            entries: HashMap::new(),
        }
    }

    /// Returns whether `address` may be fetched under `robots_user_agent`,
    /// fetching and caching the host's robots.txt on first encounter.
    pub async fn authorize(
        &mut self,
        client: &Client,
        user_agent: &str,
        robots_user_agent: &str,
        extra_headers: &[Pair],
        address: &Address,
    ) -> bool {
        let origin = format!("{}://{}", address.scheme, address.host);
        if !self.entries.contains_key(&origin) {
            let body = fetch_robots(client, user_agent, extra_headers, &origin).await;
            self.entries.insert(origin.clone(), body);
        }
        let body = self.entries.get(&origin).expect("just inserted");
        DefaultMatcher::default().one_agent_allowed_by_robots(body, robots_user_agent, &address.full)
    }
}

impl Default for RobotsCache {
    fn default() -> Self {
        RobotsCache::new()
    }
}

async fn fetch_robots(
    client: &Client,
    user_agent: &str,
    extra_headers: &[Pair],
    origin: &str,
) -> String {
    let url = format!("{origin}/robots.txt");
    let mut req = client.get(&url).header(reqwest::header::USER_AGENT, user_agent);
    for h in extra_headers {
        req = req.header(h.key.as_str(), h.value.as_str());
    }

    match req.send().await {
        Ok(resp) if resp.status().is_success() => resp.text().await.unwrap_or_else(|err| {
            warn!(%url, error = %err, "failed to read robots.txt body");
            SERVER_ERROR_BODY.to_string()
        }),
        Ok(resp) => {
            warn!(%url, status = %resp.status(), "robots.txt fetch returned non-success status");
            SERVER_ERROR_BODY.to_string()
        }
        Err(err) => {
            warn!(%url, error = %err, "failed to fetch robots.txt");
            SERVER_ERROR_BODY.to_string()
        }
    }
}
