//! The crawl engine's only configuration surface.
//!
//! `Config` is a plain, serde-deserializable struct so an external
//! collaborator (a CLI flag parser, a JSON config file reader) can build one
//! without this crate implementing that collaborator itself — JSON parsing,
//! sitemap ingestion, and the rest stay out of scope per this crate's
//! purpose.

use serde::{Deserialize, Serialize};

use crate::model::Pair;

/// Configuration accepted by [`crate::Crawler::start`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Max concurrent in-flight fetches. Values < 1 coerce to 1 at `start`.
    pub connections: usize,
    /// Value of the `User-Agent` request header.
    pub user_agent: String,
    /// Token used when evaluating robots.txt rules.
    pub robots_user_agent: String,
    /// Regular expressions; a URL matching any of these is in scope.
    pub include: Vec<String>,
    /// Regular expressions; a URL matching any of these is out of scope,
    /// regardless of `include`.
    pub exclude: Vec<String>,
    /// Seed URLs.
    pub from: Vec<String>,
    /// If true, links with `rel=nofollow` are not enqueued.
    pub respect_nofollow: bool,
    /// Hard depth ceiling; a link discovered while processing depth `d` is
    /// enqueued only while `d <= max_depth`. `0` crawls only the seeds.
    pub max_depth: usize,
    /// Duration literal (e.g. `"100ms"`) used as the global politeness gap.
    pub wait_time: String,
    /// Duration literal for the HTTP client's idle-pool and per-request timeout.
    pub timeout: String,
    /// Additional headers added to every request.
    pub header: Vec<Pair>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            connections: 1,
            user_agent: "Crawler".to_string(),
            robots_user_agent: "Crawler".to_string(),
            include: Vec::new(),
            exclude: Vec::new(),
            from: Vec::new(),
            respect_nofollow: false,
            max_depth: 0,
            wait_time: "100ms".to_string(),
            timeout: "30s".to_string(),
            header: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_defaults() {
        let c = Config::default();
        assert_eq!(c.connections, 1);
        assert_eq!(c.max_depth, 0);
        assert_eq!(c.robots_user_agent, "Crawler");
        assert_eq!(c.wait_time, "100ms");
    }

    #[test]
    fn deserializes_from_partial_json() {
        let json = r#"{"from": ["https://example.com"], "connections": 8}"#;
        let c: Config = serde_json::from_str(json).unwrap();
        assert_eq!(c.from, vec!["https://example.com".to_string()]);
        assert_eq!(c.connections, 8);
        // Unspecified fields keep their defaults.
        assert_eq!(c.max_depth, 0);
        assert_eq!(c.wait_time, "100ms");
    }
}
