//! The crawler façade: lifecycle, result channel, seen-set and queue setup.
//!
//! `Crawler` is single-use: [`Crawler::start`] must be called exactly once
//! before [`Crawler::next`], mirroring this crawl engine's historical
//! contract. `start` does all of the fallible setup — everything after it
//! runs in a background task and reports problems per-URL rather than
//! through the public API.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::instrument;

use crate::address::Address;
use crate::config::Config;
use crate::duration::parse_duration;
use crate::error::{CrawlError, Result as CrawlResult};
use crate::filter::Filter;
use crate::model::{QueueEntry, Result};
use crate::scheduler::{self, MergeState, Scheduler, Shared, WorkerContext};

pub struct Crawler {
    config: Config,
    receiver: Option<mpsc::Receiver<Result>>,
}

impl Crawler {
    pub fn new(config: Config) -> Crawler {
        Crawler { config, receiver: None }
    }

    /// Validates `config`, seeds the queue, and launches the scheduler on a
    /// background task. Returns `Err(CrawlError::Config*)` without starting
    /// anything if a duration, seed URL, or filter pattern is invalid.
    #[instrument(skip(self), fields(seeds = self.config.from.len()))]
    pub async fn start(&mut self) -> CrawlResult<()> {
        let wait = parse_duration(&self.config.wait_time).ok_or_else(|| {
            CrawlError::InvalidDuration {
                field: "wait_time",
                literal: self.config.wait_time.clone(),
            }
        })?;
        let timeout = parse_duration(&self.config.timeout).ok_or_else(|| {
            CrawlError::InvalidDuration {
                field: "timeout",
                literal: self.config.timeout.clone(),
            }
        })?;

        let connections = self.config.connections.max(1);

        let mut seeds = Vec::with_capacity(self.config.from.len());
        for raw in &self.config.from {
            let url = url::Url::parse(raw).map_err(|source| CrawlError::InvalidSeed {
                url: raw.clone(),
                source,
            })?;
            seeds.push(Address::from_url(url));
        }

        let filter = Filter::compile(&self.config.include, &self.config.exclude)?;
        let client = scheduler::build_client(connections, timeout, timeout)?;

        // Seeds are pre-inserted into the seen set: a link discovered later
        // that happens to point back at a seed must not be re-enqueued.
        let seen: HashSet<String> = seeds.iter().map(|a| a.full.clone()).collect();

        let (tx, rx) = mpsc::channel(connections);

        let ctx = Arc::new(WorkerContext {
            client,
            filter,
            user_agent: self.config.user_agent.clone(),
            headers: self.config.header.clone(),
            respect_nofollow: self.config.respect_nofollow,
            max_depth: self.config.max_depth,
            shared: Shared {
                state: Mutex::new(MergeState { seen, next_queue: Vec::new() }),
            },
            results_tx: tx,
        });

        let queue: VecDeque<QueueEntry> = seeds
            .into_iter()
            .map(|address| QueueEntry { address, depth: 1 })
            .collect();

        let scheduler = Scheduler::new(
            ctx,
            self.config.robots_user_agent.clone(),
            queue,
            wait,
            connections,
        );

        tokio::spawn(scheduler.run());
        self.receiver = Some(rx);
        Ok(())
    }

    /// Receives the next crawled `Result`, in non-decreasing depth order.
    /// Returns `None` once the crawl has finished and every worker has
    /// drained. Calling this before `start` always returns `None`.
    pub async fn next(&mut self) -> Option<Result> {
        self.receiver.as_mut()?.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_unparseable_seed() {
        let config = Config { from: vec!["://not a url".to_string()], ..Config::default() };
        let mut crawler = Crawler::new(config);
        let err = crawler.start().await.unwrap_err();
        assert!(matches!(err, CrawlError::InvalidSeed { .. }));
    }

    #[tokio::test]
    async fn rejects_unparseable_wait_time() {
        let config = Config {
            from: vec!["https://example.com".to_string()],
            wait_time: "not-a-duration".to_string(),
            ..Config::default()
        };
        let mut crawler = Crawler::new(config);
        let err = crawler.start().await.unwrap_err();
        assert!(matches!(err, CrawlError::InvalidDuration { field: "wait_time", .. }));
    }

    #[tokio::test]
    async fn rejects_uncompilable_include_pattern() {
        let config = Config {
            from: vec!["https://example.com".to_string()],
            include: vec!["(".to_string()],
            ..Config::default()
        };
        let mut crawler = Crawler::new(config);
        let err = crawler.start().await.unwrap_err();
        assert!(matches!(err, CrawlError::InvalidPattern { .. }));
    }

    #[tokio::test]
    async fn next_before_start_returns_none() {
        let config = Config::default();
        let mut crawler = Crawler::new(config);
        assert!(crawler.next().await.is_none());
    }
}
