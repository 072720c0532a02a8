//! The level-synchronous BFS state machine.
//!
//! Driven as a tagged [`State`] enum matched in a loop, rather than the
//! function-valued dispatch this logic is historically described with —
//! the two are equivalent; an enum reads more naturally in Rust. Each
//! variant corresponds one-to-one to a state in the crawl engine's state
//! diagram: `StartQueue -> Start -> (Wait | CheckRobots) -> (Fetch |
//! emit-blocked) -> Next -> (Start | Await) -> NextQueue -> StartQueue`.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use reqwest::Client;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::address::Address;
use crate::filter::Filter;
use crate::model::{Pair, QueueEntry, Result as CrawlResult};
use crate::robots::RobotsCache;
use crate::{extractor, http_client};

/// Fields every spawned worker needs read access to. Built once in
/// [`crate::Crawler::start`] and shared via `Arc`; nothing in here is
/// mutated after the scheduler begins running.
pub(crate) struct WorkerContext {
    pub client: Client,
    pub filter: Filter,
    pub user_agent: String,
    pub headers: Vec<Pair>,
    pub respect_nofollow: bool,
    pub max_depth: usize,
    pub shared: Shared,
    pub results_tx: mpsc::Sender<CrawlResult>,
}

/// The only state shared across worker tasks: the dedup set and the
/// next-level queue being accumulated. Guarded by one mutex, matching the
/// single brief critical section this crawl engine's merge step uses.
pub(crate) struct Shared {
    pub state: Mutex<MergeState>,
}

pub(crate) struct MergeState {
    pub seen: HashSet<String>,
    pub next_queue: Vec<QueueEntry>,
}

enum State {
    StartQueue,
    Start,
    Wait,
    CheckRobots,
    Fetch,
    Next,
    Await,
    NextQueue,
    Done,
}

pub(crate) struct Scheduler {
    ctx: Arc<WorkerContext>,
    robots: RobotsCache,
    robots_user_agent: String,
    queue: VecDeque<QueueEntry>,
    wait: Duration,
    last_request: Option<Instant>,
    semaphore: Arc<Semaphore>,
    tasks: JoinSet<()>,
}

impl Scheduler {
    pub fn new(
        ctx: Arc<WorkerContext>,
        robots_user_agent: String,
        queue: VecDeque<QueueEntry>,
        wait: Duration,
        connections: usize,
    ) -> Scheduler {
        Scheduler {
            ctx,
            robots: RobotsCache::new(),
            robots_user_agent,
            queue,
            wait,
            last_request: None,
            semaphore: Arc::new(Semaphore::new(connections)),
            tasks: JoinSet::new(),
        }
    }

    #[instrument(skip(self))]
    pub async fn run(mut self) {
        let mut state = State::StartQueue;
        loop {
            state = match state {
                State::StartQueue => self.start_queue(),
                State::Start => self.start(),
                State::Wait => {
                    self.wait().await;
                    State::Start
                }
                State::CheckRobots => self.check_robots().await,
                State::Fetch => self.fetch().await,
                State::Next => self.next(),
                State::Await => {
                    self.await_workers().await;
                    State::NextQueue
                }
                State::NextQueue => self.next_queue(),
                State::Done => break,
            };
        }
        debug!("scheduler finished, closing results channel");
    }

    fn start_queue(&self) -> State {
        if self.queue.is_empty() {
            State::Done
        } else {
            State::Start
        }
    }

    fn start(&self) -> State {
        match self.last_request {
            Some(last) if last.elapsed() < self.wait => State::Wait,
            _ => State::CheckRobots,
        }
    }

    async fn wait(&self) {
        let elapsed = self.last_request.map(|t| t.elapsed()).unwrap_or(self.wait);
        if elapsed < self.wait {
            tokio::time::sleep(self.wait - elapsed).await;
        }
    }

    async fn check_robots(&mut self) -> State {
        let entry = self.queue.front().expect("StartQueue guarantees non-empty").clone();
        let allowed = self
            .robots
            .authorize(
                &self.ctx.client,
                &self.ctx.user_agent,
                &self.robots_user_agent,
                &self.ctx.headers,
                &entry.address,
            )
            .await;

        if allowed {
            State::Fetch
        } else {
            info!(url = %entry.address.full, "blocked by robots.txt");
            let blocked = CrawlResult::blocked_by_robots(entry.address, entry.depth);
            if self.ctx.results_tx.send(blocked).await.is_err() {
                warn!("results receiver dropped while reporting a robots block");
            }
            State::Next
        }
    }

    async fn fetch(&mut self) -> State {
        let entry = self.queue.front().expect("StartQueue guarantees non-empty").clone();
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore is never closed");
        self.last_request = Some(Instant::now());

        let ctx = self.ctx.clone();
        self.tasks.spawn(async move {
            let _permit = permit;
            run_fetch(ctx, entry).await;
        });

        State::Next
    }

    fn next(&mut self) -> State {
        self.queue.pop_front();
        if self.queue.is_empty() {
            State::Await
        } else {
            State::Start
        }
    }

    async fn await_workers(&mut self) {
        while self.tasks.join_next().await.is_some() {}
    }

    fn next_queue(&mut self) -> State {
        let mut state = self.ctx.shared.state.lock();
        self.queue = state.next_queue.drain(..).collect();
        drop(state);
        State::StartQueue
    }
}

/// Issues the fetch for `entry`, hydrates a `Result`, merges discovered
/// links into the next level, and emits the `Result`. Runs inside a
/// spawned worker task, bounded by the connection semaphore held in
/// `_permit` (dropped on return).
async fn run_fetch(ctx: Arc<WorkerContext>, entry: QueueEntry) {
    let mut req = ctx
        .client
        .get(&entry.address.full)
        .header(reqwest::header::USER_AGENT, ctx.user_agent.as_str());
    for header in &ctx.headers {
        req = req.header(header.key.as_str(), header.value.as_str());
    }

    let resp = match req.send().await {
        Ok(resp) => resp,
        Err(err) => {
            debug!(url = %entry.address.full, error = %err, "transport error, skipping URL");
            return;
        }
    };

    let result = extractor::hydrate(&entry.address, entry.depth, resp).await;
    merge(&ctx, &entry, &result);

    if ctx.results_tx.send(result).await.is_err() {
        warn!(url = %entry.address.full, "results receiver dropped before result could be delivered");
    }
}

/// Folds a fetched page's outbound links into the next level's queue,
/// subject to scope, nofollow, depth ceiling, and dedup.
fn merge(ctx: &WorkerContext, source: &QueueEntry, result: &CrawlResult) {
    if !(source.depth <= ctx.max_depth) {
        return;
    }

    let mut state = ctx.shared.state.lock();
    for link in &result.links {
        let Some(address) = &link.address else {
            continue;
        };
        if !ctx.filter.accept(&address.full) {
            continue;
        }
        if link.nofollow && ctx.respect_nofollow {
            continue;
        }
        if state.seen.contains(&address.full) {
            continue;
        }
        state.seen.insert(address.full.clone());
        state.next_queue.push(QueueEntry {
            address: address.clone(),
            depth: source.depth + 1,
        });
    }
}

/// Used only by `Crawler::start` to size the idle connection pool and build
/// the shared client; kept here so the scheduler module owns every piece of
/// plumbing that the HTTP client needs to agree with (redirect policy, pool
/// size) about concurrency.
pub(crate) fn build_client(
    connections: usize,
    idle_timeout: Duration,
    request_timeout: Duration,
) -> crate::error::Result<Client> {
    http_client::build(connections, idle_timeout, request_timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(url: &str) -> Address {
        Address::parse(url).unwrap()
    }

    #[test]
    fn merge_respects_max_depth() {
        let ctx = test_ctx(0, false);
        let source = QueueEntry { address: address("https://example.com/"), depth: 1 };
        let mut result = CrawlResult::bare(address("https://example.com/"), 1);
        result.links.push(crate::model::Link {
            address: Some(address("https://example.com/a")),
            href: "/a".into(),
            anchor: String::new(),
            nofollow: false,
        });
        merge(&ctx, &source, &result);
        assert!(ctx.shared.state.lock().next_queue.is_empty());
    }

    #[test]
    fn merge_dedups_and_respects_nofollow() {
        let ctx = test_ctx(5, true);
        let source = QueueEntry { address: address("https://example.com/"), depth: 1 };
        let mut result = CrawlResult::bare(address("https://example.com/"), 1);
        result.links.push(crate::model::Link {
            address: Some(address("https://example.com/a")),
            href: "/a".into(),
            anchor: String::new(),
            nofollow: true,
        });
        result.links.push(crate::model::Link {
            address: Some(address("https://example.com/b")),
            href: "/b".into(),
            anchor: String::new(),
            nofollow: false,
        });
        merge(&ctx, &source, &result);
        let state = ctx.shared.state.lock();
        assert_eq!(state.next_queue.len(), 1);
        assert_eq!(state.next_queue[0].address.full, "https://example.com/b");

        drop(state);
        // A second merge of the same link must not duplicate it.
        merge(&ctx, &source, &result);
        assert_eq!(ctx.shared.state.lock().next_queue.len(), 1);
    }

    fn test_ctx(max_depth: usize, respect_nofollow: bool) -> WorkerContext {
        let (tx, _rx) = mpsc::channel(1);
        WorkerContext {
            client: Client::new(),
            filter: Filter::compile(&[], &[]).unwrap(),
            user_agent: "test".into(),
            headers: Vec::new(),
            respect_nofollow,
            max_depth,
            shared: Shared {
                state: Mutex::new(MergeState { seen: HashSet::new(), next_queue: Vec::new() }),
            },
            results_tx: tx,
        }
    }
}
