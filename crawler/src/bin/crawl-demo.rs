//! Thin demonstration binary for the `crawler` library.
//!
//! Reads seed URLs (one per line) from a file and prints one JSON document
//! per crawled `Result` to standard output. This intentionally does not
//! implement a config-file format, sitemap ingestion, or any subcommands —
//! those are external collaborators left to callers of the library.

use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use crawler::{Config, Crawler};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "crawl-demo")]
#[command(about = "Crawl a list of seed URLs and print Results as JSON lines")]
struct Cli {
    /// Path to a file with seed URLs, one per line.
    #[arg(long)]
    seeds: String,
    /// Max concurrent in-flight fetches.
    #[arg(long, default_value_t = 4)]
    connections: usize,
    /// Hard depth ceiling for the crawl.
    #[arg(long, default_value_t = 2)]
    max_depth: usize,
    /// Global politeness gap between dispatched fetches.
    #[arg(long, default_value = "100ms")]
    wait_time: String,
    /// User-Agent header sent with every request.
    #[arg(long, default_value = "crawler-demo/0.1")]
    user_agent: String,
    /// Respect rel=nofollow on discovered links.
    #[arg(long, default_value_t = true)]
    respect_nofollow: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let from = fs::read_to_string(&cli.seeds)
        .with_context(|| format!("reading seed file {:?}", cli.seeds))?
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect::<Vec<_>>();

    let config = Config {
        from,
        connections: cli.connections,
        max_depth: cli.max_depth,
        wait_time: cli.wait_time,
        user_agent: cli.user_agent,
        respect_nofollow: cli.respect_nofollow,
        ..Config::default()
    };

    let mut crawler = Crawler::new(config);
    crawler.start().await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut count = 0usize;
    while let Some(result) = crawler.next().await {
        serde_json::to_writer(&mut out, &result)?;
        out.write_all(b"\n")?;
        count += 1;
    }
    tracing::info!(count, "crawl finished");

    Ok(())
}
