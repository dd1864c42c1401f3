//! Crawl coordinator - per-seed pipeline orchestration
//!
//! For every seed user the coordinator runs a strict two-stage pipeline:
//! first the follower listing is walked to completion and materialized,
//! only then are the profile pages fetched. The stage gate keeps the output
//! file an exact reflection of "one seed's followers, fully discovered,
//! before the next". Seeds run as independent tasks; one seed failing never
//! halts the others.

use crate::config::Config;
use crate::crawler::fetcher::{CookieJar, Fetcher};
use crate::crawler::parser;
use crate::crawler::profile::fetch_attribute;
use crate::crawler::throttle::ThrottleGate;
use crate::crawler::walker::PageWalker;
use crate::output::{FileSink, Sink};
use crate::CrawlError;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// In-flight profile fetches per seed; keeps the gate's grant queue short
const ATTRIBUTE_FETCH_CONCURRENCY: usize = 8;

/// Main crawl coordinator
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Arc<Fetcher>,
    sink: Arc<dyn Sink>,
}

impl Coordinator {
    /// Creates a coordinator with a file sink at the configured path
    ///
    /// Must be called from within a tokio runtime: this spawns the throttle
    /// serializer task shared by every fetch the coordinator issues.
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        let sink: Arc<dyn Sink> = Arc::new(FileSink::new(&config.output.email_path));
        Self::with_sink(config, sink)
    }

    /// Creates a coordinator writing to the given sink
    pub fn with_sink(config: Config, sink: Arc<dyn Sink>) -> Result<Self, CrawlError> {
        let gate = ThrottleGate::spawn(Duration::from_millis(config.crawler.min_request_interval));
        let cookies = CookieJar::new(&config.request.cookie);
        let fetcher = Fetcher::new(&config, gate, cookies)?;

        Ok(Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
            sink,
        })
    }

    /// Crawls every configured seed to completion
    ///
    /// Seeds run concurrently and independently; the throttle gate is the
    /// only cross-seed coupling. Individual seed failures are logged and
    /// counted, not propagated: the run itself only fails on setup errors.
    pub async fn run(&self) -> Result<(), CrawlError> {
        let seeds = self.config.crawler.seeds.clone();
        tracing::info!("Starting crawl of {} seeds", seeds.len());

        let mut tasks = JoinSet::new();
        for seed in seeds.iter().cloned() {
            let config = Arc::clone(&self.config);
            let fetcher = Arc::clone(&self.fetcher);
            let sink = Arc::clone(&self.sink);
            tasks.spawn(async move {
                let outcome = crawl_seed(&config, &fetcher, sink.as_ref(), &seed).await;
                (seed, outcome)
            });
        }

        let mut failed = 0usize;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(()))) => {}
                Ok((seed, Err(e))) => {
                    failed += 1;
                    tracing::error!("Seed {} failed: {}", seed, e);
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!("Seed task panicked: {}", e);
                }
            }
        }

        if failed == 0 {
            tracing::info!("All operations complete");
        } else {
            tracing::error!("{} of {} seeds failed", failed, seeds.len());
        }

        Ok(())
    }
}

/// Runs the two-stage pipeline for one seed
///
/// Stage one walks the follower listing to completion; a terminal fetch
/// failure here aborts the seed. Stage two fans the profile fetches out
/// concurrently but consumes the results in follower order, so sink lines
/// for a seed appear exactly in discovery order. Per-follower failures
/// (fetch or sink write) are logged and skipped.
async fn crawl_seed(
    config: &Config,
    fetcher: &Fetcher,
    sink: &dyn Sink,
    seed: &str,
) -> Result<(), CrawlError> {
    let start_url = config.crawler.followers_url(seed);
    tracing::info!("Collecting followers of {}", seed);

    let mut walker = PageWalker::new(fetcher, start_url, parser::extract_followers);
    let mut followers = Vec::new();
    while let Some(follower) = walker.next_item().await? {
        tracing::info!("Fetched follower: {}", follower);
        followers.push(follower);
    }
    tracing::info!("Collected {} followers of {}", followers.len(), seed);

    // Profile fetches begin only once the whole follower list exists. They
    // are issued concurrently (the gate serializes them on the wire) but
    // consumed in follower order. Concurrency stays bounded so no fetch
    // queues at the gate behind a whole page worth of earlier tickets.
    let mut results = stream::iter(followers)
        .map(|follower| async move {
            let url = config.crawler.profile_url(&follower);
            let outcome = fetch_attribute(fetcher, &url, parser::extract_email).await;
            (follower, outcome)
        })
        .buffered(ATTRIBUTE_FETCH_CONCURRENCY);

    while let Some((follower, outcome)) = results.next().await {
        match outcome {
            Ok(Some(email)) => {
                if let Err(e) = sink.append(&email) {
                    tracing::warn!("Failed to record email of {}: {}", follower, e);
                    continue;
                }
                tracing::info!("Fetched email: {}", email);
            }
            Ok(None) => {
                tracing::debug!("No public email for {}", follower);
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", follower, e);
            }
        }
    }

    Ok(())
}

/// Runs a complete crawl with the given configuration
pub async fn run_crawl(config: Config) -> Result<(), CrawlError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
