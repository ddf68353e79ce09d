//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns the crawl loop. It seeds the frontier, then takes
//! one URL at a time: marks it visited, consults robots.txt, waits out any
//! crawl delay, fetches, and hands the body to the extractor. Nothing inside
//! an iteration can stop the loop; it ends when the frontier is empty or the
//! visited count reaches the page ceiling.

use crate::config::Config;
use crate::crawler::extractor::{ExtractionOutcome, Extractor};
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::parser::ExtractionLimits;
use crate::frontier::{Frontier, VisitedSet};
use crate::output::{CrawlReport, CrawlStats};
use crate::robots::RobotsCache;
use crate::storage::PageStore;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// What happened to one dequeued URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationOutcome {
    /// robots.txt forbids the URL; it stays visited
    Disallowed,
    /// The fetch failed, timed out or returned nothing
    Empty,
    /// The body was extracted
    Extracted(ExtractionOutcome),
}

/// Shared structures the coordinator drives
///
/// The same `Arc`s are handed to the stats tasks and the API server so they
/// can read counters while the crawl runs.
#[derive(Clone)]
pub struct CrawlContext {
    pub frontier: Arc<Frontier>,
    pub visited: Arc<VisitedSet>,
    pub robots: Arc<RobotsCache>,
    pub store: Arc<dyn PageStore>,
    pub stats: Arc<CrawlStats>,
}

impl CrawlContext {
    /// Builds fresh crawl structures from the configuration
    pub fn from_config(config: &Config, store: Arc<dyn PageStore>) -> Result<Self> {
        let robots_client = RobotsCache::build_client(
            &config.user_agent.header_value(),
            config.crawler.robots_timeout(),
        )?;

        Ok(Self {
            frontier: Arc::new(Frontier::new()),
            visited: Arc::new(VisitedSet::new(config.crawler.visited_counting)),
            robots: Arc::new(RobotsCache::new(
                robots_client,
                &config.user_agent.crawler_name,
            )),
            store,
            stats: Arc::new(CrawlStats::new()),
        })
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    seed_url: String,
    max_pages: u64,
    fetch_timeout: Duration,
    context: CrawlContext,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Extractor,
    shutdown: CancellationToken,
}

impl Coordinator {
    /// Creates a coordinator over existing crawl structures
    pub fn new(config: &Config, context: CrawlContext, fetcher: Arc<dyn PageFetcher>) -> Self {
        let limits = ExtractionLimits {
            max_tokens: config.crawler.max_tokens,
            max_content_length: config.crawler.max_content_length,
        };

        let extractor = Extractor::new(
            Arc::clone(&context.frontier),
            Arc::clone(&context.visited),
            Arc::clone(&context.robots),
            Arc::clone(&context.store),
            limits,
            config.crawler.store_page_limit as u64,
        );

        Self {
            seed_url: config.crawler.seed_url.clone(),
            max_pages: config.crawler.max_pages as u64,
            fetch_timeout: config.crawler.fetch_timeout(),
            context,
            fetcher,
            extractor,
            shutdown: CancellationToken::new(),
        }
    }

    /// Creates a coordinator that fetches over HTTP
    pub fn from_config(config: &Config, context: CrawlContext) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(&config.user_agent, config.crawler.fetch_timeout())?;
        Ok(Self::new(config, context, Arc::new(fetcher)))
    }

    pub fn context(&self) -> &CrawlContext {
        &self.context
    }

    /// Token cancelled when the crawl loop exits
    ///
    /// Background tasks tied to the crawl (the stats sampler) should stop
    /// when it fires.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Enqueues the seed and processes it
    ///
    /// Returns `None` if the seed could not be enqueued.
    pub async fn crawl_seed(&self) -> Option<IterationOutcome> {
        let CrawlContext {
            frontier, visited, ..
        } = &self.context;

        frontier.enqueue(&self.seed_url, visited);
        let url = frontier.dequeue()?;
        Some(self.process(&url).await)
    }

    /// Whether the loop should take another URL
    pub fn should_continue(&self) -> bool {
        self.context.frontier.size() > 0 && self.context.visited.size() < self.max_pages
    }

    /// Runs the crawl to completion
    ///
    /// After the loop exits the shutdown token is cancelled, the stats are
    /// marked finished, and the final report is returned.
    pub async fn run(&self) -> CrawlReport {
        tracing::info!(seed = %self.seed_url, max_pages = self.max_pages, "Starting crawl");

        self.crawl_seed().await;

        while self.should_continue() {
            let Some(url) = self.context.frontier.dequeue() else {
                break;
            };
            self.process(&url).await;
        }

        self.shutdown.cancel();
        self.context.stats.mark_finished();

        let report = CrawlReport::capture(
            &self.context.frontier,
            &self.context.visited,
            &self.context.stats,
        );
        tracing::info!(
            crawled = report.crawled,
            total_queued = report.total_queued,
            pending = report.queue_size,
            "Crawl finished"
        );
        report
    }

    /// One loop iteration for a dequeued URL
    async fn process(&self, url: &str) -> IterationOutcome {
        self.context.visited.add(url);

        let verdict = self.context.robots.is_allowed(url).await;
        if !verdict.allowed {
            tracing::info!(url = %url, "Robots.txt disallows crawling");
            return IterationOutcome::Disallowed;
        }

        if !verdict.crawl_delay.is_zero() {
            tracing::debug!(url = %url, delay = ?verdict.crawl_delay, "Honouring crawl delay");
            tokio::time::sleep(verdict.crawl_delay).await;
        }

        let body = match tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(url)).await {
            Ok(body) => body,
            Err(_) => {
                tracing::warn!(url = %url, "Fetch timed out");
                Vec::new()
            }
        };

        if body.is_empty() {
            return IterationOutcome::Empty;
        }

        IterationOutcome::Extracted(self.extractor.extract(url, &body).await)
    }
}
