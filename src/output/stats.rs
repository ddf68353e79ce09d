//! Live crawl statistics
//!
//! [`CrawlStats`] records when the crawl started, keeps two per-minute
//! time series, and fans point-in-time snapshots out to subscribers over a
//! broadcast channel. The periodic sampler and publisher tasks that drive it
//! stop when their cancellation token fires.

use crate::config::StatsConfig;
use crate::frontier::{Frontier, VisitedSet};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;

/// Snapshots buffered per subscriber before it starts lagging
const SNAPSHOT_CHANNEL_CAPACITY: usize = 16;

/// Whether the crawl loop is still active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStatus {
    Running,
    Finished,
}

/// Point-in-time view of crawl progress
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_crawled: u64,
    pub total_queued: u64,
    pub queue_size: usize,
    /// Pages crawled per minute of uptime
    pub crawl_rate: f64,
    /// Crawled pages over everything ever queued
    pub crawled_to_queued: f64,
    pub uptime_minutes: f64,
    pub status: CrawlStatus,
}

#[derive(Debug)]
struct StatsSeries {
    /// (minutes since start, pages crawled)
    pages_crawled: Vec<(f64, u64)>,
    /// (minutes since start, crawled / pending)
    crawled_to_pending: Vec<(f64, f64)>,
}

impl Default for StatsSeries {
    fn default() -> Self {
        Self {
            pages_crawled: vec![(0.0, 0)],
            crawled_to_pending: vec![(0.0, 0.0)],
        }
    }
}

/// Divides, yielding zero for an empty denominator
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[derive(Debug)]
pub struct CrawlStats {
    started_at: DateTime<Utc>,
    series: RwLock<StatsSeries>,
    finished: AtomicBool,
    snapshots: broadcast::Sender<StatsSnapshot>,
}

impl CrawlStats {
    pub fn new() -> Self {
        let (snapshots, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            started_at: Utc::now(),
            series: RwLock::new(StatsSeries::default()),
            finished: AtomicBool::new(false),
            snapshots,
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn uptime_minutes(&self) -> f64 {
        self.minutes_at(Utc::now())
    }

    fn minutes_at(&self, at: DateTime<Utc>) -> f64 {
        let elapsed = at - self.started_at;
        elapsed.num_milliseconds().max(0) as f64 / 60_000.0
    }

    /// Appends one row to each time series from the current counters
    pub fn sample(&self, frontier: &Frontier, visited: &VisitedSet) {
        self.sample_at(Utc::now(), frontier, visited);
    }

    fn sample_at(&self, at: DateTime<Utc>, frontier: &Frontier, visited: &VisitedSet) {
        let minutes = self.minutes_at(at);
        let crawled = visited.size();
        let pending = frontier.size();

        let mut series = self.series.write().unwrap_or_else(|e| e.into_inner());
        series.pages_crawled.push((minutes, crawled));
        series
            .crawled_to_pending
            .push((minutes, ratio(crawled as f64, pending as f64)));
    }

    /// Renders both series as text, one `minutes value` row per line
    pub fn summary(&self) -> String {
        let series = self.series.read().unwrap_or_else(|e| e.into_inner());
        let mut out = String::from("Pages crawled per minute:\n");

        for (minutes, crawled) in &series.pages_crawled {
            out.push_str(&format!("{:.6} {}\n", minutes, crawled));
        }

        out.push_str("\nCrawl to Queued Ratio per minute:\n");
        for (minutes, value) in &series.crawled_to_pending {
            out.push_str(&format!("{:.6} {:.6}\n", minutes, value));
        }

        out
    }

    /// Number of sampler ticks recorded, excluding the initial zero row
    pub fn samples(&self) -> usize {
        self.series
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .pages_crawled
            .len()
            - 1
    }

    pub fn snapshot(&self, frontier: &Frontier, visited: &VisitedSet) -> StatsSnapshot {
        let uptime_minutes = self.uptime_minutes();
        let total_crawled = visited.size();
        let total_queued = frontier.total_queued();

        StatsSnapshot {
            total_crawled,
            total_queued,
            queue_size: frontier.size(),
            crawl_rate: ratio(total_crawled as f64, uptime_minutes),
            crawled_to_queued: ratio(total_crawled as f64, total_queued as f64),
            uptime_minutes,
            status: self.status(),
        }
    }

    pub fn status(&self) -> CrawlStatus {
        if self.finished.load(Ordering::SeqCst) {
            CrawlStatus::Finished
        } else {
            CrawlStatus::Running
        }
    }

    pub fn mark_finished(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatsSnapshot> {
        self.snapshots.subscribe()
    }

    /// Sends a fresh snapshot to every subscriber
    ///
    /// Returns the number of subscribers reached.
    pub fn publish(&self, frontier: &Frontier, visited: &VisitedSet) -> usize {
        self.snapshots
            .send(self.snapshot(frontier, visited))
            .unwrap_or(0)
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the sampler and publisher tasks
///
/// The sampler records a series row and publishes on every
/// `sample_interval_secs` tick; the publisher only publishes, on the shorter
/// `publish_interval_secs` tick. Neither fires immediately. Both exit once
/// `shutdown` is cancelled.
pub fn spawn_stats_tasks(
    stats: Arc<CrawlStats>,
    frontier: Arc<Frontier>,
    visited: Arc<VisitedSet>,
    config: &StatsConfig,
    shutdown: CancellationToken,
) -> Vec<JoinHandle<()>> {
    let sample_every = Duration::from_secs(config.sample_interval_secs);
    let publish_every = Duration::from_secs(config.publish_interval_secs);

    let sampler = {
        let stats = Arc::clone(&stats);
        let frontier = Arc::clone(&frontier);
        let visited = Arc::clone(&visited);
        let shutdown = shutdown.clone();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + sample_every, sample_every);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        stats.sample(&frontier, &visited);
                        stats.publish(&frontier, &visited);
                        tracing::debug!(crawled = visited.size(), pending = frontier.size(), "Sampled crawl stats");
                    }
                }
            }
        })
    };

    let publisher = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + publish_every, publish_every);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    stats.publish(&frontier, &visited);
                }
            }
        }
    });

    vec![sampler, publisher]
}
