//! Output module for crawl statistics and reports
//!
//! This module handles:
//! - Live statistics sampled and published while the crawl runs
//! - The report printed once the crawl loop exits

mod report;
pub mod stats;

pub use report::{print_report, CrawlReport};
pub use stats::{spawn_stats_tasks, CrawlStats, CrawlStatus, StatsSnapshot};
