//! End-of-crawl report

use crate::frontier::{Frontier, VisitedSet};
use crate::output::CrawlStats;

/// Final counters captured when the crawl loop exits
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    pub total_queued: u64,
    pub queue_size: usize,
    pub crawled: u64,
    pub summary: String,
}

impl CrawlReport {
    pub fn capture(frontier: &Frontier, visited: &VisitedSet, stats: &CrawlStats) -> Self {
        Self {
            total_queued: frontier.total_queued(),
            queue_size: frontier.size(),
            crawled: visited.size(),
            summary: stats.summary(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "\n------------------CRAWLER STATS------------------\n\
             Total queued: {}\n\
             To be crawled (Queue) size: {}\n\
             Crawled size: {}\n\
             {}",
            self.total_queued, self.queue_size, self.crawled, self.summary
        )
    }
}

/// Prints the report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("{}", report.render());
}
