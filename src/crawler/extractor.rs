//! Turns a fetched page into frontier entries and a stored page
//!
//! Every followable link on the page is offered to the frontier, provided it
//! has not been visited and robots.txt allows it. The page itself is stored
//! only while the visited count is below the store ceiling; links are kept
//! either way.

use crate::crawler::parser::{parse_page, ExtractionLimits};
use crate::frontier::{Frontier, VisitedSet};
use crate::robots::RobotsCache;
use crate::storage::{Page, PageStore};
use std::sync::Arc;
use url::Url;

/// What one extraction did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionOutcome {
    /// Links that made it into the frontier
    pub enqueued: usize,
    /// Links dropped because robots.txt disallows them
    pub disallowed: usize,
    /// Whether the page was handed to the store
    pub persisted: bool,
    /// Whether the node cap cut the scan short
    pub truncated: bool,
    pub title: String,
}

pub struct Extractor {
    frontier: Arc<Frontier>,
    visited: Arc<VisitedSet>,
    robots: Arc<RobotsCache>,
    store: Arc<dyn PageStore>,
    limits: ExtractionLimits,
    store_page_limit: u64,
}

impl Extractor {
    pub fn new(
        frontier: Arc<Frontier>,
        visited: Arc<VisitedSet>,
        robots: Arc<RobotsCache>,
        store: Arc<dyn PageStore>,
        limits: ExtractionLimits,
        store_page_limit: u64,
    ) -> Self {
        Self {
            frontier,
            visited,
            robots,
            store,
            limits,
            store_page_limit,
        }
    }

    /// Extracts `body` fetched from `url`
    ///
    /// An unparsable page URL yields an empty outcome; nothing is enqueued
    /// or stored. Storage failures are logged and never returned.
    pub async fn extract(&self, url: &str, body: &[u8]) -> ExtractionOutcome {
        let base = match Url::parse(url) {
            Ok(base) => base,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Cannot extract from unparsable URL");
                return ExtractionOutcome::default();
            }
        };

        let parsed = parse_page(body, &base, self.limits);
        if parsed.truncated {
            tracing::debug!(url = %url, max_tokens = self.limits.max_tokens, "Token cap reached");
        }
        if !parsed.title.is_empty() {
            tracing::info!(count = self.visited.size(), url = %url, title = %parsed.title, "Crawled page");
        }

        let mut outcome = ExtractionOutcome {
            truncated: parsed.truncated,
            title: parsed.title.clone(),
            ..ExtractionOutcome::default()
        };

        for link in &parsed.links {
            if self.visited.contains(link) {
                continue;
            }

            if !self.robots.is_allowed(link).await.allowed {
                tracing::debug!(url = %link, "Discovered link disallowed by robots.txt");
                outcome.disallowed += 1;
                continue;
            }

            if self.frontier.enqueue(link, &self.visited) {
                outcome.enqueued += 1;
            }
        }

        if self.visited.size() < self.store_page_limit {
            let page = Page::new(url, parsed.title, parsed.content);
            match self.store.insert_page(&page) {
                Ok(()) => {
                    tracing::debug!(url = %url, "Stored page");
                    outcome.persisted = true;
                }
                Err(e) => tracing::warn!(url = %url, error = %e, "Failed to store page"),
            }
        }

        outcome
    }
}
