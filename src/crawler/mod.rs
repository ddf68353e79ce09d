//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`PageFetcher`] seam
//! - Bounded HTML scanning for title, text and links
//! - Link enqueueing and page persistence
//! - The crawl loop itself

mod coordinator;
mod extractor;
mod fetcher;
mod parser;

pub use coordinator::{Coordinator, CrawlContext, IterationOutcome};
pub use extractor::{ExtractionOutcome, Extractor};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use parser::{parse_page, ExtractionLimits, ParsedPage};
