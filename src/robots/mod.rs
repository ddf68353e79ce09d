//! Robots.txt handling module
//!
//! This module fetches, parses, and caches robots.txt files, and answers
//! whether a URL may be crawled and with what delay.

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::{matches_pattern, RobotsPolicy, RobotsVerdict, RuleGroup};
