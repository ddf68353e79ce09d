//! Crawl frontier for Kumo
//!
//! The frontier is two shared structures: the [`VisitedSet`] of URLs already
//! taken by the crawler, and the [`Frontier`] queue of URLs still pending.
//! Both are safe to share across tasks behind an `Arc`.

mod queue;
mod visited;

pub use queue::Frontier;
pub use visited::VisitedSet;
