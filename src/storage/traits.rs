//! Storage traits and error types
//!
//! This module defines the capability interface every page store implements
//! and the error type its operations return.

use crate::search::{paginate, rank_pages};
use crate::storage::Page;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for page store implementations
///
/// Stores are shared between the crawl loop and the API handlers, so every
/// implementation provides its own interior synchronisation.
pub trait PageStore: Send + Sync {
    /// Persists a crawled page
    fn insert_page(&self, page: &Page) -> StorageResult<()>;

    /// Returns every page whose title, content or URL contains `query`
    ///
    /// Matching is a case-insensitive substring test. Pages come back in
    /// insertion order, which is the tie-break order for ranking.
    fn matching_pages(&self, query: &str) -> StorageResult<Vec<Page>>;

    /// Returns one page of stored pages, newest first, with the total count
    fn list_pages(&self, page: usize, limit: usize) -> StorageResult<(Vec<Page>, usize)>;

    /// Number of stored pages
    fn count_pages(&self) -> StorageResult<usize>;

    /// Relevance-ranked keyword search
    ///
    /// Every match is scored, the matches are sorted by descending score
    /// (equal scores keep insertion order) and the requested page is sliced
    /// out. The returned total is the number of matches before pagination.
    fn search_pages(
        &self,
        query: &str,
        page: usize,
        limit: usize,
    ) -> StorageResult<(Vec<Page>, usize)> {
        let matches = self.matching_pages(query)?;
        let total = matches.len();
        let ranked = rank_pages(matches, query);
        Ok((paginate(ranked, page, limit), total))
    }
}
