//! In-memory page store
//!
//! Used when database persistence is disabled, so search keeps working for
//! the lifetime of the process. Nothing survives a restart.

use crate::storage::traits::{PageStore, StorageResult};
use crate::storage::Page;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    pages: RwLock<Vec<Page>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageStore for MemoryStorage {
    fn insert_page(&self, page: &Page) -> StorageResult<()> {
        let mut stored = page.clone();
        stored.score = None;
        self.pages
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(stored);
        Ok(())
    }

    fn matching_pages(&self, query: &str) -> StorageResult<Vec<Page>> {
        let needle = query.to_lowercase();
        let pages = self.pages.read().unwrap_or_else(|e| e.into_inner());

        Ok(pages
            .iter()
            .filter(|p| {
                p.title.to_lowercase().contains(&needle)
                    || p.content.to_lowercase().contains(&needle)
                    || p.url.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    fn list_pages(&self, page: usize, limit: usize) -> StorageResult<(Vec<Page>, usize)> {
        let pages = self.pages.read().unwrap_or_else(|e| e.into_inner());
        let offset = page.max(1).saturating_sub(1).saturating_mul(limit);

        let slice = pages.iter().rev().skip(offset).take(limit).cloned().collect();
        Ok((slice, pages.len()))
    }

    fn count_pages(&self) -> StorageResult<usize> {
        Ok(self.pages.read().unwrap_or_else(|e| e.into_inner()).len())
    }
}
