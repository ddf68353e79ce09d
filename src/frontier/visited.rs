use crate::config::VisitedCounting;
use crate::url::url_hash;
use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct VisitedInner {
    hashes: HashSet<u64>,
    count: u64,
}

/// Thread-safe record of URLs the crawler has taken responsibility for
///
/// Membership is keyed on a 64-bit hash of the URL string, so the set never
/// stores URLs themselves. How `size` grows is controlled by
/// [`VisitedCounting`]: under `EveryAdd` every call to [`add`](Self::add)
/// counts, under `Distinct` only first insertions do.
#[derive(Debug)]
pub struct VisitedSet {
    inner: RwLock<VisitedInner>,
    counting: VisitedCounting,
}

impl VisitedSet {
    pub fn new(counting: VisitedCounting) -> Self {
        Self {
            inner: RwLock::new(VisitedInner::default()),
            counting,
        }
    }

    /// Marks a URL as visited
    ///
    /// Returns `true` if the URL was not present before.
    pub fn add(&self, url: &str) -> bool {
        let hash = url_hash(url);
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());

        let inserted = inner.hashes.insert(hash);
        if inserted || self.counting == VisitedCounting::EveryAdd {
            inner.count += 1;
        }
        inserted
    }

    pub fn contains(&self, url: &str) -> bool {
        let hash = url_hash(url);
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .hashes
            .contains(&hash)
    }

    /// Number of visits recorded so far
    pub fn size(&self) -> u64 {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).count
    }

    pub fn counting(&self) -> VisitedCounting {
        self.counting
    }
}

impl Default for VisitedSet {
    fn default() -> Self {
        Self::new(VisitedCounting::default())
    }
}
