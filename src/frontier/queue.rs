use super::VisitedSet;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct QueueInner {
    urls: VecDeque<String>,
    total_queued: u64,
}

/// FIFO queue of URLs awaiting a fetch
///
/// Enqueue rejects URLs that are already visited or already pending. The
/// check and the push happen under one lock, so two tasks racing to enqueue
/// the same URL leave exactly one copy behind.
#[derive(Debug, Default)]
pub struct Frontier {
    inner: Mutex<QueueInner>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a URL to the back of the queue
    ///
    /// Returns `true` if the URL was added. The duplicate scan is linear in
    /// the number of pending URLs.
    pub fn enqueue(&self, url: &str, visited: &VisitedSet) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        if visited.contains(url) {
            return false;
        }

        if inner.urls.iter().any(|pending| pending == url) {
            return false;
        }

        inner.urls.push_back(url.to_string());
        inner.total_queued += 1;
        true
    }

    /// Removes and returns the oldest pending URL
    pub fn dequeue(&self) -> Option<String> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .urls
            .pop_front()
    }

    /// Number of URLs currently pending
    pub fn size(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).urls.len()
    }

    /// Number of successful enqueues over the queue's lifetime
    pub fn total_queued(&self) -> u64 {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .total_queued
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Snapshot of the pending URLs in dequeue order
    pub fn pending(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .urls
            .iter()
            .cloned()
            .collect()
    }
}
