//! HTTP and WebSocket API for crawl stats and search.
//!
//! Handlers only read shared counters and query the page store; they never
//! wait on the crawl loop.

mod handlers;
mod routes;

pub use handlers::{PagedResponse, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SEARCH_PAGE_SIZE};
pub use routes::create_router;

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::crawler::CrawlContext;
use crate::frontier::{Frontier, VisitedSet};
use crate::output::{CrawlStats, StatsSnapshot};
use crate::storage::PageStore;

/// Shared state for the API server.
#[derive(Clone)]
pub struct AppState {
    pub frontier: Arc<Frontier>,
    pub visited: Arc<VisitedSet>,
    pub store: Arc<dyn PageStore>,
    pub stats: Arc<CrawlStats>,
}

impl AppState {
    pub fn snapshot(&self) -> StatsSnapshot {
        self.stats.snapshot(&self.frontier, &self.visited)
    }
}

impl From<&CrawlContext> for AppState {
    fn from(context: &CrawlContext) -> Self {
        Self {
            frontier: Arc::clone(&context.frontier),
            visited: Arc::clone(&context.visited),
            store: Arc::clone(&context.store),
            stats: Arc::clone(&context.stats),
        }
    }
}

/// Start the API server and run it until `shutdown` is cancelled.
pub async fn serve(
    state: AppState,
    host: &str,
    port: u16,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("API server listening at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    Ok(())
}
