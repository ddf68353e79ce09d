//! Request handlers for the API server.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;

use super::AppState;
use crate::output::StatsSnapshot;
use crate::search::total_pages;
use crate::storage::{Page, StorageResult};

/// Results per page for `/api/search`
pub const SEARCH_PAGE_SIZE: usize = 10;
/// Default results per page for `/api/pages`
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Upper bound on `limit` for `/api/pages`
pub const MAX_PAGE_SIZE: usize = 100;

/// Query parameters are taken as strings so malformed numbers fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PagesParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// One page of results plus paging metadata
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse {
    pub pages: Vec<Page>,
    pub total_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
}

impl PagedResponse {
    fn from_result(result: StorageResult<(Vec<Page>, usize)>, page: usize, limit: usize) -> Self {
        match result {
            Ok((pages, total)) => Self {
                pages,
                total_count: total,
                current_page: page,
                total_pages: total_pages(total, limit),
            },
            Err(e) => {
                tracing::error!(error = %e, "Page store query failed");
                Self {
                    pages: Vec::new(),
                    total_count: 0,
                    current_page: page,
                    total_pages: 0,
                }
            }
        }
    }
}

fn parse_or(value: Option<&str>, default: usize) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

/// Current crawl counters.
pub async fn api_stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.snapshot())
}

/// Relevance-ranked keyword search.
pub async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<PagedResponse> {
    let query = params.q.unwrap_or_default();
    let page = parse_or(params.page.as_deref(), 1).max(1);

    tracing::debug!(query = %query, page, "Search request");
    let result = state.store.search_pages(&query, page, SEARCH_PAGE_SIZE);

    Json(PagedResponse::from_result(result, page, SEARCH_PAGE_SIZE))
}

/// Stored pages, newest first.
pub async fn api_pages(
    State(state): State<AppState>,
    Query(params): Query<PagesParams>,
) -> Json<PagedResponse> {
    let page = parse_or(params.page.as_deref(), 1).max(1);
    let limit = parse_or(params.limit.as_deref(), DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let result = state.store.list_pages(page, limit);

    Json(PagedResponse::from_result(result, page, limit))
}

/// Upgrades to a WebSocket that streams stats snapshots.
pub async fn ws_stats(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| stream_stats(socket, state))
}

async fn send_snapshot(socket: &mut WebSocket, snapshot: &StatsSnapshot) -> Result<(), axum::Error> {
    let text = serde_json::to_string(snapshot).map_err(axum::Error::new)?;
    socket.send(Message::Text(text)).await
}

/// Sends the current snapshot, then every published one, until the client
/// goes away.
async fn stream_stats(mut socket: WebSocket, state: AppState) {
    let mut updates = state.stats.subscribe();

    if send_snapshot(&mut socket, &state.snapshot()).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(snapshot) => {
                    if send_snapshot(&mut socket, &snapshot).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Stats subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::debug!("Stats WebSocket closed");
}
