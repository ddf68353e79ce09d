//! Integration tests for the HTTP API
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot` over an
//! in-memory page store.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use kumo_search::frontier::{Frontier, VisitedSet};
use kumo_search::output::CrawlStats;
use kumo_search::server::{create_router, AppState};
use kumo_search::storage::{MemoryStorage, Page, PageStore};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    state: AppState,
    store: Arc<MemoryStorage>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(MemoryStorage::new());
        let state = AppState {
            frontier: Arc::new(Frontier::new()),
            visited: Arc::new(VisitedSet::default()),
            store: store.clone(),
            stats: Arc::new(CrawlStats::new()),
        };
        Self { state, store }
    }

    fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    fn insert(&self, url: &str, title: &str, content: &str) {
        self.store.insert_page(&Page::new(url, title, content)).unwrap();
    }
}

async fn get_json(app: Router, uri: &str) -> serde_json::Value {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_api_stats_shape() {
    let app = TestApp::new();
    let visited = &app.state.visited;
    app.state.frontier.enqueue("https://example.com/", visited);
    app.state.frontier.enqueue("https://example.com/a", visited);
    let url = app.state.frontier.dequeue().unwrap();
    visited.add(&url);

    let json = get_json(app.router(), "/api/stats").await;

    assert_eq!(json["totalCrawled"], 1);
    assert_eq!(json["totalQueued"], 2);
    assert_eq!(json["queueSize"], 1);
    assert_eq!(json["crawledToQueued"], 0.5);
    assert_eq!(json["status"], "running");
    assert!(json["crawlRate"].is_number());
    assert!(json["uptimeMinutes"].is_number());
}

#[tokio::test]
async fn test_api_stats_reports_finished() {
    let app = TestApp::new();
    app.state.stats.mark_finished();

    let json = get_json(app.router(), "/api/stats").await;

    assert_eq!(json["status"], "finished");
    assert_eq!(json["crawledToQueued"], 0.0);
}

#[tokio::test]
async fn test_api_search_ranks_title_matches_first() {
    let app = TestApp::new();
    app.insert("https://example.com/a", "Cooking", "a page about rust removal");
    app.insert("https://example.com/b", "Rust", "systems language");
    app.insert("https://example.com/c", "Gardening", "nothing relevant");

    let json = get_json(app.router(), "/api/search?q=RUST").await;

    assert_eq!(json["totalCount"], 2);
    assert_eq!(json["currentPage"], 1);
    assert_eq!(json["totalPages"], 1);
    let pages = json["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["url"], "https://example.com/b");
    assert_eq!(pages[1]["url"], "https://example.com/a");
    assert!(pages[0]["score"].as_f64().unwrap() > pages[1]["score"].as_f64().unwrap());
}

#[tokio::test]
async fn test_api_search_paginates_by_ten() {
    let app = TestApp::new();
    for i in 0..25 {
        app.insert(&format!("https://example.com/{}", i), "Widget", "widget");
    }

    let json = get_json(app.router(), "/api/search?q=widget&page=3").await;

    assert_eq!(json["totalCount"], 25);
    assert_eq!(json["currentPage"], 3);
    assert_eq!(json["totalPages"], 3);
    let pages = json["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 5);
    // Equal scores keep insertion order
    assert_eq!(pages[0]["url"], "https://example.com/20");
}

#[tokio::test]
async fn test_api_search_without_matches() {
    let app = TestApp::new();
    app.insert("https://example.com/", "Home", "welcome");

    let json = get_json(app.router(), "/api/search?q=absent").await;

    assert_eq!(json["totalCount"], 0);
    assert_eq!(json["totalPages"], 0);
    assert!(json["pages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_api_pages_defaults_newest_first() {
    let app = TestApp::new();
    for i in 0..12 {
        app.insert(&format!("https://example.com/{}", i), "Page", "body");
    }

    let json = get_json(app.router(), "/api/pages").await;

    assert_eq!(json["totalCount"], 12);
    assert_eq!(json["currentPage"], 1);
    assert_eq!(json["totalPages"], 2);
    let pages = json["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 10);
    assert_eq!(pages[0]["url"], "https://example.com/11");
    assert!(pages[0].get("score").is_none());
}

#[tokio::test]
async fn test_api_pages_custom_limit() {
    let app = TestApp::new();
    for i in 0..12 {
        app.insert(&format!("https://example.com/{}", i), "Page", "body");
    }

    let json = get_json(app.router(), "/api/pages?page=2&limit=5").await;

    assert_eq!(json["currentPage"], 2);
    assert_eq!(json["totalPages"], 3);
    let pages = json["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 5);
    assert_eq!(pages[0]["url"], "https://example.com/6");
}

#[tokio::test]
async fn test_api_pages_invalid_params_fall_back() {
    let app = TestApp::new();
    for i in 0..3 {
        app.insert(&format!("https://example.com/{}", i), "Page", "body");
    }

    let json = get_json(app.router(), "/api/pages?page=abc&limit=-4").await;

    assert_eq!(json["currentPage"], 1);
    assert_eq!(json["totalCount"], 3);
    assert_eq!(json["totalPages"], 1);
    assert_eq!(json["pages"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_api_pages_limit_capped() {
    let app = TestApp::new();
    for i in 0..150 {
        app.insert(&format!("https://example.com/{}", i), "Page", "body");
    }

    let json = get_json(app.router(), "/api/pages?limit=500").await;

    assert_eq!(json["pages"].as_array().unwrap().len(), 100);
    assert_eq!(json["totalPages"], 2);
}

#[tokio::test]
async fn test_cors_headers_present() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .uri("/api/stats")
                .header("origin", "https://dashboard.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
