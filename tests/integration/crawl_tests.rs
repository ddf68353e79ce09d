//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use kumo_search::config::{
    Config, CrawlerConfig, DatabaseConfig, ServerConfig, StatsConfig, UserAgentConfig,
    VisitedCounting,
};
use kumo_search::crawler::{Coordinator, CrawlContext, IterationOutcome};
use kumo_search::storage::{open_store, MemoryStorage, PageStore, SqliteStorage};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling from `seed`
fn create_test_config(seed: &str, max_pages: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: seed.to_string(),
            max_pages,
            store_page_limit: max_pages,
            max_tokens: 25_000,
            max_content_length: 15_000,
            fetch_timeout_secs: 5,
            robots_timeout_secs: 5,
            visited_counting: VisitedCounting::EveryAdd,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        database: DatabaseConfig::default(),
        server: ServerConfig::default(),
        stats: StatsConfig::default(),
    }
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html")
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ))
}

async fn mount_page(server: &MockServer, route: &str, title: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(title, body))
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, robots: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(robots))
        .expect(1)
        .mount(server)
        .await;
}

fn memory_coordinator(config: &Config) -> Coordinator {
    let store: Arc<dyn PageStore> = Arc::new(MemoryStorage::new());
    let context = CrawlContext::from_config(config, store).expect("Failed to build context");
    Coordinator::from_config(config, context).expect("Failed to build coordinator")
}

#[tokio::test]
async fn test_seed_iteration_filters_disallowed_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /private").await;
    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"Welcome<a href="/public">public</a><a href="/private">private</a>"#,
    )
    .await;

    let config = create_test_config(&format!("{}/", base_url), 100);
    let coordinator = memory_coordinator(&config);

    let outcome = coordinator.crawl_seed().await.expect("Seed was not enqueued");

    match outcome {
        IterationOutcome::Extracted(extraction) => {
            assert_eq!(extraction.enqueued, 1);
            assert_eq!(extraction.disallowed, 1);
            assert!(extraction.persisted);
            assert_eq!(extraction.title, "Home");
        }
        other => panic!("Unexpected outcome: {:?}", other),
    }

    let context = coordinator.context();
    assert_eq!(context.frontier.pending(), vec![format!("{}/public", base_url)]);
    assert!(context.visited.contains(&format!("{}/", base_url)));

    let (pages, total) = context.store.list_pages(1, 10).unwrap();
    assert_eq!(total, 1);
    assert_eq!(pages[0].title, "Home");
    assert!(pages[0].content.starts_with("Welcome"));
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /private").await;
    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<a href="/about">about</a><a href="/private">private</a>"#,
    )
    .await;
    mount_page(&mock_server, "/about", "About", r#"About us<a href="/team">team</a>"#).await;
    mount_page(&mock_server, "/team", "Team", r#"The team<a href="/">home</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(html_page("Secret", "hidden"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", base_url), 100);
    let coordinator = memory_coordinator(&config);

    let report = coordinator.run().await;

    assert_eq!(report.crawled, 3);
    assert_eq!(report.total_queued, 3);
    assert_eq!(report.queue_size, 0);

    let store = &coordinator.context().store;
    assert_eq!(store.count_pages().unwrap(), 3);

    let (results, total) = store.search_pages("team", 1, 10).unwrap();
    assert_eq!(total, 2);
    assert_eq!(results[0].title, "Team");
}

#[tokio::test]
async fn test_page_ceiling_limits_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let links: String = (0..10)
        .map(|i| format!("<a href=\"/p{}\">p{}</a>", i, i))
        .collect();
    mount_page(&mock_server, "/", "Hub", &links).await;
    for i in 0..10 {
        mount_page(&mock_server, &format!("/p{}", i), "Leaf", "leaf").await;
    }

    let config = create_test_config(&format!("{}/", base_url), 4);
    let coordinator = memory_coordinator(&config);

    let report = coordinator.run().await;

    assert_eq!(report.crawled, 4);
    assert_eq!(report.total_queued, 11);
    assert_eq!(report.queue_size, 7);
    assert_eq!(
        coordinator.context().frontier.pending().first(),
        Some(&format!("{}/p3", base_url))
    );
}

#[tokio::test]
async fn test_crawl_delay_is_honoured() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: TestBot\nCrawl-delay: 1\n").await;
    mount_page(&mock_server, "/", "Home", r#"<a href="/next">next</a>"#).await;
    mount_page(&mock_server, "/next", "Next", "end").await;

    let config = create_test_config(&format!("{}/", base_url), 100);
    let coordinator = memory_coordinator(&config);

    let started = Instant::now();
    let report = coordinator.run().await;

    assert_eq!(report.crawled, 2);
    assert!(
        started.elapsed() >= Duration::from_secs(2),
        "Crawl finished too quickly: {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_failed_fetches_do_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<a href="/missing">gone</a><a href="/ok">ok</a>"#,
    )
    .await;
    mount_page(&mock_server, "/ok", "Ok", "fine").await;
    // Anything else, /missing included, falls through to wiremock's 404

    let config = create_test_config(&format!("{}/", base_url), 100);
    let coordinator = memory_coordinator(&config);

    let report = coordinator.run().await;

    assert_eq!(report.crawled, 3);
    assert_eq!(coordinator.context().store.count_pages().unwrap(), 2);
}

#[tokio::test]
async fn test_crawl_persists_to_sqlite() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("nested").join("pages.db");

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", "Rust Home", r#"Systems<a href="/book">book</a>"#).await;
    mount_page(&mock_server, "/book", "The Book", "Learn rust").await;

    let mut config = create_test_config(&format!("{}/", base_url), 100);
    config.database = DatabaseConfig {
        enabled: true,
        path: db_path.to_string_lossy().to_string(),
        clear_on_start: true,
    };

    {
        let store = open_store(&config.database).expect("Failed to open store");
        let context = CrawlContext::from_config(&config, store).unwrap();
        let coordinator = Coordinator::from_config(&config, context).unwrap();
        coordinator.run().await;
    }

    let reopened = SqliteStorage::new(&db_path, false).expect("Failed to reopen database");
    assert_eq!(reopened.count_pages().unwrap(), 2);

    let (results, total) = reopened.search_pages("rust", 1, 10).unwrap();
    assert_eq!(total, 2);
    assert_eq!(results[0].title, "Rust Home");
}
