//! Kumo main entry point
//!
//! This is the command-line interface for the Kumo crawler and search server.

use clap::Parser;
use kumo_search::config::{load_config_with_hash, Config};
use kumo_search::crawler::{Coordinator, CrawlContext};
use kumo_search::output::{print_report, spawn_stats_tasks, CrawlReport};
use kumo_search::server::{serve, AppState};
use kumo_search::storage::open_store;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Kumo: a polite breadth-first crawler with keyword search
///
/// Kumo crawls outward from a seed URL while respecting robots.txt and
/// crawl delays, stores what it finds, and serves a ranked keyword search
/// and live crawl statistics over HTTP.
#[derive(Parser, Debug)]
#[command(name = "kumo-search")]
#[command(version)]
#[command(about = "A polite breadth-first web crawler with keyword search", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Crawl without starting the API server
    #[arg(long)]
    no_serve: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Environment overrides may live in a .env file
    dotenvy::dotenv().ok();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, !cli.no_serve).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kumo_search=info,warn"),
            1 => EnvFilter::new("kumo_search=debug,info"),
            2 => EnvFilter::new("kumo_search=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Kumo Dry Run ===\n");

    println!("Crawler:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Store page limit: {}", config.crawler.store_page_limit);
    println!("  Max tokens per page: {}", config.crawler.max_tokens);
    println!("  Max content length: {}", config.crawler.max_content_length);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
    println!("  Robots timeout: {}s", config.crawler.robots_timeout_secs);
    println!("  Visited counting: {:?}", config.crawler.visited_counting);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nDatabase:");
    if config.database.enabled {
        println!("  SQLite: {}", config.database.path);
        println!("  Clear on start: {}", config.database.clear_on_start);
    } else {
        println!("  Disabled (pages kept in memory)");
    }

    println!("\nServer:");
    if config.server.enabled {
        println!("  http://{}:{}", config.server.host, config.server.port);
    } else {
        println!("  Disabled");
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, serve_api: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&config.database)?;
    let context = CrawlContext::from_config(&config, store)?;
    let coordinator = Coordinator::from_config(&config, context.clone())?;

    let server_shutdown = CancellationToken::new();
    let server = if serve_api && config.server.enabled {
        let state = AppState::from(&context);
        let host = config.server.host.clone();
        let port = config.server.port;
        let token = server_shutdown.clone();

        Some(tokio::spawn(async move {
            if let Err(e) = serve(state, &host, port, token).await {
                tracing::error!("API server failed: {}", e);
            }
        }))
    } else {
        None
    };

    let stats_tasks = spawn_stats_tasks(
        context.stats.clone(),
        context.frontier.clone(),
        context.visited.clone(),
        &config.stats,
        coordinator.shutdown_token(),
    );

    let mut interrupted = false;
    let report = tokio::select! {
        report = coordinator.run() => report,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, stopping crawl");
            interrupted = true;
            coordinator.shutdown_token().cancel();
            context.stats.mark_finished();
            CrawlReport::capture(&context.frontier, &context.visited, &context.stats)
        }
    };

    for task in stats_tasks {
        let _ = task.await;
    }

    print_report(&report);

    if let Some(server) = server {
        if !interrupted {
            tracing::info!("Crawl complete; search API still available, press Ctrl-C to exit");
            let _ = tokio::signal::ctrl_c().await;
        }
        server_shutdown.cancel();
        let _ = server.await;
    }

    Ok(())
}
