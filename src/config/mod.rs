//! Configuration module for Kumo
//!
//! This module handles loading, parsing, and validating the TOML configuration
//! file, with optional overrides from the process environment.
//!
//! # Example
//!
//! ```no_run
//! use kumo_search::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("kumo.toml")).unwrap();
//! println!("Crawl ceiling: {}", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, CrawlerConfig, DatabaseConfig, ServerConfig, StatsConfig, UserAgentConfig,
    VisitedCounting,
};

pub use parser::{
    apply_env_overrides, compute_config_hash, load_config, load_config_with_hash,
    ENV_DATABASE_PATH, ENV_DB_ACCESS, ENV_MAX_PAGES, ENV_SEED_URL, ENV_TIMEOUT,
};
pub use validation::validate;
