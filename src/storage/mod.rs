//! Storage module for persisting crawled pages
//!
//! This module handles everything the crawler and the search API need from
//! a page store:
//! - the [`PageStore`] capability trait
//! - a SQLite backend for persistent runs
//! - an in-memory backend when persistence is disabled
//! - the [`Page`] record shared by both

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use traits::{PageStore, StorageError, StorageResult};

use crate::config::DatabaseConfig;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// A crawled page
///
/// `score` is only set on search results and is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub url: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Page {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            content: content.into(),
            score: None,
        }
    }
}

/// Opens the page store selected by the database configuration
///
/// A disabled database yields an in-memory store.
pub fn open_store(config: &DatabaseConfig) -> StorageResult<Arc<dyn PageStore>> {
    if !config.enabled {
        tracing::info!("Database persistence disabled, keeping pages in memory");
        return Ok(Arc::new(MemoryStorage::new()));
    }

    let path = Path::new(&config.path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let store = SqliteStorage::new(path, config.clear_on_start)?;
    tracing::info!(path = %config.path, "Opened SQLite page store");
    Ok(Arc::new(store))
}
