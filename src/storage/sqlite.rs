//! SQLite storage implementation
//!
//! This module provides a SQLite-backed implementation of [`PageStore`].

use crate::storage::schema::{clear_pages, initialize_schema};
use crate::storage::traits::{PageStore, StorageResult};
use crate::storage::Page;
use chrono::Utc;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::Mutex;

/// SQLite storage backend
///
/// The connection sits behind a mutex so one store can be shared between
/// the crawl loop and the API handlers.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path`
    ///
    /// With `clear_on_start` set, pages left over from a previous run are
    /// deleted before the store is handed out.
    pub fn new(path: &Path, clear_on_start: bool) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        register_functions(&conn)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        if clear_on_start {
            let removed = clear_pages(&conn)?;
            tracing::info!(removed, "Database cleared");
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        register_functions(&conn)?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn page_from_row(row: &Row<'_>) -> rusqlite::Result<Page> {
        Ok(Page {
            url: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            score: None,
        })
    }
}

/// Registers `unicode_lower(text)`
///
/// SQLite's built-in `lower()` only folds ASCII, which would make matching
/// disagree with the scorer on non-ASCII titles.
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "unicode_lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

impl PageStore for SqliteStorage {
    fn insert_page(&self, page: &Page) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute(
            "INSERT INTO pages (url, title, content, inserted_at) VALUES (?1, ?2, ?3, ?4)",
            params![page.url, page.title, page.content, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn matching_pages(&self, query: &str) -> StorageResult<Vec<Page>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let mut stmt = conn.prepare(
            "SELECT url, title, content FROM pages
             WHERE instr(unicode_lower(title), unicode_lower(?1)) > 0
                OR instr(unicode_lower(content), unicode_lower(?1)) > 0
                OR instr(unicode_lower(url), unicode_lower(?1)) > 0
             ORDER BY id ASC",
        )?;

        let pages = stmt
            .query_map(params![query], Self::page_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pages)
    }

    fn list_pages(&self, page: usize, limit: usize) -> StorageResult<(Vec<Page>, usize)> {
        let total = self.count_pages()?;

        let offset = page.max(1).saturating_sub(1).saturating_mul(limit);
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let mut stmt = conn.prepare(
            "SELECT url, title, content FROM pages ORDER BY id DESC LIMIT ?1 OFFSET ?2",
        )?;

        let pages = stmt
            .query_map(
                params![limit as i64, offset.min(i64::MAX as usize) as i64],
                Self::page_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((pages, total))
    }

    fn count_pages(&self) -> StorageResult<usize> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
