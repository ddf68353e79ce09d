//! Database schema definitions
//!
//! This module contains the SQL schema for the Kumo page store.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Pages persisted by the crawler, in crawl order
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    content TEXT NOT NULL DEFAULT '',
    inserted_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_pages_url ON pages(url);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Deletes every stored page
///
/// Each crawl run starts from an empty store unless configured otherwise.
pub fn clear_pages(conn: &rusqlite::Connection) -> Result<usize, rusqlite::Error> {
    conn.execute("DELETE FROM pages", [])
}
