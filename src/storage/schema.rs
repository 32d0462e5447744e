//! SQLite schema for snapshot storage.
//!
//! A single-row table: `id` is checked to 1 so `INSERT OR REPLACE` gives
//! wholesale-replace semantics for the one logical record.

use rusqlite::{Connection, Result};

/// Create all tables in the database.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS snapshots (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            scraped_at TEXT NOT NULL,
            data TEXT NOT NULL
        )
        "#,
        [],
    )?;

    Ok(())
}
