//! SQLite repository for the snapshot record.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::schema::create_tables;
use crate::types::ScheduleSnapshot;

/// Repository over the single snapshot record.
pub struct SnapshotRepository {
    conn: Connection,
}

impl SnapshotRepository {
    /// Open (or create) the database at `db_path`.
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).context("failed to create database directory")?;
        }

        let conn = Connection::open(db_path).context("failed to open database")?;
        create_tables(&conn)?;

        Ok(Self { conn })
    }

    /// Create an in-memory repository (for testing).
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Replace the stored snapshot wholesale.
    pub fn replace(&self, snapshot: &ScheduleSnapshot) -> Result<()> {
        let data = serde_json::to_string(snapshot).context("failed to serialize snapshot")?;
        self.conn.execute(
            "INSERT OR REPLACE INTO snapshots (id, scraped_at, data) VALUES (1, ?1, ?2)",
            params![snapshot.scraped_at.to_rfc3339(), data],
        )?;
        Ok(())
    }

    /// The most recently stored snapshot, if any.
    pub fn latest(&self) -> Result<Option<ScheduleSnapshot>> {
        let data: Option<String> = self
            .conn
            .query_row("SELECT data FROM snapshots WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match data {
            Some(data) => {
                let snapshot =
                    serde_json::from_str(&data).context("failed to deserialize stored snapshot")?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }
}
