//! SQLite persistence for the latest schedule snapshot.
//!
//! Storage holds exactly one logical record, replaced wholesale on every
//! refresh. It exists so a restart can serve the previous snapshot while
//! the first scrape runs (stale-but-available over empty); there is no
//! history.

pub mod repository;
pub mod schema;

pub use repository::SnapshotRepository;
pub use schema::create_tables;
