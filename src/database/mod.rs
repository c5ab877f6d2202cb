use rusqlite::Connection;
use std::path::Path;

use crate::error::Result;
use crate::models::{LaunchEvent, NewLaunch, StoreStats};

pub mod memory;
pub mod queries;
pub mod schema;

pub use memory::MemoryEventStore;

/// Read side of the launch log, the only thing the predictors consume.
pub trait EventSource {
    /// Up to `limit` events, newest first.
    fn get_most_recent(&self, limit: usize) -> Result<Vec<LaunchEvent>>;

    fn get_last(&self) -> Result<Option<LaunchEvent>>;
}

/// Append-only write side of the launch log, used by the collector.
pub trait EventSink {
    fn append(&self, launch: &NewLaunch) -> Result<i64>;
}

pub fn init_database(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;

    // Enable WAL mode
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    schema::create_tables(&conn)?;

    Ok(conn)
}

/// SQLite-backed launch log.
pub struct EventStore {
    conn: Connection,
}

impl EventStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        Ok(Self {
            conn: init_database(db_path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::create_tables(&conn)?;
        Ok(Self { conn })
    }

    pub fn count(&self) -> Result<i64> {
        queries::count(&self.conn)
    }

    pub fn get_all_ascending(&self) -> Result<Vec<LaunchEvent>> {
        queries::get_all_ascending(&self.conn)
    }

    pub fn delete_older_than(&self, cutoff_ms: i64) -> Result<usize> {
        queries::delete_older_than(&self.conn, cutoff_ms)
    }

    pub fn delete_all(&self) -> Result<usize> {
        queries::delete_all(&self.conn)
    }

    pub fn stats(&self, top_n: usize) -> Result<StoreStats> {
        queries::get_store_stats(&self.conn, top_n)
    }
}

impl EventSource for EventStore {
    fn get_most_recent(&self, limit: usize) -> Result<Vec<LaunchEvent>> {
        queries::get_most_recent(&self.conn, limit)
    }

    fn get_last(&self) -> Result<Option<LaunchEvent>> {
        queries::get_last(&self.conn)
    }
}

impl EventSink for EventStore {
    fn append(&self, launch: &NewLaunch) -> Result<i64> {
        queries::insert_launch(&self.conn, launch)
    }
}
